use crate::error::CfResult;
use std::io::Read;
use tracing::{debug, warn};

/// Inserted between independent lines so n-grams never span two of them.
pub const SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusLine {
    pub text: String,
    pub source: String,
}

impl CorpusLine {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    lines: Vec<CorpusLine>,
}

impl Corpus {
    pub fn new(lines: Vec<CorpusLine>) -> Self {
        Self { lines }
    }

    /// One line per entry of `texts`, labelled with the same `source`.
    pub fn from_texts<S: AsRef<str>>(texts: &[S], source: &str) -> Self {
        Self {
            lines: texts
                .iter()
                .map(|t| CorpusLine::new(t.as_ref(), source))
                .collect(),
        }
    }

    pub fn lines(&self) -> &[CorpusLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.text.as_str())
    }

    /// All lines concatenated with [`SEPARATOR`] between them.
    pub fn joined(&self) -> String {
        join_lines(self.texts())
    }
}

pub fn join_lines<'a, I: IntoIterator<Item = &'a str>>(lines: I) -> String {
    let mut out = String::new();
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(line);
    }
    out
}

/// Reads a `label<TAB>text` corpus. Rows with a single column become lines
/// labelled by their row number; empty rows are skipped.
pub fn load_corpus<R: Read>(reader: R) -> CfResult<Corpus> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut lines = Vec::new();
    let mut row_idx = 0;

    for result in rdr.records() {
        row_idx += 1;
        let rec = match result {
            Ok(rec) => rec,
            Err(e) => {
                warn!("[Row {}] Corpus parse error: {}", row_idx, e);
                continue;
            }
        };

        let (source, text) = match rec.len() {
            0 => continue,
            1 => (format!("line {}", row_idx), rec[0].trim().to_string()),
            _ => (rec[0].trim().to_string(), rec[1].trim().to_string()),
        };

        if text.is_empty() {
            continue;
        }
        lines.push(CorpusLine { text, source });
    }

    debug!("Scanned {} rows, loaded {} corpus lines", row_idx, lines.len());
    Ok(Corpus { lines })
}
