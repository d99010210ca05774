use crate::alphabet::Alphabet;
use crate::error::CfResult;
use regex::Regex;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

// Applied in order. Each rule sees the output of the previous one.
const RULES: &[(&str, &str)] = &[
    ("fu", "hu"),
    ("ch([aeuo])", "tiy$1"),
    ("(?:sh|j)([aeuo])", "siy$1"),
    ("shi", "si"),
    ("chi", "ti"),
    ("tsu", "tu"),
    ("d", "t"),
    ("[jz]", "s"),
    ("g", "k"),
    ("[pb]", "h"),
    ("([kshnmr])y", "${1}iy"),
];

/// Folds Hepburn-style romaji onto the reduced phonetic alphabet used as the
/// target of the substitution search.
pub struct RomajiSimplifier {
    rules: Vec<(Regex, &'static str)>,
}

impl RomajiSimplifier {
    pub fn new() -> CfResult<Self> {
        let rules = RULES
            .iter()
            .map(|&(pattern, replacement)| Ok((Regex::new(pattern)?, replacement)))
            .collect::<CfResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn simplify(&self, romaji: &str) -> String {
        let mut text = romaji.to_string();
        for (re, replacement) in &self.rules {
            text = re.replace_all(&text, *replacement).into_owned();
        }
        collapse_vowels(&split_geminates(&text))
    }

    /// Prepares free-form reference text: compatibility decomposition,
    /// lowercase, ASCII letters only, simplified, then restricted to `target`.
    pub fn normalize_reference(&self, text: &str, target: &Alphabet) -> String {
        let letters: String = text
            .nfkd()
            .flat_map(char::to_lowercase)
            .filter(|c| c.is_ascii_lowercase())
            .collect();

        let out: String = self
            .simplify(&letters)
            .chars()
            .filter(|&c| target.contains(c))
            .collect();

        debug!(
            "Normalised {} input chars to {} target symbols",
            text.chars().count(),
            out.len()
        );
        out
    }
}

// "kk" -> "tuk", "ss" -> "tus", ...; pairs never overlap.
fn split_geminates(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if matches!(c, 's' | 'k' | 't' | 'h') && chars.get(i + 1) == Some(&c) {
            out.push_str("tu");
            out.push(c);
            i += 2;
        } else {
            out.push(c);
            i += 1;
        }
    }
    out
}

fn collapse_vowels(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        if matches!(c, 'a' | 'e' | 'i' | 'o' | 'u') && chars.get(i + 1) == Some(&c) {
            i += 2;
        } else {
            i += 1;
        }
    }
    out
}
