use crate::alphabet::Alphabet;
use crate::error::{CfResult, CipherForgeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A partial injective substitution: no source symbol appears twice and no
/// target symbol appears twice. Edges keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    edges: Vec<(char, char)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` if the edges are not a partial injection.
    pub fn from_edges<I: IntoIterator<Item = (char, char)>>(edges: I) -> Option<Self> {
        let mut mapping = Self::new();
        for (from, to) in edges {
            if !mapping.insert(from, to) {
                return None;
            }
        }
        Some(mapping)
    }

    /// Parses `C=t,S=o` style edge lists.
    pub fn parse(s: &str) -> CfResult<Self> {
        let mut mapping = Self::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let mut chars = part.chars();
            let (Some(from), Some('='), Some(to), None) =
                (chars.next(), chars.next(), chars.next(), chars.next())
            else {
                return Err(CipherForgeError::Config(format!(
                    "Edge '{}' is not of the form X=y",
                    part
                )));
            };
            if !mapping.insert(from, to) {
                return Err(CipherForgeError::Validation(format!(
                    "Edge '{}' conflicts with {}",
                    part, mapping
                )));
            }
        }
        Ok(mapping)
    }

    /// Adds `from -> to`. Returns false, leaving the mapping unchanged, if
    /// either side is already bound to something else.
    pub fn insert(&mut self, from: char, to: char) -> bool {
        match (self.get(from), self.preimage(to)) {
            (Some(t), _) if t == to => true,
            (None, None) => {
                self.edges.push((from, to));
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, from: char) -> Option<char> {
        self.edges.iter().find(|e| e.0 == from).map(|e| e.1)
    }

    pub fn preimage(&self, to: char) -> Option<char> {
        self.edges.iter().find(|e| e.1 == to).map(|e| e.0)
    }

    pub fn edges(&self) -> &[(char, char)] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Substitutes every mapped symbol; everything else passes through.
    pub fn apply(&self, text: &str) -> String {
        text.chars().map(|c| self.get(c).unwrap_or(c)).collect()
    }

    /// True when every source symbol is mapped into `target`.
    pub fn is_total(&self, source: &Alphabet, target: &Alphabet) -> bool {
        source
            .iter()
            .all(|s| self.get(s).is_some_and(|t| target.contains(t)))
    }

    /// Union of two partial mappings, or `None` if they disagree anywhere.
    pub fn merged(&self, other: &Mapping) -> Option<Mapping> {
        let mut out = self.clone();
        for &(from, to) in &other.edges {
            if !out.insert(from, to) {
                return None;
            }
        }
        Some(out)
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (from, to)) in self.edges.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}={}", from, to)?;
        }
        Ok(())
    }
}

fn ensure_same_length(from: &str, to: &str) -> CfResult<()> {
    let from_len = from.chars().count();
    let to_len = to.chars().count();
    if from_len != to_len {
        return Err(CipherForgeError::LengthMismatch {
            from: from.to_string(),
            to: to.to_string(),
            from_len,
            to_len,
        });
    }
    Ok(())
}

/// The substitution that turns `from` into `to` position by position, if
/// one exists. Two strings that would need a symbol to map two ways (or two
/// symbols to share an image) give `Ok(None)`.
pub fn match_mapping(from: &str, to: &str) -> CfResult<Option<Mapping>> {
    ensure_same_length(from, to)?;
    Ok(Mapping::from_edges(from.chars().zip(to.chars())))
}

/// Like [`match_mapping`], but each aligned pair must either be a real edge
/// (`from` symbol in `source`, `to` symbol in `target`) or the same
/// character outside both alphabets. Only the real edges are returned.
pub fn match_across_alphabets(
    from: &str,
    to: &str,
    source: &Alphabet,
    target: &Alphabet,
) -> CfResult<Option<Mapping>> {
    ensure_same_length(from, to)?;

    let mut mapping = Mapping::new();
    for (f, t) in from.chars().zip(to.chars()) {
        if source.contains(f) && target.contains(t) {
            if !mapping.insert(f, t) {
                return Ok(None);
            }
        } else if f != t || is_alphabet_symbol(f, source, target) {
            return Ok(None);
        }
    }
    Ok(Some(mapping))
}

fn is_alphabet_symbol(c: char, source: &Alphabet, target: &Alphabet) -> bool {
    source.contains(c) || target.contains(c)
}
