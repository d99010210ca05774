use crate::error::{CfResult, CipherForgeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Copied;
use std::slice;

/// An ordered set of single-character symbols.
///
/// Order only matters for display and for the seeding order of smoothed
/// n-gram tables; algorithms care about membership and size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    pub fn new<I: IntoIterator<Item = char>>(symbols: I) -> CfResult<Self> {
        let symbols: Vec<char> = symbols.into_iter().collect();
        for (i, c) in symbols.iter().enumerate() {
            if symbols[..i].contains(c) {
                return Err(CipherForgeError::Validation(format!(
                    "Alphabet symbol '{}' appears more than once",
                    c
                )));
            }
        }
        Ok(Self { symbols })
    }

    pub fn parse(s: &str) -> CfResult<Self> {
        Self::new(s.chars())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.symbols.contains(&c)
    }

    #[inline]
    pub fn index_of(&self, c: char) -> Option<usize> {
        self.symbols.iter().position(|&s| s == c)
    }

    pub fn symbol(&self, idx: usize) -> Option<char> {
        self.symbols.get(idx).copied()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn iter(&self) -> Copied<slice::Iter<'_, char>> {
        self.symbols.iter().copied()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.symbols {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Alphabet {
    type Error = CipherForgeError;

    fn try_from(s: String) -> CfResult<Self> {
        Self::parse(&s)
    }
}

impl From<Alphabet> for String {
    fn from(a: Alphabet) -> Self {
        a.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_symbols() {
        assert!(Alphabet::parse("abca").is_err());
    }

    #[test]
    fn iter_is_restartable_and_ordered() {
        let a = Alphabet::parse("zyx").unwrap();
        let it = a.iter();
        assert_eq!(it.clone().collect::<String>(), "zyx");
        assert_eq!(it.count(), 3);
    }
}
