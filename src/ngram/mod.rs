pub mod classify;
pub mod loader;

use crate::alphabet::Alphabet;
use crate::corpus::SEPARATOR;
use crate::error::{CfResult, CipherForgeError};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Additive (Laplace) smoothing: every k-gram over `alphabet` starts at
/// `pseudo_count` before real occurrences are tallied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Smoothing {
    pub alphabet: Alphabet,
    pub pseudo_count: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Counting {
    /// Only windows made entirely of alphabet symbols are counted.
    Smoothed(Smoothing),
    /// Any alphabetic characters; windows are only broken by the separator.
    Free,
}

/// Occurrence counts for every k-gram, plus their grand total.
///
/// Keys keep the order they were first seen in (seeding order for smoothed
/// tables), which is what ranking ties fall back on.
#[derive(Debug, Clone, PartialEq)]
pub struct NgramTable {
    order: usize,
    keys: Vec<String>,
    counts: Vec<f64>,
    index: HashMap<String, usize>,
    total: f64,
}

impl NgramTable {
    pub fn empty(order: usize) -> Self {
        Self {
            order,
            keys: Vec::new(),
            counts: Vec::new(),
            index: HashMap::new(),
            total: 0.0,
        }
    }

    pub fn build(text: &str, order: usize, counting: &Counting) -> CfResult<Self> {
        if order == 0 {
            return Err(CipherForgeError::Validation(
                "N-gram order must be at least 1".to_string(),
            ));
        }

        let mut table = Self::empty(order);

        match counting {
            Counting::Smoothed(smoothing) => {
                table.seed(smoothing)?;

                let chars: Vec<char> = text.chars().collect();
                for window in chars.windows(order) {
                    if window.iter().all(|&c| smoothing.alphabet.contains(c)) {
                        let key: String = window.iter().collect();
                        table.add(&key, 1.0);
                    }
                }
            }
            Counting::Free => {
                let chars: Vec<char> = text
                    .chars()
                    .filter(|&c| c.is_alphabetic() || c == SEPARATOR)
                    .collect();
                for window in chars.windows(order) {
                    if !window.contains(&SEPARATOR) {
                        let key: String = window.iter().collect();
                        table.add(&key, 1.0);
                    }
                }
            }
        }

        Ok(table)
    }

    /// Unigram table giving every symbol of `alphabet` the same weight.
    pub fn uniform(alphabet: &Alphabet, pseudo_count: f64) -> CfResult<Self> {
        Self::build(
            "",
            1,
            &Counting::Smoothed(Smoothing {
                alphabet: alphabet.clone(),
                pseudo_count,
            }),
        )
    }

    /// Builds a table from precomputed counts. Keys of the wrong length and
    /// negative or non-finite counts are skipped; repeated keys accumulate.
    pub fn from_counts<I, S>(order: usize, counts: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut table = Self::empty(order);
        for (key, count) in counts {
            let key = key.as_ref();
            if key.chars().count() != order || !count.is_finite() || count < 0.0 {
                continue;
            }
            table.add(key, count);
        }
        table
    }

    /// Re-counts a precomputed table under `smoothing`: every key over the
    /// alphabet is seeded, then the loaded counts of those keys are added.
    /// Keys using other symbols are dropped.
    pub fn smoothed(&self, smoothing: &Smoothing) -> CfResult<Self> {
        let mut table = Self::empty(self.order);
        table.seed(smoothing)?;
        for (key, count) in self.entries() {
            if key.chars().all(|c| smoothing.alphabet.contains(c)) {
                table.add(key, count);
            }
        }
        Ok(table)
    }

    fn seed(&mut self, smoothing: &Smoothing) -> CfResult<()> {
        if smoothing.pseudo_count < 0.0 {
            return Err(CipherForgeError::Validation(format!(
                "Pseudo-count must not be negative (got {})",
                smoothing.pseudo_count
            )));
        }
        for combo in (0..self.order)
            .map(|_| smoothing.alphabet.iter())
            .multi_cartesian_product()
        {
            let key: String = combo.into_iter().collect();
            self.add(&key, smoothing.pseudo_count);
        }
        Ok(())
    }

    fn add(&mut self, key: &str, amount: f64) {
        match self.index.get(key) {
            Some(&i) => self.counts[i] += amount,
            None => {
                self.index.insert(key.to_string(), self.keys.len());
                self.keys.push(key.to_string());
                self.counts.push(amount);
            }
        }
        self.total += amount;
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn count(&self, key: &str) -> f64 {
        self.index.get(key).map(|&i| self.counts[i]).unwrap_or(0.0)
    }

    pub fn frequency(&self, key: &str) -> CfResult<f64> {
        self.ensure_populated()?;
        Ok(self.count(key) / self.total)
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }

    /// Entries by descending count, ties in first-seen order.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self.entries().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }

    /// Sum of `ln(count / total)` over the k-gram windows of `text` that are
    /// keys of this table. Windows the table has never seen contribute
    /// nothing rather than negative infinity, since unsmoothed tables are
    /// scored through here as well.
    pub fn log_likelihood(&self, text: &str) -> CfResult<f64> {
        self.ensure_populated()?;

        let chars: Vec<char> = text.chars().collect();
        let mut key = String::with_capacity(self.order * 4);
        let mut ll = 0.0;
        for window in chars.windows(self.order) {
            key.clear();
            key.extend(window.iter());
            if let Some(&i) = self.index.get(key.as_str()) {
                let count = self.counts[i];
                if count > 0.0 {
                    ll += (count / self.total).ln();
                }
            }
        }
        Ok(ll)
    }

    fn ensure_populated(&self) -> CfResult<()> {
        if self.total > 0.0 {
            Ok(())
        } else {
            Err(CipherForgeError::EmptyModel(format!(
                "{}-gram table has a total of zero",
                self.order
            )))
        }
    }
}

/// `exp(ll_a(text) - ll_b(text))`: how much more likely `text` is under
/// `a` than under `b`.
pub fn relative_likelihood(text: &str, a: &NgramTable, b: &NgramTable) -> CfResult<f64> {
    Ok((a.log_likelihood(text)? - b.log_likelihood(text)?).exp())
}

/// Share of all bigrams taken by each leading/trailing letter pair, with
/// letters in unigram rank order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BigramShares {
    pub letters: Vec<String>,
    pub shares: Vec<Vec<f64>>,
}

impl BigramShares {
    pub fn build(unigrams: &NgramTable, bigrams: &NgramTable) -> CfResult<Self> {
        if unigrams.order() != 1 || bigrams.order() != 2 {
            return Err(CipherForgeError::Validation(format!(
                "Bigram shares need orders 1 and 2 (got {} and {})",
                unigrams.order(),
                bigrams.order()
            )));
        }
        bigrams.ensure_populated()?;

        let letters: Vec<String> = unigrams
            .ranked()
            .into_iter()
            .map(|(k, _)| k.to_string())
            .collect();

        let shares = letters
            .iter()
            .map(|leading| {
                letters
                    .iter()
                    .map(|trailing| {
                        let key = format!("{}{}", leading, trailing);
                        bigrams.count(&key) / bigrams.total()
                    })
                    .collect()
            })
            .collect();

        Ok(Self { letters, shares })
    }

    pub fn max_share(&self) -> f64 {
        self.shares
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }
}
