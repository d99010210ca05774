use crate::alphabet::Alphabet;
use crate::error::{CfResult, CipherForgeError};
use crate::ngram::NgramTable;
use itertools::Itertools;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

/// A labelled group of symbols, e.g. `a` for all vowels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolClass {
    pub label: char,
    pub members: Vec<char>,
}

impl fmt::Display for SymbolClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.label, self.members.iter().collect::<String>())
    }
}

/// Parses `a=aeiou,k=ksmyrht,w=w,n=n`.
pub fn parse_classes(s: &str) -> CfResult<Vec<SymbolClass>> {
    let mut classes: Vec<SymbolClass> = Vec::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((label, members)) = part.split_once('=') else {
            return Err(CipherForgeError::Config(format!(
                "Class '{}' is not of the form label=members",
                part
            )));
        };
        let mut label_chars = label.chars();
        let (Some(label), None) = (label_chars.next(), label_chars.next()) else {
            return Err(CipherForgeError::Config(format!(
                "Class label '{}' must be a single symbol",
                label
            )));
        };
        if classes.iter().any(|c| c.label == label) {
            return Err(CipherForgeError::Validation(format!(
                "Class label '{}' is used twice",
                label
            )));
        }
        classes.push(SymbolClass {
            label,
            members: members.chars().collect(),
        });
    }
    if classes.is_empty() {
        return Err(CipherForgeError::Config("No classes given".to_string()));
    }
    Ok(classes)
}

/// Every way to split `elements` into consecutive groups of the given sizes.
/// Groups keep the input order of their members; the first group varies
/// slowest.
pub fn partitions_into_sizes<T: Clone>(elements: &[T], sizes: &[usize]) -> CfResult<Vec<Vec<Vec<T>>>> {
    if sizes.is_empty() {
        return Err(CipherForgeError::Validation(
            "At least one class size is required".to_string(),
        ));
    }
    let wanted: usize = sizes.iter().sum();
    if wanted != elements.len() {
        return Err(CipherForgeError::Validation(format!(
            "Class sizes add up to {} but there are {} symbols",
            wanted,
            elements.len()
        )));
    }

    let mut out = Vec::new();
    let mut prefix = Vec::with_capacity(sizes.len());
    collect_partitions(elements, sizes, &mut prefix, &mut out);
    Ok(out)
}

fn collect_partitions<T: Clone>(
    elements: &[T],
    sizes: &[usize],
    prefix: &mut Vec<Vec<T>>,
    out: &mut Vec<Vec<Vec<T>>>,
) {
    let Some((&size, rest_sizes)) = sizes.split_first() else {
        out.push(prefix.clone());
        return;
    };

    for chosen in (0..elements.len()).combinations(size) {
        let group: Vec<T> = chosen.iter().map(|&i| elements[i].clone()).collect();
        let remainder: Vec<T> = elements
            .iter()
            .enumerate()
            .filter(|(i, _)| !chosen.contains(i))
            .map(|(_, e)| e.clone())
            .collect();

        prefix.push(group);
        collect_partitions(&remainder, rest_sizes, prefix, out);
        prefix.pop();
    }
}

struct ClassBigrams {
    counts: HashMap<(char, char), f64>,
    total: f64,
}

impl ClassBigrams {
    // Bigrams touching a symbol outside every class are dropped.
    fn reduce(bigrams: &NgramTable, classes: &[SymbolClass]) -> Self {
        let class_of: HashMap<char, char> = classes
            .iter()
            .flat_map(|c| c.members.iter().map(move |&m| (m, c.label)))
            .collect();

        let mut counts = HashMap::new();
        let mut total = 0.0;
        for (key, count) in bigrams.entries() {
            let mut chars = key.chars();
            let (Some(a), Some(b)) = (chars.next(), chars.next()) else {
                continue;
            };
            if let (Some(&ca), Some(&cb)) = (class_of.get(&a), class_of.get(&b)) {
                *counts.entry((ca, cb)).or_insert(0.0) += count;
                total += count;
            }
        }
        Self { counts, total }
    }

    fn share(&self, key: (char, char)) -> f64 {
        (self.counts.get(&key).copied().unwrap_or(0.0) + 1.0) / (self.total + 2.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReductionOutcome {
    /// Source symbols grouped under the target class labels.
    pub classes: Vec<SymbolClass>,
    pub error: f64,
    pub evaluated: usize,
}

/// Finds the grouping of source symbols whose class-level bigram profile is
/// closest to the target corpus reduced through a fixed class map.
pub struct ClassReduction {
    labels: Vec<char>,
    sizes: Vec<usize>,
    target: ClassBigrams,
}

impl ClassReduction {
    /// Source classes get the same sizes as the target classes.
    pub fn new(target_classes: &[SymbolClass], target_bigrams: &NgramTable) -> CfResult<Self> {
        if target_bigrams.order() != 2 {
            return Err(CipherForgeError::Validation(format!(
                "Expected a bigram table, got order {}",
                target_bigrams.order()
            )));
        }
        let target = ClassBigrams::reduce(target_bigrams, target_classes);
        if target.total <= 0.0 {
            return Err(CipherForgeError::EmptyModel(
                "no target bigram falls inside the classes".to_string(),
            ));
        }

        Ok(Self {
            labels: target_classes.iter().map(|c| c.label).collect(),
            sizes: target_classes.iter().map(|c| c.members.len()).collect(),
            target,
        })
    }

    /// Σ over every ordered pair of labels of `l/r + r/l`, both shares
    /// add-one smoothed. A perfect match scores `2 · labels²`.
    pub fn error(&self, source_classes: &[SymbolClass], source_bigrams: &NgramTable) -> f64 {
        let source = ClassBigrams::reduce(source_bigrams, source_classes);
        self.labels
            .iter()
            .cartesian_product(self.labels.iter())
            .map(|(&a, &b)| {
                let left = self.target.share((a, b));
                let right = source.share((a, b));
                left / right + right / left
            })
            .sum()
    }

    /// Scores every partition in parallel. Ties go to the partition that
    /// is enumerated first.
    pub fn search(&self, source: &Alphabet, source_bigrams: &NgramTable) -> CfResult<ReductionOutcome> {
        let partitions = partitions_into_sizes(source.symbols(), &self.sizes)?;
        info!(
            "Scoring {} partitions of {} symbols into classes {:?}",
            partitions.len(),
            source.len(),
            self.labels
        );

        let labelled: Vec<Vec<SymbolClass>> = partitions
            .into_iter()
            .map(|groups| {
                self.labels
                    .iter()
                    .zip(groups)
                    .map(|(&label, members)| SymbolClass { label, members })
                    .collect()
            })
            .collect();

        let (best_idx, best_error) = labelled
            .par_iter()
            .enumerate()
            .map(|(i, classes)| (i, self.error(classes, source_bigrams)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .ok_or_else(|| CipherForgeError::Validation("No partitions to score".to_string()))?;

        debug!("Best partition #{} with error {:.4}", best_idx, best_error);

        let evaluated = labelled.len();
        let classes = labelled.into_iter().nth(best_idx).unwrap_or_default();
        Ok(ReductionOutcome {
            classes,
            error: best_error,
            evaluated,
        })
    }
}
