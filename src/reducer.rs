use crate::corpus::{Corpus, CorpusLine};
use tracing::debug;

/// A surviving line and every sample label it subsumes, its own first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedLine {
    pub text: String,
    pub sources: Vec<String>,
}

/// Collapses lines that are rotations, prefixes or suffixes of a longer line
/// already kept. A ring of text read from different starting points yields
/// strings that differ only by rotation, so the kept line is tripled on
/// itself before the containment check to cover wraparound.
///
/// Lines are visited longest-first; equal lengths keep their original order,
/// so the earlier line wins ties. Output is in discovery order.
pub fn reduce(lines: &[CorpusLine]) -> Vec<ReducedLine> {
    let mut order: Vec<usize> = (0..lines.len()).collect();
    // stable: equal lengths stay in input order
    order.sort_by_key(|&i| std::cmp::Reverse(lines[i].text.chars().count()));

    let mut kept: Vec<(String, ReducedLine)> = Vec::new();

    for i in order {
        let candidate = &lines[i];
        let survivor = kept
            .iter_mut()
            .find(|(ring, _)| ring.contains(candidate.text.as_str()));

        match survivor {
            Some((_, reduced)) => reduced.sources.push(candidate.source.clone()),
            None => {
                let ring = candidate.text.repeat(3);
                kept.push((
                    ring,
                    ReducedLine {
                        text: candidate.text.clone(),
                        sources: vec![candidate.source.clone()],
                    },
                ));
            }
        }
    }

    debug!("Reduced {} lines to {}", lines.len(), kept.len());
    kept.into_iter().map(|(_, r)| r).collect()
}

pub fn reduce_corpus(corpus: &Corpus) -> Vec<ReducedLine> {
    reduce(corpus.lines())
}

/// Turns reduced lines back into a corpus, labelling each by its first
/// source.
pub fn to_corpus(reduced: &[ReducedLine]) -> Corpus {
    Corpus::new(
        reduced
            .iter()
            .map(|r| {
                CorpusLine::new(
                    r.text.clone(),
                    r.sources.first().cloned().unwrap_or_default(),
                )
            })
            .collect(),
    )
}
