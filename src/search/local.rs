use super::{MappingSearch, ProgressCallback, SearchOutcome, Strategy};
use crate::alphabet::Alphabet;
use crate::cipher::Mapping;
use crate::config::SearchParams;
use crate::error::{CfResult, CipherForgeError};
use crate::ngram::NgramTable;
use fastrand::Rng;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Dense `ln P(ab)` lookup over the target alphabet.
#[derive(Debug, Clone)]
pub struct BigramLogTable {
    alphabet: Alphabet,
    log_probs: Vec<f64>,
}

impl BigramLogTable {
    /// Every bigram over `alphabet` must have a positive count, so build
    /// `bigrams` with smoothing.
    pub fn from_table(bigrams: &NgramTable, alphabet: &Alphabet) -> CfResult<Self> {
        if bigrams.order() != 2 {
            return Err(CipherForgeError::Validation(format!(
                "Expected a bigram table, got order {}",
                bigrams.order()
            )));
        }
        if bigrams.total() <= 0.0 {
            return Err(CipherForgeError::EmptyModel(
                "target bigram table has a total of zero".to_string(),
            ));
        }

        let n = alphabet.len();
        let mut log_probs = vec![0.0; n * n];
        for (i, a) in alphabet.iter().enumerate() {
            for (j, b) in alphabet.iter().enumerate() {
                let key: String = [a, b].iter().collect();
                let count = bigrams.count(&key);
                if count <= 0.0 {
                    return Err(CipherForgeError::Validation(format!(
                        "Bigram '{}' has no weight; build the target table with smoothing",
                        key
                    )));
                }
                log_probs[i * n + j] = (count / bigrams.total()).ln();
            }
        }

        Ok(Self {
            alphabet: alphabet.clone(),
            log_probs,
        })
    }

    #[inline(always)]
    pub fn get(&self, a: usize, b: usize) -> f64 {
        self.log_probs[a * self.alphabet.len() + b]
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }
}

/// Greedy hill climbing over source-to-target permutations, scored by the
/// bigram log-likelihood of the decoded probe text.
///
/// Each step applies `1 + floor(sqrt(staleness))` random swaps to the
/// current permutation and keeps the result only if it strictly improves,
/// so the neighbourhood widens the longer the search is stuck. Steps are
/// independent; a host can interleave them with other work and read
/// [`best`](Self::best) at any time.
pub struct LocalSearchOptimizer {
    table: Arc<BigramLogTable>,
    source: Alphabet,

    // (source idx, source idx, occurrences) for adjacent probe symbols
    pair_counts: Vec<(usize, usize, f64)>,

    // perm[slot] = target idx; slots below source.len() belong to source symbols,
    // the rest hold currently unused targets
    perm: Vec<usize>,
    movable: Vec<usize>,

    score: f64,
    staleness: usize,
    iterations: usize,
    accepted: usize,

    params: SearchParams,
    rng: Rng,
}

impl LocalSearchOptimizer {
    pub fn new(
        table: Arc<BigramLogTable>,
        source: Alphabet,
        probe: &str,
        params: SearchParams,
        seed: Option<u64>,
    ) -> CfResult<Self> {
        let n_s = source.len();
        let n_t = table.alphabet().len();
        if n_s > n_t {
            return Err(CipherForgeError::Infeasible(format!(
                "{} source symbols cannot map injectively onto {} target symbols",
                n_s, n_t
            )));
        }

        let mut rng = if let Some(s) = seed {
            Rng::with_seed(s)
        } else {
            Rng::new()
        };

        let mut counts: HashMap<(usize, usize), f64> = HashMap::new();
        let chars: Vec<char> = probe.chars().collect();
        for pair in chars.windows(2) {
            if let (Some(a), Some(b)) = (source.index_of(pair[0]), source.index_of(pair[1])) {
                *counts.entry((a, b)).or_insert(0.0) += 1.0;
            }
        }
        let mut pair_counts: Vec<(usize, usize, f64)> =
            counts.into_iter().map(|((a, b), c)| (a, b, c)).collect();
        pair_counts.sort_by_key(|&(a, b, _)| (a, b));

        let mut perm: Vec<usize> = (0..n_t).collect();
        rng.shuffle(&mut perm);

        let mut optimizer = Self {
            table,
            source,
            pair_counts,
            perm,
            movable: (0..n_t).collect(),
            score: 0.0,
            staleness: 0,
            iterations: 0,
            accepted: 0,
            params,
            rng,
        };
        optimizer.score = optimizer.evaluate(&optimizer.perm);
        Ok(optimizer)
    }

    /// Fixes the given edges; pinned slots are never swapped.
    pub fn with_pins(mut self, pins: &Mapping) -> CfResult<Self> {
        for &(from, to) in pins.edges() {
            let slot = self.source.index_of(from).ok_or(CipherForgeError::UnknownSymbol {
                symbol: from,
                alphabet: "source",
            })?;
            let target_idx =
                self.table
                    .alphabet()
                    .index_of(to)
                    .ok_or(CipherForgeError::UnknownSymbol {
                        symbol: to,
                        alphabet: "target",
                    })?;

            if let Some(holder) = self.perm.iter().position(|&t| t == target_idx) {
                self.perm.swap(slot, holder);
            }
            self.movable.retain(|&s| s != slot);
        }

        self.score = self.evaluate(&self.perm);
        Ok(self)
    }

    fn evaluate(&self, perm: &[usize]) -> f64 {
        self.pair_counts
            .iter()
            .map(|&(a, b, c)| c * self.table.get(perm[a], perm[b]))
            .sum()
    }

    /// Tries one candidate. Returns true if it was accepted.
    pub fn step(&mut self) -> bool {
        self.iterations += 1;

        if self.movable.len() < 2 {
            self.staleness += 1;
            return false;
        }

        let swaps = 1 + (self.staleness as f64).sqrt() as usize;
        let mut candidate = self.perm.clone();
        for _ in 0..swaps {
            let i = self.movable[self.rng.usize(0..self.movable.len())];
            let j = self.movable[self.rng.usize(0..self.movable.len())];
            candidate.swap(i, j);
        }

        let candidate_score = self.evaluate(&candidate);
        if candidate_score > self.score {
            self.perm = candidate;
            self.score = candidate_score;
            self.staleness = 0;
            self.accepted += 1;
            true
        } else {
            self.staleness += 1;
            false
        }
    }

    /// True once the search has gone `max_staleness` steps without
    /// improving. Further steps are still allowed.
    pub fn is_stale(&self) -> bool {
        self.staleness > self.params.max_staleness
    }

    pub fn reset_staleness(&mut self) {
        self.staleness = 0;
    }

    /// Runs up to `max_steps` steps, stopping early once stale. Returns the
    /// number of steps taken.
    pub fn run(&mut self, max_steps: usize) -> usize {
        let mut taken = 0;
        while taken < max_steps && !self.is_stale() {
            self.step();
            taken += 1;
        }
        taken
    }

    /// Runs until stale or until `budget` has elapsed.
    pub fn run_for(&mut self, budget: Duration) -> usize {
        let start = Instant::now();
        let mut taken = 0;
        while !self.is_stale() && start.elapsed() < budget {
            self.step();
            taken += 1;
        }
        taken
    }

    /// Runs until stale, until `max_iterations` total steps, or until the
    /// callback asks to stop. The callback sees every accepted state.
    pub fn run_with<CB: ProgressCallback>(&mut self, callback: &CB) -> SearchOutcome {
        while !self.is_stale() && self.iterations < self.params.max_iterations {
            if self.step() && !callback.on_progress(self.iterations, self.score, &self.mapping())
            {
                break;
            }
        }
        debug!(
            "Local search paused after {} steps ({} accepted), score {:.3}",
            self.iterations, self.accepted, self.score
        );
        self.best()
    }

    pub fn mapping(&self) -> Mapping {
        let target = self.table.alphabet();
        let mut mapping = Mapping::new();
        for (slot, from) in self.source.iter().enumerate() {
            if let Some(to) = target.symbol(self.perm[slot]) {
                mapping.insert(from, to);
            }
        }
        mapping
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn staleness(&self) -> usize {
        self.staleness
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Score of an arbitrary full mapping under this search's objective.
    pub fn score_mapping(&self, mapping: &Mapping) -> Option<f64> {
        let target = self.table.alphabet();
        let mut perm = vec![0; self.source.len()];
        for (slot, from) in self.source.iter().enumerate() {
            perm[slot] = target.index_of(mapping.get(from)?)?;
        }
        Some(self.evaluate(&perm))
    }

    pub fn best(&self) -> SearchOutcome {
        SearchOutcome {
            mapping: self.mapping(),
            score: self.score,
            strategy: Strategy::LocalSearch,
            iterations: self.iterations,
        }
    }
}

impl MappingSearch for LocalSearchOptimizer {
    fn strategy(&self) -> Strategy {
        Strategy::LocalSearch
    }

    fn find_mapping(&mut self) -> CfResult<SearchOutcome> {
        let remaining = self.params.max_iterations.saturating_sub(self.iterations);
        self.run(remaining);
        Ok(self.best())
    }
}

/// Runs `restarts` independent searches in parallel and keeps the highest
/// scoring one. Restart `i` is seeded with `seed + i` (wrapping) when a seed is given.
pub fn best_of_restarts(
    table: Arc<BigramLogTable>,
    source: &Alphabet,
    probe: &str,
    params: &SearchParams,
    pins: &Mapping,
    restarts: usize,
    seed: Option<u64>,
) -> CfResult<SearchOutcome> {
    info!("Running {} local search restarts", restarts.max(1));

    let outcomes: Vec<SearchOutcome> = (0..restarts.max(1))
        .into_par_iter()
        .map(|i| {
            let mut search = LocalSearchOptimizer::new(
                table.clone(),
                source.clone(),
                probe,
                params.clone(),
                seed.map(|s| s.wrapping_add(i as u64)),
            )?
            .with_pins(pins)?;
            search.find_mapping()
        })
        .collect::<CfResult<_>>()?;

    outcomes
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| CipherForgeError::Validation("no restarts were run".to_string()))
}
