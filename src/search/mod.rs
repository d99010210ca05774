pub mod constraint;
pub mod local;

use crate::cipher::Mapping;
use crate::error::CfResult;
use serde::Serialize;
use strum_macros::{Display, EnumString};

pub use self::constraint::ConstraintOptimizer;
pub use self::local::LocalSearchOptimizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Strategy {
    /// Certified minimum of the penalty objective.
    Constraint,
    /// Fast approximate maximum of bigram log-likelihood.
    LocalSearch,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub mapping: Mapping,
    /// Penalty weight for [`Strategy::Constraint`] (lower is better),
    /// log-likelihood for [`Strategy::LocalSearch`] (higher is better).
    pub score: f64,
    pub strategy: Strategy,
    /// Solver nodes or local-search steps spent.
    pub iterations: usize,
}

/// Something that can produce a full source-to-target mapping.
pub trait MappingSearch {
    fn strategy(&self) -> Strategy;
    fn find_mapping(&mut self) -> CfResult<SearchOutcome>;
}

/// Receives the best-so-far state during a search.
/// Returning false asks the search to stop.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, iteration: usize, score: f64, best: &Mapping) -> bool;
}

impl<F> ProgressCallback for F
where
    F: Fn(usize, f64, &Mapping) -> bool + Send + Sync,
{
    fn on_progress(&self, iteration: usize, score: f64, best: &Mapping) -> bool {
        self(iteration, score, best)
    }
}
