use super::Inputs;
use crate::reports;
use cipherforge::cipher::Mapping;
use cipherforge::config::Config;
use cipherforge::error::CfResult;
use cipherforge::search::constraint::penalty_occurrences;
use cipherforge::search::{ConstraintOptimizer, MappingSearch};
use clap::Args;
use tracing::{debug, info};

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    #[command(flatten)]
    pub config: Config,

    /// Target-alphabet pattern that should not appear once decoded (repeatable)
    #[arg(short = 'p', long = "penalty", required = true)]
    pub penalties: Vec<String>,

    /// Edges to hold fixed, e.g. C=t,S=o
    #[arg(long)]
    pub pin: Option<String>,
}

pub fn run(args: SolveArgs, config: &Config, inputs: &Inputs) -> CfResult<()> {
    let source = config.alphabets.source()?;
    let target = config.alphabets.target()?;
    let corpus = inputs.reduced_source()?;
    let pins = args.pin.as_deref().map(Mapping::parse).transpose()?.unwrap_or_default();

    info!(
        "⚙️  Solving {} -> {} with {} penalty patterns and {} pins",
        source,
        target,
        args.penalties.len(),
        pins.len()
    );

    let mut optimizer =
        ConstraintOptimizer::new(source.clone(), target.clone(), args.penalties.clone(), corpus.clone())
            .with_pins(pins);
    let outcome = optimizer.find_mapping()?;

    let recount = penalty_occurrences(&outcome.mapping, &corpus, &args.penalties, &source, &target);
    debug!("Decoded corpus contains {} penalised windows", recount);

    let decoded: Vec<(String, String)> = corpus
        .lines()
        .iter()
        .map(|l| (l.source.clone(), outcome.mapping.apply(&l.text)))
        .collect();

    reports::print_outcome_report(&outcome, &decoded);
    reports::print_mapping_grid("SOLVED", &outcome.mapping, &source);
    Ok(())
}
