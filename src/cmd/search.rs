use super::Inputs;
use crate::reports;
use cipherforge::alphabet::Alphabet;
use cipherforge::cipher::Mapping;
use cipherforge::config::Config;
use cipherforge::error::CfResult;
use cipherforge::search::local::{best_of_restarts, BigramLogTable};
use cipherforge::search::{LocalSearchOptimizer, ProgressCallback, SearchOutcome};
use clap::Args;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    #[command(flatten)]
    pub config: Config,

    /// Independent searches run in parallel; the best one wins
    #[arg(short = 'r', long, default_value_t = 1)]
    pub restarts: usize,

    /// Keep searching for this many seconds, widening stale searches
    #[arg(short = 'T', long)]
    pub time: Option<u64>,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Edges to hold fixed, e.g. C=t,S=o
    #[arg(long)]
    pub pin: Option<String>,
}

struct CliLogger;
impl ProgressCallback for CliLogger {
    fn on_progress(&self, iteration: usize, score: f64, best: &Mapping) -> bool {
        debug!("Step {:7} | Best: {:.3} | {}", iteration, score, best);
        true
    }
}

struct Job<'a> {
    table: Arc<BigramLogTable>,
    source: &'a Alphabet,
    probe: &'a str,
    config: &'a Config,
    pins: &'a Mapping,
    seed: Option<u64>,
}

impl Job<'_> {
    fn start(&self, restart: usize) -> CfResult<LocalSearchOptimizer> {
        LocalSearchOptimizer::new(
            self.table.clone(),
            self.source.clone(),
            self.probe,
            self.config.search.clone(),
            self.seed.map(|s| s.wrapping_add(restart as u64)),
        )?
        .with_pins(self.pins)
    }

    fn timed(&self, restarts: usize, budget: Duration) -> CfResult<Option<SearchOutcome>> {
        let outcomes = (0..restarts)
            .into_par_iter()
            .map(|i| {
                let mut search = self.start(i)?;
                let start = Instant::now();
                while start.elapsed() < budget {
                    search.run_for(budget.saturating_sub(start.elapsed()));
                    if search.is_stale() {
                        debug!("Restart {} stale at {:.3}, widening", i, search.score());
                        search.reset_staleness();
                    }
                }
                Ok(search.best())
            })
            .collect::<CfResult<Vec<_>>>()?;

        Ok(outcomes
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score)))
    }
}

pub fn run(args: SearchArgs, config: &Config, inputs: &Inputs) -> CfResult<()> {
    let source = config.alphabets.source()?;
    let target = config.alphabets.target()?;
    let table = Arc::new(BigramLogTable::from_table(
        &inputs.target_bigrams(config)?,
        &target,
    )?);
    let corpus = inputs.reduced_source()?;
    let probe = corpus.joined();
    let pins = args.pin.as_deref().map(Mapping::parse).transpose()?.unwrap_or_default();
    let restarts = args.restarts.max(1);

    let job = Job {
        table: table.clone(),
        source: &source,
        probe: &probe,
        config,
        pins: &pins,
        seed: args.seed,
    };

    info!("🔥 Hill climbing {} -> {} ({} restarts)", source, target, restarts);
    let timed = match args.time {
        Some(secs) => job.timed(restarts, Duration::from_secs(secs))?,
        None => None,
    };
    let outcome = match timed {
        Some(outcome) => outcome,
        None if restarts == 1 => job.start(0)?.run_with(&CliLogger),
        None => best_of_restarts(table, &source, &probe, &config.search, &pins, restarts, args.seed)?,
    };

    let decoded: Vec<(String, String)> = corpus
        .lines()
        .iter()
        .map(|l| (l.source.clone(), outcome.mapping.apply(&l.text)))
        .collect();

    info!("=== 🏆 FINAL RESULT ===");
    reports::print_outcome_report(&outcome, &decoded);
    reports::print_mapping_grid("OPTIMIZED", &outcome.mapping, &source);
    Ok(())
}
