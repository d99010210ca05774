use super::Inputs;
use crate::reports;
use cipherforge::config::Config;
use cipherforge::error::CfResult;
use cipherforge::reducer;
use clap::Args;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ReduceArgs {
    #[command(flatten)]
    pub config: Config,
}

pub fn run(_args: ReduceArgs, inputs: &Inputs) -> CfResult<()> {
    let corpus = inputs.source()?;
    let reduced = reducer::reduce_corpus(&corpus);
    info!("{} samples collapse to {} lines", corpus.len(), reduced.len());
    reports::print_reduced_report(&reduced);
    Ok(())
}
