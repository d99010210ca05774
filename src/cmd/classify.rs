use super::Inputs;
use crate::reports;
use cipherforge::config::Config;
use cipherforge::error::CfResult;
use cipherforge::ngram::classify::{Classifier, Flag};
use cipherforge::ngram::{Counting, NgramTable};
use clap::Args;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub config: Config,

    /// Only list lines with this flag (rejected, exemplar, neutral)
    #[arg(long)]
    pub only: Option<Flag>,
}

pub fn run(args: ClassifyArgs, config: &Config, inputs: &Inputs) -> CfResult<()> {
    let source = config.alphabets.source()?;
    let corpus = inputs.source()?;

    let unigrams = NgramTable::build(
        &corpus.joined(),
        1,
        &Counting::Smoothed(config.smoothing.over(&source)),
    )?;
    let uniform = NgramTable::uniform(&source, 1.0)?;
    let classifier = Classifier::new(&uniform, &unigrams, config.classify)?;

    let mut rows = Vec::new();
    let (mut rejected, mut exemplars) = (0, 0);
    for line in corpus.lines() {
        let score = classifier.classify(&line.text)?;
        match score.flag {
            Flag::Rejected => rejected += 1,
            Flag::Exemplar => exemplars += 1,
            Flag::Neutral => {}
        }
        if args.only.map_or(true, |f| f == score.flag) {
            rows.push((line.source.clone(), line.text.clone(), score));
        }
    }

    info!(
        "{} lines: {} rejected, {} exemplars",
        corpus.len(),
        rejected,
        exemplars
    );
    reports::print_classification_report(&rows);
    Ok(())
}
