use super::Inputs;
use crate::reports;
use cipherforge::config::Config;
use cipherforge::error::CfResult;
use cipherforge::ngram::{Counting, NgramTable, Smoothing};
use cipherforge::reduction::{parse_classes, ClassReduction};
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct PartitionArgs {
    #[command(flatten)]
    pub config: Config,

    /// Target classes as label=members; source classes get the same sizes
    #[arg(long, default_value = "a=aeiou,k=ksmyrht,w=w,n=n")]
    pub classes: String,
}

pub fn run(args: PartitionArgs, config: &Config, inputs: &Inputs) -> CfResult<()> {
    let source = config.alphabets.source()?;
    let classes = parse_classes(&args.classes)?;

    let target_bigrams = inputs.target_bigrams(config)?;
    let reduction = ClassReduction::new(&classes, &target_bigrams)?;

    let raw = Counting::Smoothed(Smoothing {
        alphabet: source.clone(),
        pseudo_count: 0.0,
    });
    let source_bigrams = NgramTable::build(&inputs.reduced_source()?.joined(), 2, &raw)?;

    let outcome = reduction.search(&source, &source_bigrams)?;
    reports::print_partition_report(&outcome);
    Ok(())
}
