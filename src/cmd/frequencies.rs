use super::Inputs;
use crate::reports;
use cipherforge::config::Config;
use cipherforge::error::CfResult;
use cipherforge::ngram::{BigramShares, Counting, NgramTable};
use clap::Args;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Source,
    Target,
}

#[derive(Args, Debug, Clone)]
pub struct FrequenciesArgs {
    #[command(flatten)]
    pub config: Config,

    /// Corpus to count: source or target
    #[arg(long, default_value_t = Side::Source)]
    pub side: Side,

    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Count every alphabetic character instead of the configured alphabet
    #[arg(long, default_value_t = false)]
    pub free: bool,

    /// Also print the bigram share heatmap
    #[arg(long, default_value_t = false)]
    pub shares: bool,
}

pub fn run(args: FrequenciesArgs, config: &Config, inputs: &Inputs) -> CfResult<()> {
    let (text, alphabet) = match args.side {
        Side::Source => (inputs.reduced_source()?.joined(), config.alphabets.source()?),
        Side::Target => (inputs.target_text(config)?, config.alphabets.target()?),
    };

    let counting = if args.free {
        Counting::Free
    } else {
        Counting::Smoothed(config.smoothing.over(&alphabet))
    };

    let mut tables = Vec::with_capacity(3);
    for order in 1..=3 {
        let table = NgramTable::build(&text, order, &counting)?;
        reports::print_ngram_report(
            &format!("{} {}-grams", args.side, order),
            &table.ranked(),
            table.total(),
            args.top,
        );
        tables.push(table);
    }

    if args.shares {
        let shares = BigramShares::build(&tables[0], &tables[1])?;
        reports::print_share_heatmap(&args.side.to_string(), &shares);
    }
    Ok(())
}
