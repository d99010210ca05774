use cipherforge::config::Config;
use cipherforge::error::CfResult;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Source corpus, one `label<TAB>text` line per sample
    #[arg(global = true, short, long, default_value = "data/source.tsv")]
    source_corpus: PathBuf,

    /// Reference text in the target language
    #[arg(global = true, short, long, default_value = "data/target.txt")]
    target_corpus: PathBuf,

    /// Precomputed `bigram<TAB>count` table used instead of the target corpus
    #[arg(global = true, long)]
    target_bigrams: Option<PathBuf>,

    /// JSON config; flags given on the command line override it
    #[arg(global = true, long)]
    config: Option<PathBuf>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ranked unigram, bigram and trigram tables
    Frequencies(cmd::frequencies::FrequenciesArgs),
    /// Collapse rotated and overlapping samples
    Reduce(cmd::reduce::ReduceArgs),
    /// Flag lines that look like noise
    Classify(cmd::classify::ClassifyArgs),
    /// Check whether one string can be a substitution of another
    Match(cmd::matching::MatchArgs),
    /// Exact mapping that avoids penalised patterns
    Solve(cmd::solve::SolveArgs),
    /// Hill-climb towards the most target-like mapping
    Search(cmd::search::SearchArgs),
    /// Group source symbols into target-like classes
    Partition(cmd::partition::PartitionArgs),
}

impl Commands {
    fn config(&self) -> &Config {
        match self {
            Commands::Frequencies(args) => &args.config,
            Commands::Reduce(args) => &args.config,
            Commands::Classify(args) => &args.config,
            Commands::Match(args) => &args.config,
            Commands::Solve(args) => &args.config,
            Commands::Search(args) => &args.config,
            Commands::Partition(args) => &args.config,
        }
    }
}

fn resolve_config(cli: &Cli, sub_matches: &ArgMatches) -> CfResult<Config> {
    let cli_config = cli.command.config();
    match &cli.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            let mut config = Config::load_from_file(path)?;
            config.merge_from_cli(cli_config, sub_matches);
            Ok(config)
        }
        None => Ok(cli_config.clone()),
    }
}

fn run(cli: Cli, matches: &ArgMatches) -> CfResult<()> {
    let sub_matches = matches
        .subcommand()
        .map(|(_, m)| m)
        .unwrap_or(matches);
    let config = resolve_config(&cli, sub_matches)?;

    let inputs = cmd::Inputs {
        source_corpus: cli.source_corpus,
        target_corpus: cli.target_corpus,
        target_bigrams: cli.target_bigrams,
    };

    match cli.command {
        Commands::Frequencies(args) => cmd::frequencies::run(args, &config, &inputs),
        Commands::Reduce(args) => cmd::reduce::run(args, &inputs),
        Commands::Classify(args) => cmd::classify::run(args, &config, &inputs),
        Commands::Match(args) => cmd::matching::run(args, &config),
        Commands::Solve(args) => cmd::solve::run(args, &config, &inputs),
        Commands::Search(args) => cmd::search::run(args, &config, &inputs),
        Commands::Partition(args) => cmd::partition::run(args, &config, &inputs),
    }
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli, &matches) {
        error!("{}", e);
        process::exit(1);
    }
}
