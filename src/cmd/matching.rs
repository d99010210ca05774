use crate::reports;
use cipherforge::alphabet::Alphabet;
use cipherforge::cipher::{match_across_alphabets, match_mapping, Mapping};
use cipherforge::config::Config;
use cipherforge::error::CfResult;
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct MatchArgs {
    #[command(flatten)]
    pub config: Config,

    pub from: String,
    pub to: String,

    /// Edges must run from the source alphabet into the target alphabet;
    /// anything else has to pass through unchanged
    #[arg(long, default_value_t = false)]
    pub across: bool,

    /// Edges already believed, e.g. C=t,S=o; the match must agree with them
    #[arg(long)]
    pub pin: Option<String>,
}

pub fn run(args: MatchArgs, config: &Config) -> CfResult<()> {
    let found = if args.across {
        match_across_alphabets(
            &args.from,
            &args.to,
            &config.alphabets.source()?,
            &config.alphabets.target()?,
        )?
    } else {
        match_mapping(&args.from, &args.to)?
    };

    let pins = args.pin.as_deref().map(Mapping::parse).transpose()?.unwrap_or_default();
    let found = match found {
        Some(mapping) if !pins.is_empty() => match mapping.merged(&pins) {
            Some(merged) => Some(merged),
            None => {
                println!("Conflicts with pins: {} vs {}", mapping, pins);
                return Ok(());
            }
        },
        other => other,
    };

    match found {
        Some(mapping) => {
            println!("Consistent: {}", mapping);
            let domain = Alphabet::new(mapping.edges().iter().map(|e| e.0))?;
            reports::print_mapping_grid(&args.from, &mapping, &domain);
        }
        None => println!(
            "Inconsistent: no substitution turns '{}' into '{}'",
            args.from, args.to
        ),
    }
    Ok(())
}
