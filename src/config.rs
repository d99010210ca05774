use crate::alphabet::Alphabet;
use crate::error::{CfResult, CipherForgeError};
use crate::ngram::Smoothing;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub alphabets: AlphabetDefinitions,
    #[command(flatten)]
    pub smoothing: SmoothingParams,
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub classify: ClassifyThresholds,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphabetDefinitions {
    /// Symbols of the unknown script, in display order
    #[arg(long, default_value = "NDSBLHMRJCWUYT")]
    pub source_alphabet: String,
    /// Symbols of the reference phonetic alphabet
    #[arg(long, default_value = "aiueoksthrmnyw")]
    pub target_alphabet: String,
}

impl Default for AlphabetDefinitions {
    fn default() -> Self {
        Self {
            source_alphabet: "NDSBLHMRJCWUYT".to_string(),
            target_alphabet: "aiueoksthrmnyw".to_string(),
        }
    }
}

impl AlphabetDefinitions {
    pub fn source(&self) -> CfResult<Alphabet> {
        Alphabet::parse(&self.source_alphabet)
    }

    pub fn target(&self) -> CfResult<Alphabet> {
        Alphabet::parse(&self.target_alphabet)
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingParams {
    #[arg(long, default_value_t = 1.0)]
    pub pseudo_count: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self { pseudo_count: 1.0 }
    }
}

impl SmoothingParams {
    pub fn over(&self, alphabet: &Alphabet) -> Smoothing {
        Smoothing {
            alphabet: alphabet.clone(),
            pseudo_count: self.pseudo_count,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Steps without improvement before the local search pauses
    #[arg(long, default_value_t = 2000)]
    pub max_staleness: usize,
    #[arg(long, default_value_t = 200_000)]
    pub max_iterations: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_staleness: 2000,
            max_iterations: 200_000,
        }
    }
}

#[derive(Args, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyThresholds {
    /// Uniform/corpus likelihood ratio above which a line is noise
    #[arg(long, default_value_t = 10.0)]
    pub reject_above: f64,
    /// Ratio below which a line is a strong exemplar
    #[arg(long, default_value_t = 1.0)]
    pub exemplar_below: f64,
}

impl Default for ClassifyThresholds {
    fn default() -> Self {
        Self {
            reject_above: 10.0,
            exemplar_below: 1.0,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CfResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CipherForgeError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Copies every value the user typed on the command line over the
    /// file-loaded values. Defaults filled in by clap are ignored.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($group:ident . $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$group.$field = cli.$group.$field.clone();
                }
            };
        }

        update_if_present!(alphabets.source_alphabet);
        update_if_present!(alphabets.target_alphabet);

        update_if_present!(smoothing.pseudo_count);

        update_if_present!(search.max_staleness);
        update_if_present!(search.max_iterations);

        update_if_present!(classify.reject_above);
        update_if_present!(classify.exemplar_below);
    }
}
