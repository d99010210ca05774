pub mod classify;
pub mod frequencies;
pub mod matching;
pub mod partition;
pub mod reduce;
pub mod search;
pub mod solve;

use cipherforge::config::Config;
use cipherforge::corpus::{load_corpus, Corpus};
use cipherforge::error::{CfResult, CipherForgeError};
use cipherforge::ngram::loader::load_table;
use cipherforge::ngram::{Counting, NgramTable};
use cipherforge::phonetic::RomajiSimplifier;
use cipherforge::reducer;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// Input files shared by every subcommand.
pub struct Inputs {
    pub source_corpus: PathBuf,
    pub target_corpus: PathBuf,
    pub target_bigrams: Option<PathBuf>,
}

fn open(path: &Path) -> CfResult<File> {
    File::open(path).map_err(|e| {
        CipherForgeError::Config(format!("Failed to open '{}': {}", path.display(), e))
    })
}

impl Inputs {
    pub fn source(&self) -> CfResult<Corpus> {
        info!("📂 Loading source corpus: {}", self.source_corpus.display());
        load_corpus(open(&self.source_corpus)?)
    }

    /// Source corpus with rotations and overlaps collapsed.
    pub fn reduced_source(&self) -> CfResult<Corpus> {
        let corpus = self.source()?;
        let reduced = reducer::reduce_corpus(&corpus);
        info!("Reduced {} lines to {}", corpus.len(), reduced.len());
        Ok(reducer::to_corpus(&reduced))
    }

    /// Target reference text, normalised onto the target alphabet.
    pub fn target_text(&self, config: &Config) -> CfResult<String> {
        info!("📂 Loading target corpus: {}", self.target_corpus.display());
        let raw = fs::read_to_string(&self.target_corpus).map_err(|e| {
            CipherForgeError::Config(format!(
                "Failed to read '{}': {}",
                self.target_corpus.display(),
                e
            ))
        })?;
        let target = config.alphabets.target()?;
        Ok(RomajiSimplifier::new()?.normalize_reference(&raw, &target))
    }

    /// Smoothed target bigrams, from the precomputed table when one is given.
    pub fn target_bigrams(&self, config: &Config) -> CfResult<NgramTable> {
        let smoothing = config.smoothing.over(&config.alphabets.target()?);
        match &self.target_bigrams {
            Some(path) => {
                info!("📂 Loading target bigrams: {}", path.display());
                load_table(open(path)?, 2)?.smoothed(&smoothing)
            }
            None => NgramTable::build(&self.target_text(config)?, 2, &Counting::Smoothed(smoothing)),
        }
    }
}
