use super::NgramTable;
use crate::config::ClassifyThresholds;
use crate::error::{CfResult, CipherForgeError};
use serde::Serialize;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum Flag {
    /// Looks uniform: likely decorative or noise.
    Rejected,
    /// Strongly skewed the way the corpus is.
    Exemplar,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationScore {
    /// `ll_uniform - ll_corpus` for the line.
    pub log_ratio: f64,
    /// `exp(log_ratio)`. Saturates on long lines; flags are decided on
    /// `log_ratio`.
    pub ratio: f64,
    /// `exp(|log_ratio|)`: the ratio, or its inverse when the line is more
    /// structured than uniform; always >= 1.
    pub strength: f64,
    pub flag: Flag,
}

/// Likelihood-ratio test between a uniform letter model and the corpus
/// unigram model.
pub struct Classifier<'a> {
    uniform: &'a NgramTable,
    corpus: &'a NgramTable,
    thresholds: ClassifyThresholds,
}

impl<'a> Classifier<'a> {
    pub fn new(
        uniform: &'a NgramTable,
        corpus: &'a NgramTable,
        thresholds: ClassifyThresholds,
    ) -> CfResult<Self> {
        if thresholds.exemplar_below <= 0.0 || thresholds.reject_above <= 0.0 {
            return Err(CipherForgeError::Config(format!(
                "Classification thresholds must be positive (got {} and {})",
                thresholds.exemplar_below, thresholds.reject_above
            )));
        }
        if thresholds.exemplar_below > thresholds.reject_above {
            return Err(CipherForgeError::Config(format!(
                "Exemplar threshold {} exceeds reject threshold {}",
                thresholds.exemplar_below, thresholds.reject_above
            )));
        }
        Ok(Self {
            uniform,
            corpus,
            thresholds,
        })
    }

    pub fn classify(&self, line: &str) -> CfResult<ClassificationScore> {
        let log_ratio = self.uniform.log_likelihood(line)? - self.corpus.log_likelihood(line)?;

        let flag = if log_ratio > self.thresholds.reject_above.ln() {
            Flag::Rejected
        } else if log_ratio < self.thresholds.exemplar_below.ln() {
            Flag::Exemplar
        } else {
            Flag::Neutral
        };

        Ok(ClassificationScore {
            log_ratio,
            ratio: log_ratio.exp(),
            strength: log_ratio.abs().exp(),
            flag,
        })
    }
}
