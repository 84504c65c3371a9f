//! Blend weights for the similarity metrics

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Allowed deviation of the weight sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Relative weight of each metric in the blended score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityWeights {
    #[serde(default = "default_levenshtein")]
    pub levenshtein: f64,

    #[serde(default = "default_jaccard")]
    pub jaccard: f64,

    #[serde(default = "default_jaro_winkler")]
    pub jaro_winkler: f64,
}

fn default_levenshtein() -> f64 {
    0.5
}

fn default_jaccard() -> f64 {
    0.3
}

fn default_jaro_winkler() -> f64 {
    0.2
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            levenshtein: default_levenshtein(),
            jaccard: default_jaccard(),
            jaro_winkler: default_jaro_winkler(),
        }
    }
}

impl SimilarityWeights {
    pub fn new(levenshtein: f64, jaccard: f64, jaro_winkler: f64) -> Self {
        Self {
            levenshtein,
            jaccard,
            jaro_winkler,
        }
    }

    pub fn sum(&self) -> f64 {
        self.levenshtein + self.jaccard + self.jaro_winkler
    }

    /// Rejects weights outside [0, 1] or not summing to 1.0 within tolerance.
    ///
    /// Weights are never renormalized; a bad configuration is an error.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (name, value) in [
            ("levenshtein", self.levenshtein),
            ("jaccard", self.jaccard),
            ("jaro_winkler", self.jaro_winkler),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(DomainError::configuration(format!(
                    "similarity weight '{}' must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(DomainError::configuration(format!(
                "similarity weights must sum to 1.0 (±{}), got {:.3}",
                WEIGHT_SUM_TOLERANCE, sum
            )));
        }

        Ok(())
    }
}
