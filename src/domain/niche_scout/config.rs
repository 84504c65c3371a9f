//! Transformer configuration

use serde::{Deserialize, Serialize};

use crate::domain::similarity::SimilarityWeights;
use crate::domain::DomainError;

/// What to do with items scoring below the relevance threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BelowThresholdPolicy {
    /// Leave them in place
    Keep,
    /// Leave them in place, marked with `below_threshold: true`
    #[default]
    Flag,
    /// Remove them, keeping at least `default_niche_count` top items
    Drop,
}

/// Similarity transformer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub weights: SimilarityWeights,

    /// Minimum relevance for an item to count as a match
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Score floor when one label contains the other
    #[serde(default = "default_substring_boost")]
    pub substring_boost: f64,

    /// Items always retained under the drop policy
    #[serde(default = "default_niche_count")]
    pub default_niche_count: usize,

    #[serde(default)]
    pub below_threshold: BelowThresholdPolicy,
}

fn default_similarity_threshold() -> f64 {
    0.55
}

fn default_substring_boost() -> f64 {
    0.8
}

fn default_niche_count() -> usize {
    5
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            weights: SimilarityWeights::default(),
            similarity_threshold: default_similarity_threshold(),
            substring_boost: default_substring_boost(),
            default_niche_count: default_niche_count(),
            below_threshold: BelowThresholdPolicy::default(),
        }
    }
}

impl TransformConfig {
    pub fn with_weights(mut self, weights: SimilarityWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_policy(mut self, policy: BelowThresholdPolicy) -> Self {
        self.below_threshold = policy;
        self
    }

    pub fn with_default_niche_count(mut self, count: usize) -> Self {
        self.default_niche_count = count;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.weights.validate()?;

        for (name, value) in [
            ("similarity_threshold", self.similarity_threshold),
            ("substring_boost", self.substring_boost),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(DomainError::configuration(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }

        if self.default_niche_count == 0 {
            return Err(DomainError::configuration(
                "default_niche_count must be greater than 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TransformConfig::default();

        assert_eq!(config.similarity_threshold, 0.55);
        assert_eq!(config.substring_boost, 0.8);
        assert_eq!(config.default_niche_count, 5);
        assert_eq!(config.below_threshold, BelowThresholdPolicy::Flag);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let err = TransformConfig::default()
            .with_threshold(1.5)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("similarity_threshold"));
    }

    #[test]
    fn test_rejects_zero_niche_count() {
        assert!(TransformConfig::default()
            .with_default_niche_count(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_rejects_bad_weights() {
        let config = TransformConfig::default().with_weights(SimilarityWeights::new(0.4, 0.3, 0.2));
        assert!(config.validate().unwrap_err().is_configuration());
    }

    #[test]
    fn test_policy_serde() {
        let config: TransformConfig =
            serde_json::from_str(r#"{"below_threshold": "drop"}"#).unwrap();
        assert_eq!(config.below_threshold, BelowThresholdPolicy::Drop);
        assert_eq!(config.default_niche_count, 5);
    }
}
