//! Runtime proxy settings - the part of the configuration `POST /config` can change

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::niche_scout::TransformConfig;
use crate::domain::DomainError;

/// Longest cache TTL accepted (30 days)
pub const MAX_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Response cache behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachePolicy {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CachePolicy {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Switches for optional behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// When off, upstream payloads are returned untransformed and uncached
    #[serde(default = "default_true")]
    pub proxy_enabled: bool,

    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            proxy_enabled: true,
            metrics_enabled: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_ttl_secs() -> u64 {
    3600
}

/// Live settings consulted on every request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxySettings {
    #[serde(default)]
    pub transformation: TransformConfig,

    #[serde(default)]
    pub cache: CachePolicy,

    #[serde(default)]
    pub feature_flags: FeatureFlags,
}

impl ProxySettings {
    pub fn validate(&self) -> Result<(), DomainError> {
        self.transformation.validate()?;

        if self.cache.ttl_secs == 0 || self.cache.ttl_secs > MAX_TTL_SECS {
            return Err(DomainError::configuration(format!(
                "cache ttl_secs must be between 1 and {}, got {}",
                MAX_TTL_SECS, self.cache.ttl_secs
            )));
        }

        Ok(())
    }

    /// Applies a partial JSON update on top of these settings.
    ///
    /// Nested objects merge key by key; any other value replaces the
    /// existing one. The result is validated before it is returned.
    pub fn merged(&self, patch: &Value) -> Result<Self, DomainError> {
        if !patch.is_object() {
            return Err(DomainError::validation(
                "configuration update must be a JSON object",
            ));
        }

        let mut current = serde_json::to_value(self)
            .map_err(|e| DomainError::internal(format!("Failed to serialize settings: {}", e)))?;
        merge_json(&mut current, patch);

        let updated: ProxySettings = serde_json::from_value(current)
            .map_err(|e| DomainError::validation(format!("Invalid configuration update: {}", e)))?;
        updated.validate()?;

        Ok(updated)
    }
}

/// Deep merge of `patch` into `target`
pub fn merge_json(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_json(existing, value)
                    }
                    _ => {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::niche_scout::BelowThresholdPolicy;
    use serde_json::json;

    #[test]
    fn test_defaults_are_valid() {
        let settings = ProxySettings::default();

        assert!(settings.validate().is_ok());
        assert!(settings.cache.enabled);
        assert_eq!(settings.cache.ttl(), Duration::from_secs(3600));
        assert!(settings.feature_flags.proxy_enabled);
        assert!(settings.feature_flags.metrics_enabled);
    }

    #[test]
    fn test_merge_json_is_deep() {
        let mut target = json!({"a": {"b": 1, "c": 2}, "d": [1, 2]});
        merge_json(&mut target, &json!({"a": {"c": 3}, "d": [9], "e": true}));

        assert_eq!(target, json!({"a": {"b": 1, "c": 3}, "d": [9], "e": true}));
    }

    #[test]
    fn test_merged_partial_update() {
        let settings = ProxySettings::default();
        let updated = settings
            .merged(&json!({
                "transformation": {"similarity_threshold": 0.7, "below_threshold": "drop"},
                "feature_flags": {"proxy_enabled": false}
            }))
            .unwrap();

        assert_eq!(updated.transformation.similarity_threshold, 0.7);
        assert_eq!(
            updated.transformation.below_threshold,
            BelowThresholdPolicy::Drop
        );
        assert_eq!(updated.transformation.weights, settings.transformation.weights);
        assert!(!updated.feature_flags.proxy_enabled);
        assert!(updated.feature_flags.metrics_enabled);
    }

    #[test]
    fn test_merged_rejects_invalid_weights() {
        let err = ProxySettings::default()
            .merged(&json!({"transformation": {"weights": {"levenshtein": 0.4}}}))
            .unwrap_err();

        assert!(err.is_configuration());
    }

    #[test]
    fn test_merged_rejects_zero_ttl() {
        let err = ProxySettings::default()
            .merged(&json!({"cache": {"ttl_secs": 0}}))
            .unwrap_err();

        assert!(err.to_string().contains("ttl_secs"));
    }

    #[test]
    fn test_merged_rejects_oversized_ttl() {
        let err = ProxySettings::default()
            .merged(&json!({"cache": {"ttl_secs": u64::MAX}}))
            .unwrap_err();
        assert!(err.is_configuration());

        let settings = ProxySettings::default()
            .merged(&json!({"cache": {"ttl_secs": MAX_TTL_SECS}}))
            .unwrap();
        assert_eq!(settings.cache.ttl_secs, MAX_TTL_SECS);
    }

    #[test]
    fn test_merged_rejects_wrong_types() {
        let err = ProxySettings::default()
            .merged(&json!({"cache": {"enabled": "yes"}}))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));

        assert!(ProxySettings::default().merged(&json!([1])).is_err());
    }
}
