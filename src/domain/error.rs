use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Upstream unavailable: {message}")]
    Upstream { message: String },

    #[error("Transformation error: {message}")]
    Transformation { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    pub fn transformation(message: impl Into<String>) -> Self {
        Self::Transformation {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this is a configuration problem that must stop the service
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let error = DomainError::configuration("weights must sum to 1.0");
        assert_eq!(
            error.to_string(),
            "Configuration error: weights must sum to 1.0"
        );
        assert!(error.is_configuration());
    }

    #[test]
    fn test_upstream_error() {
        let error = DomainError::upstream("connection refused");
        assert_eq!(error.to_string(), "Upstream unavailable: connection refused");
        assert!(!error.is_configuration());
    }

    #[test]
    fn test_transformation_error() {
        let error = DomainError::transformation("field 'niches' is missing");
        assert_eq!(
            error.to_string(),
            "Transformation error: field 'niches' is missing"
        );
    }

    #[test]
    fn test_cache_error() {
        let error = DomainError::cache("Redis down");
        assert_eq!(error.to_string(), "Cache error: Redis down");
    }
}
