use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::niche_scout::TransformConfig;
use crate::domain::{CachePolicy, DomainError, FeatureFlags, ProxySettings};
use crate::infrastructure::cache::{CacheConfig, CacheType};
use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::upstream::UpstreamConfig;

/// Length in hex characters of a generated admin token
const GENERATED_TOKEN_LEN: usize = 48;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub transformation: TransformConfig,
    #[serde(default)]
    pub feature_flags: FeatureFlags,
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Response cache backend and policy
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub backend: CacheType,
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default)]
    pub key_prefix: Option<String>,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Shared secret for the admin endpoints
    #[serde(default)]
    pub admin_token: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3020
}

fn default_level() -> String {
    "info".to_string()
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_true() -> bool {
    true
}

fn default_max_capacity() -> u64 {
    10_000
}

fn default_store_timeout_ms() -> u64 {
    500
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheType::default(),
            redis_url: None,
            key_prefix: None,
            ttl_secs: default_ttl_secs(),
            enabled: true,
            max_capacity: default_max_capacity(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl CacheSettings {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn backend_config(&self) -> CacheConfig {
        CacheConfig {
            cache_type: self.backend,
            redis_url: self.redis_url.clone().filter(|url| !url.is_empty()),
            key_prefix: self.key_prefix.clone().filter(|prefix| !prefix.is_empty()),
            max_capacity: self.max_capacity,
            connect_timeout: self.store_timeout(),
        }
    }
}

impl SecurityConfig {
    /// Configured admin token, or a freshly generated random one
    pub fn resolve_admin_token(&self) -> (String, bool) {
        match self.admin_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => (token.to_string(), false),
            None => (generate_token(), true),
        }
    }
}

fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    (0..GENERATED_TOKEN_LEN / 2)
        .map(|_| format!("{:02x}", rng.r#gen::<u8>()))
        .collect()
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Checks every setting that must hold before the server starts
    pub fn validate(&self) -> Result<(), DomainError> {
        self.proxy_settings().validate()?;

        if self.upstream.timeout_ms == 0 {
            return Err(DomainError::configuration(
                "upstream timeout_ms must be greater than 0",
            ));
        }

        if self.upstream.base_url.trim().is_empty() {
            return Err(DomainError::configuration("upstream base_url is required"));
        }

        if self.cache.store_timeout_ms == 0 {
            return Err(DomainError::configuration(
                "cache store_timeout_ms must be greater than 0",
            ));
        }

        if self.cache.backend == CacheType::Redis
            && self.cache.redis_url.as_deref().is_none_or(str::is_empty)
        {
            return Err(DomainError::configuration(
                "cache redis_url is required for the redis backend",
            ));
        }

        Ok(())
    }

    /// Initial runtime settings derived from the loaded configuration
    pub fn proxy_settings(&self) -> ProxySettings {
        ProxySettings {
            transformation: self.transformation.clone(),
            cache: CachePolicy {
                enabled: self.cache.enabled,
                ttl_secs: self.cache.ttl_secs,
            },
            feature_flags: self.feature_flags.clone(),
        }
    }
}
