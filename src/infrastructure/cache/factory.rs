//! Cache factory for runtime selection

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::redis::{RedisCache, RedisCacheConfig};

/// Supported cache types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheType {
    /// In-memory cache using moka
    #[default]
    InMemory,
    /// Redis cache
    Redis,
}

impl std::fmt::Display for CacheType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheType::InMemory => write!(f, "in_memory"),
            CacheType::Redis => write!(f, "redis"),
        }
    }
}

/// Backend selection handed to [`CacheFactory`]
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub cache_type: CacheType,
    /// Required for [`CacheType::Redis`]
    pub redis_url: Option<String>,
    /// Namespace for Redis keys
    pub key_prefix: Option<String>,
    /// Entry bound for the in-memory backend
    pub max_capacity: u64,
    /// How long to wait for Redis at startup before falling back
    pub connect_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_type: CacheType::InMemory,
            redis_url: None,
            key_prefix: None,
            max_capacity: 10_000,
            connect_timeout: Duration::from_millis(500),
        }
    }
}

/// Factory for creating cache instances
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates a cache instance based on configuration.
    ///
    /// An unreachable Redis server is not fatal: the proxy starts on an
    /// in-memory store and logs the failure. A missing or malformed URL is.
    pub async fn create(&self, config: &CacheConfig) -> Result<Arc<dyn Cache>, DomainError> {
        match config.cache_type {
            CacheType::InMemory => Ok(Self::in_memory(config)),
            CacheType::Redis => {
                let url = config.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("Redis URL is required for Redis cache type")
                })?;

                let mut redis_config = RedisCacheConfig::new(url);
                if let Some(prefix) = &config.key_prefix {
                    redis_config = redis_config.with_key_prefix(prefix.clone());
                }

                let connected =
                    tokio::time::timeout(config.connect_timeout, RedisCache::new(redis_config))
                        .await;

                match connected {
                    Ok(Ok(cache)) => Ok(Arc::new(cache)),
                    Ok(Err(e)) if e.is_configuration() => Err(e),
                    Ok(Err(e)) => {
                        warn!(error = %e, "Redis unavailable, falling back to in-memory cache");
                        Ok(Self::in_memory(config))
                    }
                    Err(_) => {
                        warn!(
                            timeout_ms = config.connect_timeout.as_millis() as u64,
                            "Redis connection timed out, falling back to in-memory cache"
                        );
                        Ok(Self::in_memory(config))
                    }
                }
            }
        }
    }

    fn in_memory(config: &CacheConfig) -> Arc<dyn Cache> {
        let in_memory_config =
            InMemoryCacheConfig::default().with_max_capacity(config.max_capacity);

        Arc::new(InMemoryCache::with_config(in_memory_config))
    }
}
