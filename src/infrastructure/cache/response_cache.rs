//! Response cache in front of the upstream API
//!
//! Wraps a [`Cache`] backend so that lookups fail open and stores fail soft:
//! a slow or unreachable store degrades to a miss instead of an error.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::cache::{Cache, KeyPattern};
use crate::domain::DomainError;

/// Outcome of a lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Hit(Value),
    Miss,
    /// The store failed or timed out; treated as a miss by callers
    Unavailable,
}

/// Point-in-time cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub backend: &'static str,
    /// `None` when the backend could not be queried
    pub entries: Option<usize>,
    pub hits: u64,
    pub misses: u64,
    pub hit_ratio: f64,
}

#[derive(Debug)]
pub struct ResponseCache {
    backend: Arc<dyn Cache>,
    store_timeout: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    pub fn new(backend: Arc<dyn Cache>, store_timeout: Duration) -> Self {
        Self {
            backend,
            store_timeout,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Looks up a stored response. Never fails.
    pub async fn get(&self, key: &str) -> Lookup {
        let result = self.bounded(self.backend.get_raw(key)).await;

        let lookup = match result {
            Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
                Ok(value) => Lookup::Hit(value),
                Err(e) => {
                    warn!(cache_key = %key, error = %e, "Discarding undecodable cache entry");
                    Lookup::Miss
                }
            },
            Ok(None) => Lookup::Miss,
            Err(e) => {
                warn!(cache_key = %key, error = %e, "Cache lookup failed, treating as miss");
                Lookup::Unavailable
            }
        };

        match lookup {
            Lookup::Hit(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            Lookup::Miss | Lookup::Unavailable => self.misses.fetch_add(1, Ordering::Relaxed),
        };

        lookup
    }

    /// Stores a response. Failures are logged and reported as `false`.
    pub async fn set(&self, key: &str, value: &Value, ttl: Duration) -> bool {
        let raw = value.to_string();

        match self.bounded(self.backend.set_raw(key, &raw, ttl)).await {
            Ok(()) => {
                debug!(cache_key = %key, ttl_secs = ttl.as_secs(), "Cached response");
                true
            }
            Err(e) => {
                warn!(cache_key = %key, error = %e, "Failed to cache response, continuing");
                false
            }
        }
    }

    /// Removes every entry matching the pattern. Errors are returned since
    /// the caller asked for this explicitly.
    pub async fn invalidate(&self, pattern: &KeyPattern) -> Result<usize, DomainError> {
        let removed = self.bounded(self.backend.delete_pattern(pattern)).await?;
        debug!(pattern = %pattern, removed, "Invalidated cache entries");
        Ok(removed)
    }

    pub async fn ping(&self) -> Result<(), DomainError> {
        self.bounded(self.backend.ping()).await
    }

    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed);
        let total = hits + self.misses.load(Ordering::Relaxed);

        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = match self.bounded(self.backend.size()).await {
            Ok(size) => Some(size),
            Err(e) => {
                warn!(error = %e, "Failed to read cache size");
                None
            }
        };

        CacheStats {
            backend: self.backend.backend_name(),
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            hit_ratio: self.hit_ratio(),
        }
    }

    async fn bounded<T>(
        &self,
        operation: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        tokio::time::timeout(self.store_timeout, operation)
            .await
            .map_err(|_| {
                DomainError::cache(format!(
                    "cache operation timed out after {}ms",
                    self.store_timeout.as_millis()
                ))
            })?
    }
}
