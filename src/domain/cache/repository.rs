//! Cache trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use super::key::KeyPattern;
use crate::domain::DomainError;

/// Key-value cache with TTL support
///
/// Values are raw JSON strings so the trait stays dyn-compatible.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Gets a raw JSON value from the cache
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Sets a raw JSON value in the cache with a TTL
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Deletes every live key matching a glob pattern, returning how many went
    async fn delete_pattern(&self, pattern: &KeyPattern) -> Result<usize, DomainError>;

    /// Returns approximate number of entries in the cache
    async fn size(&self) -> Result<usize, DomainError>;

    /// Verifies the backing store is reachable
    async fn ping(&self) -> Result<(), DomainError> {
        self.size().await.map(|_| ())
    }

    /// Short backend name for status reporting
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock cache for testing; can be switched into a failing state
    #[derive(Debug)]
    pub struct MockCache {
        entries: Mutex<HashMap<String, String>>,
        error: Mutex<Option<String>>,
        set_calls: AtomicUsize,
    }

    impl Default for MockCache {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockCache {
        pub fn new() -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
                error: Mutex::new(None),
                set_calls: AtomicUsize::new(0),
            }
        }

        pub fn with_entry(self, key: &str, raw: &str) -> Self {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), raw.to_string());
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn set_calls(&self) -> usize {
            self.set_calls.load(Ordering::SeqCst)
        }

        pub fn keys(&self) -> Vec<String> {
            let mut keys: Vec<String> = self.entries.lock().unwrap().keys().cloned().collect();
            keys.sort();
            keys
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::cache(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Cache for MockCache {
        async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
            self.check_error()?;
            let entries = self.entries.lock().unwrap();

            Ok(entries.get(key).cloned())
        }

        async fn set_raw(&self, key: &str, value: &str, _ttl: Duration) -> Result<(), DomainError> {
            self.set_calls.fetch_add(1, Ordering::SeqCst);
            self.check_error()?;
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete_pattern(&self, pattern: &KeyPattern) -> Result<usize, DomainError> {
            self.check_error()?;

            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|k, _| !pattern.matches(k));

            Ok(before - entries.len())
        }

        async fn size(&self) -> Result<usize, DomainError> {
            self.check_error()?;
            Ok(self.entries.lock().unwrap().len())
        }

        fn backend_name(&self) -> &'static str {
            "mock"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_cache_set_get() {
            let cache = MockCache::new();
            cache
                .set_raw("key1", "\"value1\"", Duration::from_secs(60))
                .await
                .unwrap();

            let result = cache.get_raw("key1").await.unwrap();
            assert_eq!(result.as_deref(), Some("\"value1\""));
            assert_eq!(cache.set_calls(), 1);
        }

        #[tokio::test]
        async fn test_mock_cache_with_error() {
            let cache = MockCache::new().with_error("Test error");

            assert!(cache.get_raw("key").await.is_err());
            assert!(cache.ping().await.is_err());
        }

        #[tokio::test]
        async fn test_mock_cache_delete_pattern() {
            let cache = MockCache::new()
                .with_entry("niche-scout:a", "1")
                .with_entry("niche-scout:b", "2")
                .with_entry("proxy:config", "3");

            let deleted = cache
                .delete_pattern(&KeyPattern::new("niche-scout:*"))
                .await
                .unwrap();
            assert_eq!(deleted, 2);
            assert_eq!(cache.keys(), vec!["proxy:config".to_string()]);
        }
    }
}
