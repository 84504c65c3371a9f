use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::niche_scout::NicheScoutRequest;
use crate::domain::DomainError;

/// Header carrying the upstream API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Upstream Social Intelligence API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Serve a canned payload when the upstream call fails
    #[serde(default)]
    pub mock_fallback: bool,
}

fn default_base_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_path() -> String {
    "/api/youtube/niche-scout".to_string()
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            path: default_path(),
            timeout_ms: default_timeout_ms(),
            api_key: None,
            mock_fallback: false,
        }
    }
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }
}

/// Client for the niche-scout endpoint of the upstream API
#[async_trait]
pub trait UpstreamClient: Send + Sync + std::fmt::Debug {
    async fn niche_scout(&self, request: &NicheScoutRequest) -> Result<Value, DomainError>;
}

/// reqwest-backed upstream client with a bounded per-request timeout
#[derive(Debug, Clone)]
pub struct HttpUpstreamClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpUpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        if config.api_key.is_none() {
            tracing::warn!("No API key configured for the upstream API");
        }

        Ok(Self {
            client,
            url: config.url(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            timeout: config.timeout(),
        })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn niche_scout(&self, request: &NicheScoutRequest) -> Result<Value, DomainError> {
        let mut builder = self.client.post(&self.url).json(request);

        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                DomainError::upstream(format!(
                    "request timed out after {}ms",
                    self.timeout.as_millis()
                ))
            } else {
                DomainError::upstream(format!("Request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::upstream(format!(
                "HTTP {}: {}",
                status,
                error_body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::upstream(format!("Failed to parse response: {}", e)))
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct MockUpstreamClient {
        response: Mutex<Option<Value>>,
        error: Mutex<Option<String>>,
        calls: AtomicUsize,
    }

    impl MockUpstreamClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(self, response: Value) -> Self {
            *self.response.lock().unwrap() = Some(response);
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UpstreamClient for MockUpstreamClient {
        async fn niche_scout(&self, _request: &NicheScoutRequest) -> Result<Value, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::upstream(error));
            }

            self.response
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| DomainError::upstream("No mock response configured"))
        }
    }
}
