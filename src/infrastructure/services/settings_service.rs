//! Runtime settings service - Live, atomically replaceable proxy settings

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::niche_scout::NicheTransformer;
use crate::domain::{DomainError, ProxySettings};

/// Validated settings together with the transformer built from them
#[derive(Debug)]
pub struct LiveSettings {
    pub settings: ProxySettings,
    pub transformer: NicheTransformer,
}

impl LiveSettings {
    fn build(settings: ProxySettings) -> Result<Self, DomainError> {
        settings.validate()?;
        let transformer = NicheTransformer::new(settings.transformation.clone())?;

        Ok(Self {
            settings,
            transformer,
        })
    }
}

/// Holds the current settings snapshot.
///
/// Readers clone an `Arc` and keep a consistent view for the whole request
/// while an update swaps in a new snapshot.
#[derive(Debug)]
pub struct SettingsService {
    current: RwLock<Arc<LiveSettings>>,
}

impl SettingsService {
    pub fn new(settings: ProxySettings) -> Result<Self, DomainError> {
        Ok(Self {
            current: RwLock::new(Arc::new(LiveSettings::build(settings)?)),
        })
    }

    pub async fn snapshot(&self) -> Arc<LiveSettings> {
        self.current.read().await.clone()
    }

    pub async fn get(&self) -> ProxySettings {
        self.snapshot().await.settings.clone()
    }

    /// Deep-merges `patch` into the current settings and applies the result
    /// if it validates. On error the current settings stay in place.
    pub async fn update(&self, patch: &Value) -> Result<ProxySettings, DomainError> {
        let mut current = self.current.write().await;

        let updated = LiveSettings::build(current.settings.merged(patch)?)?;
        let settings = updated.settings.clone();
        *current = Arc::new(updated);

        info!(
            proxy_enabled = settings.feature_flags.proxy_enabled,
            cache_enabled = settings.cache.enabled,
            ttl_secs = settings.cache.ttl_secs,
            "Runtime settings updated"
        );

        Ok(settings)
    }
}
