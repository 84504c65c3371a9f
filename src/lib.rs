//! Niche-Scout Proxy
//!
//! A caching proxy in front of the Social Intelligence API:
//! - Normalized request signatures as cache keys
//! - Redis or in-memory response cache with TTL and glob invalidation
//! - Similarity re-ranking of upstream niches (Levenshtein, Jaccard,
//!   Jaro-Winkler)

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    cache::{CacheFactory, ResponseCache},
    services::{NicheScoutService, SettingsService},
    upstream::{HttpUpstreamClient, UpstreamClient},
};
use tracing::{info, warn};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state from a validated configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let settings = Arc::new(SettingsService::new(config.proxy_settings())?);

    let backend = CacheFactory::new()
        .create(&config.cache.backend_config())
        .await?;
    info!(backend = backend.backend_name(), "Response cache ready");

    let response_cache = Arc::new(ResponseCache::new(backend, config.cache.store_timeout()));

    let upstream: Arc<dyn UpstreamClient> = Arc::new(HttpUpstreamClient::new(&config.upstream)?);

    if config.upstream.mock_fallback {
        warn!("Mock fallback enabled: upstream failures will be answered with canned data");
    }

    let niche_scout = Arc::new(
        NicheScoutService::new(response_cache.clone(), upstream, settings.clone())
            .with_mock_fallback(config.upstream.mock_fallback),
    );

    let (admin_token, generated) = config.security.resolve_admin_token();
    let hint = api::middleware::admin_auth::token_hint(Some(&admin_token));

    if generated {
        warn!(
            token = %hint,
            "No admin token configured, generated one for this run"
        );
    } else {
        info!(token = %hint, "Admin endpoints enabled");
    }

    Ok(AppState::new(niche_scout, settings, response_cache, admin_token))
}
