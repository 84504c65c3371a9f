//! Niche-scout proxy service
//!
//! Cache lookup, upstream call, similarity transformation and cache store
//! for a single niche-scout request.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::settings_service::SettingsService;
use crate::domain::niche_scout::{attach_meta, mark_cache_hit, ResponseMeta};
use crate::domain::{DomainError, NicheScoutRequest};
use crate::infrastructure::cache::{Lookup, ResponseCache};
use crate::infrastructure::observability::{
    record_cache_lookup, record_cache_operation, record_transformation, record_upstream_request,
    CacheLookupResult,
};
use crate::infrastructure::upstream::{fallback, UpstreamClient};

#[derive(Debug)]
pub struct NicheScoutService {
    cache: Arc<ResponseCache>,
    upstream: Arc<dyn UpstreamClient>,
    settings: Arc<SettingsService>,
    mock_fallback: bool,
}

impl NicheScoutService {
    pub fn new(
        cache: Arc<ResponseCache>,
        upstream: Arc<dyn UpstreamClient>,
        settings: Arc<SettingsService>,
    ) -> Self {
        Self {
            cache,
            upstream,
            settings,
            mock_fallback: false,
        }
    }

    /// Serve a canned payload instead of failing when the upstream is down
    pub fn with_mock_fallback(mut self, enabled: bool) -> Self {
        self.mock_fallback = enabled;
        self
    }

    pub async fn handle(&self, request: &NicheScoutRequest) -> Result<Value, DomainError> {
        let started = Instant::now();
        let live = self.settings.snapshot().await;
        let flags = &live.settings.feature_flags;
        let metrics_enabled = flags.metrics_enabled;

        if !flags.proxy_enabled {
            let raw = self.call_upstream(request, metrics_enabled).await?;
            let mut meta = ResponseMeta::passthrough();
            meta.processing_time_ms = elapsed_ms(started);
            return Ok(attach_meta(raw, &meta));
        }

        let cache_enabled = live.settings.cache.enabled;
        let cache_key = request.cache_key();

        if cache_enabled {
            let lookup = self.cache.get(&cache_key).await;

            if metrics_enabled {
                let result = match &lookup {
                    Lookup::Hit(_) => CacheLookupResult::Hit,
                    Lookup::Miss => CacheLookupResult::Miss,
                    Lookup::Unavailable => CacheLookupResult::Error,
                };
                record_cache_lookup(result, self.cache.hit_ratio());
            }

            if let Lookup::Hit(mut payload) = lookup {
                mark_cache_hit(&mut payload, elapsed_ms(started));
                info!(cache_key = %cache_key, "Cache hit");
                return Ok(payload);
            }

            debug!(cache_key = %cache_key, "Cache miss");
        }

        let raw = self.call_upstream(request, metrics_enabled).await?;
        let is_mock = fallback::is_mock(&raw);

        let transform_started = Instant::now();
        let outcome = live.transformer.transform(raw, request);

        if metrics_enabled {
            if let Some(relevance) = &outcome.meta.relevance {
                record_transformation(transform_started.elapsed(), outcome.meta.degraded, relevance);
            }
        }

        let response = outcome.into_response(elapsed_ms(started));

        if cache_enabled && !is_mock {
            let ttl = live.settings.cache.ttl();
            let stored = self.cache.set(&cache_key, &response, ttl).await;

            if metrics_enabled {
                record_cache_operation("set", stored);
            }
        }

        Ok(response)
    }

    async fn call_upstream(
        &self,
        request: &NicheScoutRequest,
        metrics_enabled: bool,
    ) -> Result<Value, DomainError> {
        let started = Instant::now();
        let result = self.upstream.niche_scout(request).await;

        if metrics_enabled {
            record_upstream_request(result.is_ok(), started.elapsed());
        }

        match result {
            Ok(payload) => {
                debug!(duration_ms = elapsed_ms(started), "Upstream responded");
                Ok(payload)
            }
            Err(e) if self.mock_fallback => {
                warn!(error = %e, "Upstream call failed, serving mock data");
                Ok(fallback::mock_niche_scout(
                    request.effective_query(),
                    request.effective_category(),
                ))
            }
            Err(e) => {
                warn!(error = %e, duration_ms = elapsed_ms(started), "Upstream call failed");
                Err(e)
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
