//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;
use crate::domain::niche_scout::RelevanceReport;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("proxy_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path.clone();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("proxy_http_requests_total", &labels).increment(1);
    histogram!("proxy_http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("proxy_http_server_errors_total", &labels).increment(1);
    }
}

/// Result of a response-cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookupResult {
    Hit,
    Miss,
    Error,
}

impl CacheLookupResult {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::Error => "error",
        }
    }
}

/// Record a cache lookup and the running hit ratio
pub fn record_cache_lookup(result: CacheLookupResult, hit_ratio: f64) {
    counter!("proxy_cache_lookups_total", "result" => result.as_str()).increment(1);
    gauge!("proxy_cache_hit_ratio").set(hit_ratio);
}

/// Record a cache store operation (`set`, `invalidate`)
pub fn record_cache_operation(operation: &'static str, success: bool) {
    let status = if success { "success" } else { "error" };
    counter!("proxy_cache_operations_total", "operation" => operation, "status" => status)
        .increment(1);
}

/// Record an upstream API call
pub fn record_upstream_request(success: bool, duration: Duration) {
    let status = if success { "success" } else { "error" };

    counter!("proxy_upstream_requests_total", "status" => status).increment(1);
    histogram!("proxy_upstream_duration_seconds", "status" => status)
        .record(duration.as_secs_f64());
}

/// Record a completed transformation and the relevance of its result
pub fn record_transformation(duration: Duration, degraded: bool, relevance: &RelevanceReport) {
    histogram!("proxy_transform_duration_seconds").record(duration.as_secs_f64());

    if degraded {
        counter!("proxy_transform_degraded_total").increment(1);
    }

    gauge!("proxy_relevance_score").set(relevance.average_score);
    gauge!("proxy_relevant_niche_count").set(relevance.relevant_count as f64);

    for (match_type, count) in relevance.match_types.iter() {
        counter!("proxy_match_types_total", "type" => match_type.as_str()).increment(count as u64);
    }
}

/// Sanitize URL path for metric labels (remove IDs, limit cardinality)
fn sanitize_path(path: &str) -> String {
    if path == "/cache" || path.starts_with("/cache/") {
        return match path.strip_prefix("/cache/") {
            Some("stats") => "/cache/stats".to_string(),
            Some(_) => "/cache/{pattern}".to_string(),
            None => "/cache".to_string(),
        };
    }

    let sanitized = path
        .split('/')
        .map(|segment| {
            let is_id = (!segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()))
                || uuid::Uuid::parse_str(segment).is_ok();
            if is_id { "{id}" } else { segment }
        })
        .collect::<Vec<_>>()
        .join("/");

    // Truncate long paths
    sanitized.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::niche_scout::MatchTypeCounts;

    #[test]
    fn test_sanitize_path_uuid() {
        let path = "/items/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(sanitize_path(path), "/items/{id}");
    }

    #[test]
    fn test_sanitize_path_numeric_id() {
        assert_eq!(sanitize_path("/api/users/123/orders"), "/api/users/{id}/orders");
    }

    #[test]
    fn test_sanitize_path_cache_patterns() {
        assert_eq!(sanitize_path("/cache/niche-scout:*"), "/cache/{pattern}");
        assert_eq!(sanitize_path("/cache/stats"), "/cache/stats");
        assert_eq!(sanitize_path("/cache"), "/cache");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/api/youtube/niche-scout"), "/api/youtube/niche-scout");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert!(sanitize_path(path).len() <= 50);
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_cache_lookup(CacheLookupResult::Hit, 1.0);
        record_cache_operation("set", false);
        record_upstream_request(true, Duration::from_millis(20));
        record_transformation(
            Duration::from_millis(2),
            false,
            &RelevanceReport {
                relevant_count: 1,
                relevant_ratio: 1.0,
                average_score: 0.9,
                match_types: MatchTypeCounts {
                    exact: 1,
                    ..Default::default()
                },
            },
        );
    }
}
