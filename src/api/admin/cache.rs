//! Cache administration endpoints

use axum::extract::{Path, State};
use serde::Serialize;
use tracing::{error, info};

use crate::api::middleware::RequireAdminToken;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::cache::KeyPattern;
use crate::infrastructure::cache::CacheStats;
use crate::infrastructure::observability::record_cache_operation;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidateResponse {
    pub success: bool,
    pub message: String,
    pub keys_removed: usize,
}

/// DELETE /cache - removes every cached response
pub async fn invalidate_all(
    _admin: RequireAdminToken,
    State(state): State<AppState>,
) -> Result<Json<InvalidateResponse>, ApiError> {
    invalidate(&state, KeyPattern::all()).await
}

/// DELETE /cache/{pattern}
pub async fn invalidate_pattern(
    _admin: RequireAdminToken,
    State(state): State<AppState>,
    Path(pattern): Path<String>,
) -> Result<Json<InvalidateResponse>, ApiError> {
    invalidate(&state, KeyPattern::new(pattern)).await
}

/// GET /cache/stats
pub async fn cache_stats(
    _admin: RequireAdminToken,
    State(state): State<AppState>,
) -> Json<CacheStats> {
    Json(state.response_cache.stats().await)
}

async fn invalidate(
    state: &AppState,
    pattern: KeyPattern,
) -> Result<Json<InvalidateResponse>, ApiError> {
    info!(pattern = %pattern, "Cache invalidation requested");

    let result = state.response_cache.invalidate(&pattern).await;

    if state.settings.get().await.feature_flags.metrics_enabled {
        record_cache_operation("invalidate", result.is_ok());
    }

    match result {
        Ok(keys_removed) => Ok(Json(InvalidateResponse {
            success: true,
            message: format!("Cache invalidated for pattern: {}", pattern),
            keys_removed,
        })),
        Err(e) => {
            error!(pattern = %pattern, error = %e, "Failed to invalidate cache");
            Err(ApiError::internal(format!("Failed to invalidate cache: {}", e))
                .with_code("cache_error"))
        }
    }
}
