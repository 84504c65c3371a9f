//! Niche-scout proxy endpoint

use axum::extract::State;
use serde_json::Value;
use tracing::{error, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::NicheScoutRequest;

/// POST /api/youtube/niche-scout
pub async fn niche_scout(
    State(state): State<AppState>,
    Json(request): Json<NicheScoutRequest>,
) -> Result<Json<Value>, ApiError> {
    info!(
        query = request.query.as_deref().unwrap_or_default(),
        category = request.category.as_deref().unwrap_or_default(),
        "Niche-Scout request received"
    );

    match state.niche_scout.handle(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!(error = %e, "Niche-Scout request failed");
            Err(ApiError::niche_scout(e))
        }
    }
}
