//! Runtime configuration endpoints

use axum::extract::State;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::api::middleware::RequireAdminToken;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::ProxySettings;

#[derive(Debug, Clone, Serialize)]
pub struct UpdateConfigResponse {
    pub success: bool,
    pub message: String,
    pub config: ProxySettings,
}

/// GET /config - live runtime settings
pub async fn get_config(State(state): State<AppState>) -> Json<ProxySettings> {
    Json(state.settings.get().await)
}

/// POST /config - deep-merges a partial update into the runtime settings
pub async fn update_config(
    _admin: RequireAdminToken,
    State(state): State<AppState>,
    Json(patch): Json<Value>,
) -> Result<Json<UpdateConfigResponse>, ApiError> {
    info!(update = %patch, "Configuration update requested");

    match state.settings.update(&patch).await {
        Ok(config) => Ok(Json(UpdateConfigResponse {
            success: true,
            message: "Configuration updated successfully".to_string(),
            config,
        })),
        Err(e) => {
            warn!(error = %e, "Configuration update rejected");
            Err(e.into())
        }
    }
}
