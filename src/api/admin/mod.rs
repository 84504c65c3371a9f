//! Admin endpoints for the cache and the runtime settings

pub mod cache;
pub mod config;

use axum::{
    routing::{delete, get},
    Router,
};

use super::state::AppState;

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/cache", delete(cache::invalidate_all))
        .route("/cache/stats", get(cache::cache_stats))
        .route("/cache/{pattern}", delete(cache::invalidate_pattern))
        .route("/config", get(config::get_config).post(config::update_config))
}
