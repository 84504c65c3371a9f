//! Proxied upstream endpoints

pub mod niche_scout;

use axum::{routing::post, Router};

use super::state::AppState;

pub fn create_proxy_router() -> Router<AppState> {
    Router::new().route("/youtube/niche-scout", post(niche_scout::niche_scout))
}
