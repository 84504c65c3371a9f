//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::cache::ResponseCache;
use crate::infrastructure::services::{NicheScoutService, SettingsService};

/// Application state shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub niche_scout: Arc<NicheScoutService>,
    pub settings: Arc<SettingsService>,
    pub response_cache: Arc<ResponseCache>,
    /// Shared secret guarding the admin endpoints
    pub admin_token: Arc<str>,
}

impl AppState {
    pub fn new(
        niche_scout: Arc<NicheScoutService>,
        settings: Arc<SettingsService>,
        response_cache: Arc<ResponseCache>,
        admin_token: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            niche_scout,
            settings,
            response_cache,
            admin_token: admin_token.into(),
        }
    }
}
