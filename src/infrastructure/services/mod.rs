//! Infrastructure services

mod niche_scout_service;
mod settings_service;

pub use niche_scout_service::NicheScoutService;
pub use settings_service::{LiveSettings, SettingsService};
