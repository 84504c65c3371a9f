//! Check-config command - loads and validates configuration without serving

use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Exits with an error when the configuration would be rejected at startup
pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    logging::init_logging(&config.logging);

    config.validate()?;

    let weights = config.transformation.weights;
    info!(
        levenshtein = weights.levenshtein,
        jaccard = weights.jaccard,
        jaro_winkler = weights.jaro_winkler,
        threshold = config.transformation.similarity_threshold,
        cache_backend = %config.cache.backend,
        ttl_secs = config.cache.ttl_secs,
        "Configuration is valid"
    );

    Ok(())
}
