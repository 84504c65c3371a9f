//! Niche-scout domain - request signature, similarity re-ranking and response envelope

mod config;
mod envelope;
mod relevance;
mod request;
mod transformer;

pub use config::{BelowThresholdPolicy, TransformConfig};
pub use envelope::{
    attach_meta, mark_cache_hit, ResponseMeta, PASSTHROUGH_VERSION, TRANSFORMATION_VERSION,
};
pub use relevance::{assess, Assessment, MatchType, MatchTypeCounts, RelevanceReport};
pub use request::{normalize, NicheScoutRequest, CACHE_NAMESPACE};
pub use transformer::{NicheTransformer, TransformOutcome};
