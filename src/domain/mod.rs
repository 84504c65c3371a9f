//! Domain layer - Core business logic and entities

pub mod cache;
pub mod error;
pub mod niche_scout;
pub mod settings;
pub mod similarity;

pub use error::DomainError;
pub use niche_scout::{NicheScoutRequest, NicheTransformer, TransformConfig};
pub use settings::{CachePolicy, FeatureFlags, ProxySettings};
pub use similarity::{SimilarityScorer, SimilarityWeights};
