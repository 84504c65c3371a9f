//! String similarity - Levenshtein, Jaccard and Jaro-Winkler blended into one score

pub mod jaccard;
pub mod jaro_winkler;
pub mod levenshtein;
mod scorer;
mod weights;

pub use scorer::{ScoreBreakdown, SimilarityScorer};
pub use weights::{SimilarityWeights, WEIGHT_SUM_TOLERANCE};
