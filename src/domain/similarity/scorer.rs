//! Weighted blend of the three string metrics

use serde::Serialize;

use super::weights::SimilarityWeights;
use super::{jaccard, jaro_winkler, levenshtein};
use crate::domain::DomainError;

/// Per-metric scores behind a blended similarity value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub levenshtein: f64,
    /// `None` when neither side has more than one token
    pub jaccard: Option<f64>,
    pub jaro_winkler: f64,
    pub substring_match: bool,
    pub score: f64,
}

impl ScoreBreakdown {
    fn fixed(score: f64) -> Self {
        Self {
            levenshtein: score,
            jaccard: Some(score),
            jaro_winkler: score,
            substring_match: score == 1.0,
            score,
        }
    }
}

/// Case-insensitive string similarity in [0, 1].
///
/// Symmetric in its arguments. Jaccard only takes part when at least one side
/// contains whitespace; for single-token pairs its weight is shared between
/// the other two metrics in proportion to their own weights. When one string
/// contains the other, the score is raised to at least `substring_boost`.
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    weights: SimilarityWeights,
    substring_boost: f64,
}

impl SimilarityScorer {
    pub fn new(weights: SimilarityWeights, substring_boost: f64) -> Result<Self, DomainError> {
        weights.validate()?;

        if !substring_boost.is_finite() || !(0.0..=1.0).contains(&substring_boost) {
            return Err(DomainError::configuration(format!(
                "substring boost must be between 0 and 1, got {}",
                substring_boost
            )));
        }

        Ok(Self {
            weights,
            substring_boost,
        })
    }

    pub fn weights(&self) -> &SimilarityWeights {
        &self.weights
    }

    pub fn substring_boost(&self) -> f64 {
        self.substring_boost
    }

    /// Similarity of two optional strings; missing on both sides counts as equal
    pub fn score(&self, a: Option<&str>, b: Option<&str>) -> f64 {
        match (a, b) {
            (None, None) => 1.0,
            (None, _) | (_, None) => 0.0,
            (Some(a), Some(b)) => self.breakdown(a, b).score,
        }
    }

    pub fn score_str(&self, a: &str, b: &str) -> f64 {
        self.breakdown(a, b).score
    }

    pub fn breakdown(&self, a: &str, b: &str) -> ScoreBreakdown {
        let a = a.to_lowercase();
        let b = b.to_lowercase();

        match (a.is_empty(), b.is_empty()) {
            (true, true) => return ScoreBreakdown::fixed(1.0),
            (true, false) | (false, true) => return ScoreBreakdown::fixed(0.0),
            _ => {}
        }

        if a == b {
            return ScoreBreakdown::fixed(1.0);
        }

        // Fixed argument order keeps the greedy Jaro matching symmetric
        let (x, y) = if a <= b { (&a, &b) } else { (&b, &a) };
        let x_chars: Vec<char> = x.chars().collect();
        let y_chars: Vec<char> = y.chars().collect();

        let lev = levenshtein::similarity(&x_chars, &y_chars);
        let jw = jaro_winkler::similarity(&x_chars, &y_chars);
        let multi_token = x.contains(char::is_whitespace) || y.contains(char::is_whitespace);
        let jac = multi_token.then(|| jaccard::similarity(x, y));

        let w = &self.weights;
        let blended = match jac {
            Some(jac) => w.levenshtein * lev + w.jaccard * jac + w.jaro_winkler * jw,
            None => {
                let remaining = w.levenshtein + w.jaro_winkler;
                if remaining > 0.0 {
                    (w.levenshtein * lev + w.jaro_winkler * jw) / remaining * w.sum()
                } else {
                    0.0
                }
            }
        };

        let substring_match = x.contains(y.as_str()) || y.contains(x.as_str());
        let boosted = if substring_match {
            blended.max(self.substring_boost)
        } else {
            blended
        };

        ScoreBreakdown {
            levenshtein: lev,
            jaccard: jac,
            jaro_winkler: jw,
            substring_match,
            score: boosted.clamp(0.0, 1.0),
        }
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self {
            weights: SimilarityWeights::default(),
            substring_boost: 0.8,
        }
    }
}
