//! Inbound niche-scout request and its cache signature

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::cache::{
    escape_chars, CacheKeyGenerator, CacheKeyParams, DefaultKeyGenerator,
};

/// Namespace every niche-scout cache key starts with
pub const CACHE_NAMESPACE: &str = "niche-scout";

/// Body of `POST /api/youtube/niche-scout`, forwarded upstream as-is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicheScoutRequest {
    #[serde(default)]
    pub query: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategories: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographics: Option<Value>,
}

impl NicheScoutRequest {
    pub fn new(query: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            category: Some(category.into()),
            ..Default::default()
        }
    }

    pub fn with_subcategories<I, S>(mut self, subcategories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subcategories = Some(subcategories.into_iter().map(Into::into).collect());
        self
    }

    /// Query text, or `None` when absent or blank
    pub fn effective_query(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Category text, or `None` when absent or blank
    pub fn effective_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Deterministic cache key built from query, category and subcategories.
    ///
    /// Whitespace and case differences do not change the key, and
    /// subcategories are order-insensitive. Time range and demographics are
    /// not part of the key.
    pub fn cache_key(&self) -> String {
        let query = self.query.as_deref().map(normalize).unwrap_or_default();
        let category = self.category.as_deref().map(normalize).unwrap_or_default();

        let mut subcategories: Vec<String> = self
            .subcategories
            .iter()
            .flatten()
            .map(|s| normalize(s))
            .filter(|s| !s.is_empty())
            .map(|s| escape_chars(&s, &[',']))
            .collect();
        subcategories.sort();
        subcategories.dedup();

        let params = CacheKeyParams::new(query)
            .with_component("category", category)
            .with_component("subcategories", subcategories.join(","));

        DefaultKeyGenerator::new().generate_with_namespace(CACHE_NAMESPACE, &params)
    }
}

/// Lowercases and collapses internal whitespace runs to single spaces
pub fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
