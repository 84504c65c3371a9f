//! Relevance classification of ranked niches against the search parameters

use serde::{Deserialize, Serialize};

/// Relevance granted to a label that contains the query
const PARTIAL_MATCH_SCORE: f64 = 0.8;

/// Relevance floor for a label that contains the category
const CATEGORY_MATCH_SCORE: f64 = 0.6;

/// Category value meaning "no category filter"
const ALL_CATEGORIES: &str = "all";

/// How a niche label relates to the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Partial,
    Category,
    None,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Partial => "partial",
            Self::Category => "category",
            Self::None => "none",
        }
    }

    pub fn is_relevant(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Per-label classification with its relevance value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub match_type: MatchType,
    pub relevance: f64,
}

/// Classifies one label.
///
/// `similarity` is the blended score of the label against the query and is
/// only consulted when the label neither equals nor contains the query.
pub fn assess(
    label: &str,
    query: Option<&str>,
    category: Option<&str>,
    similarity: f64,
    threshold: f64,
) -> Assessment {
    let label = label.trim().to_lowercase();
    let query = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty());
    let category = category
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty() && c != ALL_CATEGORIES);

    let mut match_type = MatchType::None;
    let mut relevance = 0.0;

    if let Some(query) = &query {
        if label == *query {
            match_type = MatchType::Exact;
            relevance = 1.0;
        } else if label.contains(query.as_str()) {
            match_type = MatchType::Partial;
            relevance = similarity.max(PARTIAL_MATCH_SCORE);
        } else {
            relevance = similarity;
            if similarity >= threshold {
                match_type = MatchType::Partial;
            }
        }
    }

    if let Some(category) = &category {
        if label.contains(category.as_str()) {
            if match_type == MatchType::None {
                match_type = MatchType::Category;
            }
            relevance = f64::max(relevance, CATEGORY_MATCH_SCORE);
        }
    }

    Assessment {
        match_type,
        relevance,
    }
}

/// Number of items per match type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTypeCounts {
    pub exact: usize,
    pub partial: usize,
    pub category: usize,
    pub none: usize,
}

impl MatchTypeCounts {
    fn record(&mut self, match_type: MatchType) {
        match match_type {
            MatchType::Exact => self.exact += 1,
            MatchType::Partial => self.partial += 1,
            MatchType::Category => self.category += 1,
            MatchType::None => self.none += 1,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MatchType, usize)> {
        [
            (MatchType::Exact, self.exact),
            (MatchType::Partial, self.partial),
            (MatchType::Category, self.category),
            (MatchType::None, self.none),
        ]
        .into_iter()
    }
}

/// Aggregate relevance of a transformed result set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelevanceReport {
    pub relevant_count: usize,
    pub relevant_ratio: f64,
    pub average_score: f64,
    pub match_types: MatchTypeCounts,
}

impl RelevanceReport {
    pub fn from_assessments<'a>(assessments: impl IntoIterator<Item = &'a Assessment>) -> Self {
        let mut match_types = MatchTypeCounts::default();
        let mut total = 0.0;
        let mut count = 0usize;

        for assessment in assessments {
            match_types.record(assessment.match_type);
            total += assessment.relevance;
            count += 1;
        }

        if count == 0 {
            return Self::default();
        }

        let relevant_count = match_types.exact + match_types.partial + match_types.category;

        Self {
            relevant_count,
            relevant_ratio: relevant_count as f64 / count as f64,
            average_score: total / count as f64,
            match_types,
        }
    }
}
