//! Similarity-based re-ranking of upstream niche-scout payloads

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::config::{BelowThresholdPolicy, TransformConfig};
use super::envelope::{attach_meta, ResponseMeta};
use super::relevance::{assess, Assessment, RelevanceReport};
use super::request::NicheScoutRequest;
use crate::domain::similarity::SimilarityScorer;
use crate::domain::DomainError;

/// Array of candidate items in the upstream payload
const ITEMS_FIELD: &str = "niches";

/// Field of each item compared against the query
const LABEL_FIELD: &str = "name";

/// Upstream digest naming the standout niches; rebuilt after re-ranking
const SUMMARY_FIELD: &str = "analysis_summary";

/// Transformed payload together with the metadata describing it
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    pub payload: Value,
    pub meta: ResponseMeta,
}

impl TransformOutcome {
    /// Final response body with `meta` attached
    pub fn into_response(mut self, processing_time_ms: u64) -> Value {
        self.meta.processing_time_ms = processing_time_ms;
        attach_meta(self.payload, &self.meta)
    }
}

/// Scores each niche against the request query and re-ranks descending.
///
/// Stateless apart from its configuration; safe to share across requests.
#[derive(Debug, Clone)]
pub struct NicheTransformer {
    scorer: SimilarityScorer,
    config: TransformConfig,
}

impl NicheTransformer {
    pub fn new(config: TransformConfig) -> Result<Self, DomainError> {
        config.validate()?;
        let scorer = SimilarityScorer::new(config.weights, config.substring_boost)?;

        Ok(Self { scorer, config })
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    /// Re-ranks the upstream payload. Never fails: a payload without a
    /// usable item array is returned unscored with `meta.degraded` set and
    /// the cause in `meta.degraded_reason`.
    pub fn transform(&self, raw: Value, request: &NicheScoutRequest) -> TransformOutcome {
        let mut meta = ResponseMeta::transformed(self.config.similarity_threshold);

        let mut body = match raw {
            Value::Object(map) => map,
            other => {
                let err = DomainError::transformation(format!(
                    "upstream payload is {}, expected an object",
                    json_type(&other)
                ));
                return Self::degraded(other, meta, err);
            }
        };

        echo_request(&mut body, request);

        let items = match body.remove(ITEMS_FIELD) {
            Some(Value::Array(items)) if items.iter().all(Value::is_object) => items,
            other => {
                let err = DomainError::transformation(format!(
                    "field '{}' is {}, expected an array of objects",
                    ITEMS_FIELD,
                    other.as_ref().map(json_type).unwrap_or("missing")
                ));
                if let Some(value) = other {
                    body.insert(ITEMS_FIELD.to_string(), value);
                }
                return Self::degraded(Value::Object(body), meta, err);
            }
        };

        let items: Vec<Map<String, Value>> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();

        let query = request.effective_query();
        let category = request.effective_category();

        let (items, assessments) = match query {
            Some(query) => {
                let ranked = self.rank(items, query, category);
                meta.scored_item_count = ranked.0.len();
                ranked
            }
            None => {
                debug!("No query supplied, items left unscored");
                let assessments = items
                    .iter()
                    .map(|item| {
                        assess(
                            label_of(item).unwrap_or_default(),
                            None,
                            category,
                            0.0,
                            self.config.similarity_threshold,
                        )
                    })
                    .collect();
                (items, assessments)
            }
        };

        meta.relevance = Some(RelevanceReport::from_assessments(&assessments));

        match summarize(&items) {
            Some(summary) => {
                body.insert(SUMMARY_FIELD.to_string(), summary);
            }
            None => {
                body.remove(SUMMARY_FIELD);
            }
        }

        body.insert(
            ITEMS_FIELD.to_string(),
            Value::Array(items.into_iter().map(Value::Object).collect()),
        );

        TransformOutcome {
            payload: Value::Object(body),
            meta,
        }
    }

    fn degraded(payload: Value, mut meta: ResponseMeta, err: DomainError) -> TransformOutcome {
        warn!(error = %err, "Passing upstream payload through unscored");
        meta.degraded = true;
        meta.degraded_reason = Some(err.to_string());

        TransformOutcome { payload, meta }
    }

    fn rank(
        &self,
        items: Vec<Map<String, Value>>,
        query: &str,
        category: Option<&str>,
    ) -> (Vec<Map<String, Value>>, Vec<Assessment>) {
        let threshold = self.config.similarity_threshold;

        let mut scored: Vec<(f64, Map<String, Value>)> = items
            .into_iter()
            .map(|item| (self.scorer.score(label_of(&item), Some(query)), item))
            .collect();

        // Stable, so equal scores keep upstream order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let above = scored.iter().filter(|(score, _)| *score >= threshold).count();
        if self.config.below_threshold == BelowThresholdPolicy::Drop {
            let keep = above.max(self.config.default_niche_count.min(scored.len()));
            scored.truncate(keep);
        }

        let mut assessments = Vec::with_capacity(scored.len());
        let items = scored
            .into_iter()
            .enumerate()
            .map(|(index, (score, mut item))| {
                let assessment = assess(
                    label_of(&item).unwrap_or_default(),
                    Some(query),
                    category,
                    score,
                    threshold,
                );

                item.insert("relevance_score".to_string(), Value::from(score));
                item.insert("rank".to_string(), Value::from(index + 1));
                item.insert(
                    "match_type".to_string(),
                    Value::from(assessment.match_type.as_str()),
                );
                if self.config.below_threshold == BelowThresholdPolicy::Flag {
                    item.insert("below_threshold".to_string(), Value::Bool(score < threshold));
                }

                assessments.push(assessment);
                item
            })
            .collect();

        (items, assessments)
    }
}

fn label_of(item: &Map<String, Value>) -> Option<&str> {
    item.get(LABEL_FIELD).and_then(Value::as_str)
}

/// Fills `query`, `category` and `subcategory` from the request where the
/// upstream left them null or absent
fn echo_request(body: &mut Map<String, Value>, request: &NicheScoutRequest) {
    let missing = |body: &Map<String, Value>, field: &str| {
        body.get(field).map_or(true, Value::is_null)
    };

    if missing(body, "query") {
        body.insert("query".to_string(), Value::from(request.query.clone()));
    }

    if missing(body, "category") {
        body.insert("category".to_string(), Value::from(request.category.clone()));
    }

    if missing(body, "subcategory") {
        let joined = request
            .subcategories
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(|s| s.join(", "));
        body.insert("subcategory".to_string(), Value::from(joined));
    }
}

/// Rebuilds the analysis summary from the items that survived ranking.
///
/// Ties go to the earlier (higher ranked) item; an item set with no growth,
/// shorts or competition data names the top item throughout.
fn summarize(items: &[Map<String, Value>]) -> Option<Value> {
    let first = items.iter().find_map(label_of)?;

    let mut fastest: Option<(&str, f64)> = None;
    let mut lowest: Option<(&str, u8)> = None;
    let mut shorts: Option<&str> = None;

    for item in items {
        let Some(name) = label_of(item) else {
            continue;
        };

        if let Some(rate) = item.get("growth_rate").and_then(Value::as_f64) {
            if rate > fastest.map_or(0.0, |(_, best)| best) {
                fastest = Some((name, rate));
            }
        }

        if shorts.is_none() && item.get("shorts_friendly").and_then(Value::as_bool) == Some(true) {
            shorts = Some(name);
        }

        let level = competition_score(item.get("competition_level").and_then(Value::as_str));
        if level < lowest.map_or(3, |(_, best)| best) {
            lowest = Some((name, level));
        }
    }

    let mut summary = Map::new();
    summary.insert(
        "fastest_growing".to_string(),
        Value::from(fastest.map_or(first, |(name, _)| name)),
    );
    summary.insert(
        "most_shorts_friendly".to_string(),
        Value::from(shorts.unwrap_or(first)),
    );
    summary.insert(
        "lowest_competition".to_string(),
        Value::from(lowest.map_or(first, |(name, _)| name)),
    );

    Some(Value::Object(summary))
}

fn competition_score(level: Option<&str>) -> u8 {
    match level {
        Some("Low") => 1,
        Some("High") => 3,
        _ => 2,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
