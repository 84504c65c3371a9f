//! Response envelope metadata

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::relevance::RelevanceReport;

/// Version tag of the similarity re-ranking
pub const TRANSFORMATION_VERSION: &str = "phase1-v1";

/// Version tag when the upstream payload is passed through untouched
pub const PASSTHROUGH_VERSION: &str = "none";

/// Metadata attached to every niche-scout response under `meta`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub cache_hit: bool,
    pub transformation_version: String,
    pub processing_time_ms: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_threshold: Option<f64>,

    #[serde(default)]
    pub scored_item_count: usize,

    #[serde(default)]
    pub degraded: bool,

    /// Why the payload was passed through unscored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<RelevanceReport>,
}

impl ResponseMeta {
    pub fn transformed(threshold: f64) -> Self {
        Self {
            cache_hit: false,
            transformation_version: TRANSFORMATION_VERSION.to_string(),
            processing_time_ms: 0,
            relevance_threshold: Some(threshold),
            scored_item_count: 0,
            degraded: false,
            degraded_reason: None,
            relevance: None,
        }
    }

    pub fn passthrough() -> Self {
        Self {
            cache_hit: false,
            transformation_version: PASSTHROUGH_VERSION.to_string(),
            processing_time_ms: 0,
            relevance_threshold: None,
            scored_item_count: 0,
            degraded: false,
            degraded_reason: None,
            relevance: None,
        }
    }
}

/// Writes `meta` into the payload.
///
/// Non-object payloads are wrapped as `{"data": payload, "meta": ...}`.
pub fn attach_meta(payload: Value, meta: &ResponseMeta) -> Value {
    let meta = serde_json::to_value(meta).unwrap_or(Value::Null);

    match payload {
        Value::Object(mut map) => {
            map.insert("meta".to_string(), meta);
            Value::Object(map)
        }
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map.insert("meta".to_string(), meta);
            Value::Object(map)
        }
    }
}

/// Marks a stored payload as served from cache with a fresh processing time
pub fn mark_cache_hit(payload: &mut Value, processing_time_ms: u64) {
    if let Some(meta) = payload.get_mut("meta").and_then(Value::as_object_mut) {
        meta.insert("cache_hit".to_string(), Value::Bool(true));
        meta.insert("processing_time_ms".to_string(), Value::from(processing_time_ms));
    }
}
