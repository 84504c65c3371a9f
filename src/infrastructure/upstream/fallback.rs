//! Canned niche-scout payload served when the upstream is down and the
//! mock fallback is switched on

use serde_json::{json, Value};

/// Marker field present on fallback payloads
pub const MOCK_MARKER: &str = "_mock";

pub fn mock_niche_scout(query: Option<&str>, category: Option<&str>) -> Value {
    json!({
        "date": chrono::Utc::now().format("%Y-%m-%d").to_string(),
        "query": query.unwrap_or_default(),
        "category": category.unwrap_or("All"),
        "niches": [
            {
                "name": "Mobile Gaming",
                "growth_rate": 87.5,
                "shorts_friendly": true,
                "competition_level": "Medium",
                "viewer_demographics": {
                    "age_groups": ["18-24", "25-34"],
                    "gender_split": {"male": 65, "female": 35}
                },
                "trending_topics": [
                    "Game development tutorials",
                    "Mobile gaming optimization",
                    "Indie game showcases"
                ],
                "top_channels": [
                    {"name": "MobileGamerPro", "subs": 2_800_000},
                    {"name": "GameHubMobile", "subs": 1_400_000}
                ]
            },
            {
                "name": "Game Development",
                "growth_rate": 72.1,
                "shorts_friendly": false,
                "competition_level": "Low",
                "viewer_demographics": {
                    "age_groups": ["25-34", "35-44"],
                    "gender_split": {"male": 80, "female": 20}
                },
                "trending_topics": [
                    "Unity tutorials",
                    "Game design principles",
                    "Indie publishing strategies"
                ],
                "top_channels": [
                    {"name": "GameDevHQ", "subs": 1_200_000},
                    {"name": "CodeMonkey", "subs": 980_000}
                ]
            },
            {
                "name": "Indie Games",
                "growth_rate": 65.3,
                "shorts_friendly": true,
                "competition_level": "Medium",
                "viewer_demographics": {
                    "age_groups": ["18-24", "25-34"],
                    "gender_split": {"male": 70, "female": 30}
                },
                "trending_topics": [
                    "Indie game reviews",
                    "Game jams",
                    "Pixel art tutorials"
                ],
                "top_channels": [
                    {"name": "IndieGameSpotlight", "subs": 850_000},
                    {"name": "PixelPerfect", "subs": 720_000}
                ]
            }
        ],
        MOCK_MARKER: true
    })
}

/// Whether a payload came from [`mock_niche_scout`]
pub fn is_mock(payload: &Value) -> bool {
    payload.get(MOCK_MARKER).and_then(Value::as_bool) == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_payload_shape() {
        let payload = mock_niche_scout(Some("gaming"), None);

        assert!(is_mock(&payload));
        assert_eq!(payload["query"], "gaming");
        assert_eq!(payload["category"], "All");
        assert_eq!(payload["niches"].as_array().unwrap().len(), 3);
        assert_eq!(payload["niches"][0]["name"], "Mobile Gaming");
    }

    #[test]
    fn test_is_mock_on_regular_payload() {
        assert!(!is_mock(&json!({"niches": []})));
        assert!(!is_mock(&json!([])));
    }
}
