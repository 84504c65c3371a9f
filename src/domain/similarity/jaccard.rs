//! Token-set Jaccard index

use std::collections::HashSet;

/// `|A ∩ B| / |A ∪ B|` over whitespace tokens; an empty token set scores 0.0
pub fn similarity(a: &str, b: &str) -> f64 {
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();

    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();

    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_overlap() {
        assert!((similarity("mobile gaming", "gaming news") - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(similarity("indie games", "games indie"), 1.0);
        assert_eq!(similarity("cooking", "baking"), 0.0);
    }

    #[test]
    fn test_empty_token_set() {
        assert_eq!(similarity("", "gaming"), 0.0);
        assert_eq!(similarity("   ", "   "), 0.0);
    }

    #[test]
    fn test_duplicate_tokens_count_once() {
        assert_eq!(similarity("game game", "game"), 1.0);
    }
}
