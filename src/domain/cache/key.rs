//! Cache key generation and key-pattern matching

use std::collections::BTreeMap;
use std::fmt::Debug;

/// Trait for generating cache keys from input data
pub trait CacheKeyGenerator: Send + Sync + Debug {
    /// Generates a cache key from the given components
    fn generate(&self, params: &CacheKeyParams) -> String;

    /// Generates a key with a namespace prefix
    fn generate_with_namespace(&self, namespace: &str, params: &CacheKeyParams) -> String {
        format!("{}:{}", namespace, self.generate(params))
    }
}

/// Parameters for cache key generation
#[derive(Debug, Clone, Default)]
pub struct CacheKeyParams {
    /// Primary identifier (e.g., normalized query text)
    pub primary: String,
    /// Secondary components (sorted for consistency)
    pub components: BTreeMap<String, String>,
}

impl CacheKeyParams {
    /// Creates new cache key parameters with a primary identifier
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            components: BTreeMap::new(),
        }
    }

    /// Adds a component to the key parameters
    pub fn with_component(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.components.insert(key.into(), value.into());
        self
    }
}

/// Default cache key generator producing readable `primary:k=v:k=v` keys.
///
/// The primary value and component values are passed through
/// [`escape_key_part`], so distinct parameters never yield the same key.
#[derive(Debug, Clone, Default)]
pub struct DefaultKeyGenerator;

impl DefaultKeyGenerator {
    /// Creates a new default key generator
    pub fn new() -> Self {
        Self
    }
}

impl CacheKeyGenerator for DefaultKeyGenerator {
    fn generate(&self, params: &CacheKeyParams) -> String {
        let mut parts = vec![escape_key_part(&params.primary)];

        for (k, v) in &params.components {
            parts.push(format!("{}={}", escape_key_part(k), escape_key_part(v)));
        }

        parts.join(":")
    }
}

/// Percent-encodes the key separators `:` and `=` along with `%` itself
pub fn escape_key_part(value: &str) -> String {
    escape_chars(value, &[':', '='])
}

/// Percent-encodes `%` and every character in `reserved`
pub fn escape_chars(value: &str, reserved: &[char]) -> String {
    let mut out = String::with_capacity(value.len());

    for c in value.chars() {
        if c == '%' || reserved.contains(&c) {
            out.push_str(&format!("%{:02X}", c as u32));
        } else {
            out.push(c);
        }
    }

    out
}

/// Glob-style key pattern where `*` matches any run of characters.
///
/// Every other character is literal, including `?` and `[`, which Redis would
/// otherwise treat as pattern syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern {
    raw: String,
}

impl KeyPattern {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Pattern matching every key
    pub fn all() -> Self {
        Self::new("*")
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if the pattern matches every key
    pub fn is_match_all(&self) -> bool {
        !self.raw.is_empty() && self.raw.chars().all(|c| c == '*')
    }

    /// Tests a key against the pattern
    pub fn matches(&self, key: &str) -> bool {
        let mut segments = self.raw.split('*');
        let first = segments.next().unwrap_or_default();

        let Some(mut rest) = key.strip_prefix(first) else {
            return false;
        };

        let remaining: Vec<&str> = segments.collect();

        // No wildcard at all: exact match
        let Some((last, middle)) = remaining.split_last() else {
            return rest.is_empty();
        };

        for segment in middle {
            if segment.is_empty() {
                continue;
            }

            match rest.find(segment) {
                Some(pos) => rest = &rest[pos + segment.len()..],
                None => return false,
            }
        }

        rest.len() >= last.len() && rest.ends_with(last)
    }

    /// Renders the pattern for Redis `SCAN MATCH`, escaping Redis glob syntax
    pub fn to_redis_pattern(&self) -> String {
        let mut out = String::with_capacity(self.raw.len());

        for c in self.raw.chars() {
            if matches!(c, '?' | '[' | ']' | '\\') {
                out.push('\\');
            }
            out.push(c);
        }

        out
    }
}

impl std::fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_params_with_components() {
        let params = CacheKeyParams::new("gaming")
            .with_component("category", "gaming")
            .with_component("subcategories", "mobile");

        assert_eq!(params.primary, "gaming");
        assert_eq!(params.components.len(), 2);
        assert_eq!(
            params.components.get("category"),
            Some(&"gaming".to_string())
        );
    }

    #[test]
    fn test_components_are_sorted() {
        let generator = DefaultKeyGenerator::new();

        let params = CacheKeyParams::new("test")
            .with_component("zebra", "z")
            .with_component("apple", "a")
            .with_component("mango", "m");

        assert_eq!(generator.generate(&params), "test:apple=a:mango=m:zebra=z");
    }

    #[test]
    fn test_generate_with_namespace() {
        let generator = DefaultKeyGenerator::new();
        let params = CacheKeyParams::new("cooking").with_component("category", "food");

        let key = generator.generate_with_namespace("niche-scout", &params);
        assert_eq!(key, "niche-scout:cooking:category=food");
    }

    #[test]
    fn test_separators_in_values_are_escaped() {
        let generator = DefaultKeyGenerator::new();

        let a = CacheKeyParams::new("a:category=b").with_component("category", "c");
        let b = CacheKeyParams::new("a").with_component("category", "b:category=c");

        assert_eq!(generator.generate(&a), "a%3Acategory%3Db:category=c");
        assert_eq!(generator.generate(&b), "a:category=b%3Acategory%3Dc");
        assert_ne!(generator.generate(&a), generator.generate(&b));
    }

    #[test]
    fn test_escape_chars() {
        assert_eq!(escape_chars("50%,x", &[',']), "50%25%2Cx");
        assert_eq!(escape_key_part("mobile gaming"), "mobile gaming");
    }

    #[test]
    fn test_pattern_prefix_match() {
        let pattern = KeyPattern::new("niche-scout:*");

        assert!(pattern.matches("niche-scout:gaming:category=gaming"));
        assert!(pattern.matches("niche-scout:"));
        assert!(!pattern.matches("proxy:config"));
        assert!(!pattern.matches("xniche-scout:gaming"));
    }

    #[test]
    fn test_pattern_infix_and_suffix() {
        let pattern = KeyPattern::new("user:*:profile");
        assert!(pattern.matches("user:1:profile"));
        assert!(pattern.matches("user::profile"));
        assert!(!pattern.matches("user:1:settings"));

        let pattern = KeyPattern::new("*:profile");
        assert!(pattern.matches("a:profile"));
        assert!(!pattern.matches("a:profile:x"));
    }

    #[test]
    fn test_pattern_overlapping_segments() {
        let pattern = KeyPattern::new("a*ab");
        assert!(pattern.matches("aab"));
        assert!(!pattern.matches("ab"));

        let pattern = KeyPattern::new("a*b*c");
        assert!(pattern.matches("abc"));
        assert!(pattern.matches("axxbyyc"));
        assert!(!pattern.matches("axxcyyb"));
    }

    #[test]
    fn test_pattern_exact_without_wildcard() {
        let pattern = KeyPattern::new("proxy:config");
        assert!(pattern.matches("proxy:config"));
        assert!(!pattern.matches("proxy:config:old"));
    }

    #[test]
    fn test_pattern_literal_regex_characters() {
        let pattern = KeyPattern::new("niche-scout:a.b:*");
        assert!(pattern.matches("niche-scout:a.b:x"));
        assert!(!pattern.matches("niche-scout:aXb:x"));
    }

    #[test]
    fn test_match_all() {
        assert!(KeyPattern::all().is_match_all());
        assert!(KeyPattern::new("**").is_match_all());
        assert!(!KeyPattern::new("a*").is_match_all());
        assert!(KeyPattern::all().matches(""));
        assert!(KeyPattern::all().matches("anything:at:all"));
    }

    #[test]
    fn test_redis_pattern_escaping() {
        let pattern = KeyPattern::new("niche-scout:q:subcategories=[a]?*");
        assert_eq!(
            pattern.to_redis_pattern(),
            r"niche-scout:q:subcategories=\[a\]\?*"
        );
    }
}
