//! Shared-secret authentication for the admin endpoints
//!
//! The token is accepted from either:
//! - the `token` query parameter (`DELETE /cache?token=...`)
//! - `Authorization: Bearer <token>`

use axum::{
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;

/// Message of every rejected admin request
pub const UNAUTHORIZED_MESSAGE: &str = "Invalid or missing token";

/// Extractor that rejects the request with 401 unless it carries the admin
/// token. Runs before the handler body, so a rejected request never
/// touches the cache or the settings.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdminToken;

impl FromRequestParts<AppState> for RequireAdminToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = extract_token(parts);

        match provided.as_deref() {
            Some(token) if tokens_match(token, &state.admin_token) => {
                debug!(path = %parts.uri.path(), "Admin token accepted");
                Ok(RequireAdminToken)
            }
            other => {
                warn!(
                    path = %parts.uri.path(),
                    provided_token = %token_hint(other),
                    "Unauthorized admin request"
                );
                Err(ApiError::unauthorized(UNAUTHORIZED_MESSAGE))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn extract_token(parts: &Parts) -> Option<String> {
    query_token(parts).or_else(|| {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    })
}

/// Percent-decoded `token` query parameter; a malformed query yields none
fn query_token(parts: &Parts) -> Option<String> {
    let Query(query) = Query::<TokenQuery>::try_from_uri(&parts.uri).ok()?;
    query.token.filter(|token| !token.is_empty())
}

/// Compares without short-circuiting on the first differing byte
fn tokens_match(provided: &str, expected: &str) -> bool {
    provided.len() == expected.len()
        && provided
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// First 8 characters of a token for log lines
pub fn token_hint(token: Option<&str>) -> String {
    match token {
        Some(token) => format!("{}...", token.chars().take(8).collect::<String>()),
        None => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(uri: &str, bearer: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);

        if let Some(token) = bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_token_from_query() {
        let parts = parts("/cache?token=abc123", None);
        assert_eq!(extract_token(&parts).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_token_from_query_among_other_params() {
        let parts = parts("/cache/stats?verbose=1&token=abc123", None);
        assert_eq!(extract_token(&parts).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_token_from_query_is_percent_decoded() {
        let parts = parts("/cache?token=s3cr3t%2Bkey%2Fx", None);
        assert_eq!(extract_token(&parts).as_deref(), Some("s3cr3t+key/x"));

        let parts2 = self::parts("/cache?tok%65n=abc", None);
        assert_eq!(extract_token(&parts2).as_deref(), Some("abc"));
    }

    #[test]
    fn test_token_from_bearer_header() {
        let parts = parts("/config", Some("abc123"));
        assert_eq!(extract_token(&parts).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(extract_token(&parts("/cache", None)), None);
        assert_eq!(extract_token(&parts("/cache?token=", None)), None);
    }

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match("secret", "secret"));
        assert!(!tokens_match("secret", "secreT"));
        assert!(!tokens_match("secret", "secret-longer"));
        assert!(!tokens_match("", "secret"));
    }

    #[test]
    fn test_token_hint() {
        assert_eq!(token_hint(Some("0123456789abcdef")), "01234567...");
        assert_eq!(token_hint(None), "none");
    }
}
