//! Request/response logging middleware with sensitive data redaction

use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, Query},
    http::{Request, Uri},
    middleware::Next,
    response::Response,
};
use tracing::info;

const REDACTED: &str = "[REDACTED]";

/// Query parameters whose values never reach the logs
const SENSITIVE_QUERY_PARAMS: &[&str] = &["token", "api_key"];

/// Logs every request and its completion.
/// Does not open a span of its own; `TraceLayer` already does.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = redact_uri(request.uri());
    let path = extract_path(&request);
    let request_id = extract_request_id(&request);
    let headers_log = redact_headers(&request);

    info!(
        method = %method,
        path = %path,
        uri = %uri,
        request_id = %request_id,
        headers = %headers_log,
        "Incoming request"
    );

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    response
}

fn extract_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Path and decoded query with sensitive parameter values replaced
fn redact_uri(uri: &Uri) -> String {
    if uri.query().is_none() {
        return uri.path().to_string();
    }

    let Ok(Query(pairs)) = Query::<Vec<(String, String)>>::try_from_uri(uri) else {
        return format!("{}?{}", uri.path(), REDACTED);
    };

    let redacted = pairs
        .iter()
        .map(|(key, value)| {
            if SENSITIVE_QUERY_PARAMS.contains(&key.as_str()) {
                format!("{}={}", key, REDACTED)
            } else {
                format!("{}={}", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", uri.path(), redacted)
}

fn redact_headers(request: &Request<Body>) -> String {
    let mut parts = Vec::new();

    for (name, value) in request.headers() {
        let name_str = name.as_str().to_lowercase();

        if !should_log_header(&name_str) {
            continue;
        }

        let value_str = if is_sensitive_header(&name_str) {
            REDACTED.to_string()
        } else {
            value.to_str().unwrap_or("[invalid]").to_string()
        };

        parts.push(format!("{}={}", name_str, value_str));
    }

    parts.join(", ")
}

fn is_sensitive_header(name: &str) -> bool {
    matches!(
        name,
        "authorization" | "x-api-key" | "cookie" | "proxy-authorization"
    )
}

fn should_log_header(name: &str) -> bool {
    matches!(
        name,
        "content-type"
            | "content-length"
            | "accept"
            | "user-agent"
            | "x-request-id"
            | "x-forwarded-for"
            | "authorization"
            | "x-api-key"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_uri_token() {
        let uri: Uri = "/cache/niche-scout:*?token=supersecret".parse().unwrap();
        let redacted = redact_uri(&uri);

        assert_eq!(redacted, "/cache/niche-scout:*?token=[REDACTED]");
        assert!(!redacted.contains("supersecret"));
    }

    #[test]
    fn test_redact_uri_keeps_other_params() {
        let uri: Uri = "/cache/stats?verbose=1&token=abc".parse().unwrap();
        assert_eq!(redact_uri(&uri), "/cache/stats?verbose=1&token=[REDACTED]");
    }

    #[test]
    fn test_redact_uri_decodes_before_matching() {
        let uri: Uri = "/cache?tok%65n=s3cr3t%2Bkey".parse().unwrap();
        let redacted = redact_uri(&uri);

        assert_eq!(redacted, "/cache?token=[REDACTED]");
        assert!(!redacted.contains("s3cr3t"));
    }

    #[test]
    fn test_redact_uri_without_query() {
        let uri: Uri = "/api/youtube/niche-scout".parse().unwrap();
        assert_eq!(redact_uri(&uri), "/api/youtube/niche-scout");
    }

    #[test]
    fn test_redact_headers() {
        let request = Request::builder()
            .header("x-api-key", "upstream-secret")
            .header("content-type", "application/json")
            .header("etag", "abc")
            .body(Body::empty())
            .unwrap();

        let logged = redact_headers(&request);

        assert!(logged.contains("x-api-key=[REDACTED]"));
        assert!(logged.contains("content-type=application/json"));
        assert!(!logged.contains("upstream-secret"));
        assert!(!logged.contains("etag"));
    }

    #[test]
    fn test_is_sensitive_header() {
        assert!(is_sensitive_header("authorization"));
        assert!(is_sensitive_header("x-api-key"));
        assert!(!is_sensitive_header("content-type"));
    }
}
