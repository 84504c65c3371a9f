//! JSON extractor answering malformed bodies in the API error format

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::{de::DeserializeOwned, Serialize};

use super::error::ApiError;

/// `axum::Json` whose rejections are always a 400 [`ApiError`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let AxumJson(value) = AxumJson::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::bad_request(rejection_message(&rejection)).with_code("json_parse_error")
            })?;

        Ok(Json(value))
    }
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err.body_text()),
        JsonRejection::MissingJsonContentType(_) => {
            "Missing Content-Type header. Expected 'application/json'.".to_string()
        }
        other => format!("Invalid JSON request: {}", other.body_text()),
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    fn json_request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_extracts_valid_body() {
        let request = json_request(Some("application/json"), r#"{"name": "gaming"}"#);
        let Json(named) = Json::<Named>::from_request(request, &()).await.unwrap();

        assert_eq!(named.name, "gaming");
    }

    #[tokio::test]
    async fn test_type_mismatch_is_400() {
        let request = json_request(Some("application/json"), r#"{"name": 1}"#);
        let err = Json::<Named>::from_request(request, &()).await.unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_400() {
        let request = json_request(None, r#"{"name": "gaming"}"#);
        let err = Json::<Named>::from_request(request, &()).await.unwrap_err();

        assert!(err.message().starts_with("Missing Content-Type"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
