//! Drop-in replacements for axum's `Json`, `Query` and `Path` whose
//! rejections go through [`ApiError`], so malformed input gets the same JSON
//! error body as every other failure.

use crate::error::ApiError;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::QueryRejection;
use serde::Serialize;

/// JSON request body and response.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Query string. Repeated keys (`?tags=a&tags=b`) collect into a `Vec`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Undeserializable bodies are 400 like other invalid input; size
        // and content-type failures keep their own status.
        let status = match rejection.status() {
            StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
            other => other,
        };
        ApiError::Rejected(status, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected(StatusCode::BAD_REQUEST, rejection.to_string())
    }
}

impl From<PathRejection> for ApiError {
    // `/api/recipes/abc/` names no resource
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Path rejected: {}", rejection.body_text());
        ApiError::NotFound("Not found".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Amount {
        #[allow(dead_code)]
        amount: i32,
    }

    fn json_request(body: &str, content_type: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_out_of_range_value_is_json_400() {
        let request = json_request(r#"{"amount": 3000000000}"#, Some("application/json"));
        let error = Json::<Amount>::from_request(request, &()).await.unwrap_err();

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("amount"));
    }

    #[tokio::test]
    async fn test_syntax_error_is_json_400() {
        let request = json_request("{", Some("application/json"));
        let error = Json::<Amount>::from_request(request, &()).await.unwrap_err();
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_content_type_keeps_status() {
        let request = json_request(r#"{"amount": 1}"#, None);
        let error = Json::<Amount>::from_request(request, &()).await.unwrap_err();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_bad_query_is_json_400() {
        let (mut parts, _) = Request::builder()
            .uri("/?amount=lots")
            .body(())
            .unwrap()
            .into_parts();
        let error = Query::<Amount>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_repeated_query_keys_collect() {
        #[derive(Debug, Deserialize)]
        struct Tags {
            tags: Vec<String>,
        }

        let (mut parts, _) = Request::builder()
            .uri("/?tags=lunch&tags=dinner")
            .body(())
            .unwrap()
            .into_parts();
        let Query(tags) = Query::<Tags>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(tags.tags, vec!["lunch", "dinner"]);
    }
}
