use crate::api::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use foodgram_core::{ShortLinkError, ValidationError};
use thiserror::Error;

/// Error type shared by all handlers. Every variant maps to one HTTP status.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Authentication credentials were not provided")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Request body, query string or path that could not be extracted.
    #[error("{1}")]
    Rejected(StatusCode, String),

    #[error("Database error: {0}")]
    Database(#[from] DieselError),

    #[error("Database connection failed: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error(transparent)]
    ShortLink(#[from] ShortLinkError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Invalid input".to_string(),
                    fields: Some(e.0),
                },
            ),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, ErrorResponse::new(message)),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("Authentication credentials were not provided"),
            ),
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, ErrorResponse::new(message)),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, ErrorResponse::new(message)),
            ApiError::Rejected(status, message) => (status, ErrorResponse::new(message)),
            ApiError::Database(DieselError::NotFound) => {
                (StatusCode::NOT_FOUND, ErrorResponse::new("Not found"))
            }
            ApiError::Database(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                info,
            )) => {
                tracing::warn!("Unique constraint violated: {}", info.message());
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Object already exists"),
                )
            }
            ApiError::Database(DieselError::DatabaseError(
                DatabaseErrorKind::CheckViolation,
                info,
            )) => {
                tracing::warn!("Check constraint violated: {}", info.message());
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Invalid input"),
                )
            }
            other @ (ApiError::Database(_)
            | ApiError::Pool(_)
            | ApiError::ShortLink(_)
            | ApiError::Internal(_)) => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::not_found("Recipe"), StatusCode::NOT_FOUND),
            (
                ApiError::Rejected(StatusCode::PAYLOAD_TOO_LARGE, "x".into()),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                ApiError::Database(DieselError::NotFound),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::Validation(ValidationError::single("name", "blank")),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::ShortLink(ShortLinkError::Exhausted(32)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
