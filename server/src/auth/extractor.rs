use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::models::User;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::db::get_user_from_token;

/// Extractor that validates the Authorization header and provides the authenticated user.
///
/// Accepts `Authorization: Token <token>` as well as `Bearer <token>`:
/// ```ignore
/// async fn my_handler(AuthUser(user): AuthUser) -> impl IntoResponse {
///     // user is the authenticated User
/// }
/// ```
pub struct AuthUser(pub User);

/// Like [`AuthUser`], but also keeps the raw token of the current session.
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Anonymous access allowed. A header that is present but invalid is still
/// rejected with 401.
pub struct MaybeUser(pub Option<User>);

/// Authenticated user with the admin flag set.
pub struct AdminUser(pub User);

#[derive(Debug)]
pub enum AuthError {
    MissingHeader,
    InvalidHeader,
    InvalidFormat,
    InvalidToken,
    NotAdmin,
    Backend(ApiError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingHeader => (
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided",
            ),
            AuthError::InvalidHeader => (StatusCode::UNAUTHORIZED, "Invalid Authorization header"),
            AuthError::InvalidFormat => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format",
            ),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::NotAdmin => (
                StatusCode::FORBIDDEN,
                "You do not have permission to perform this action",
            ),
            AuthError::Backend(e) => return e.into_response(),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Token from the Authorization header, or `None` when the header is absent.
fn header_token(parts: &Parts) -> Result<Option<String>, AuthError> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidHeader)?;

    let token = auth_str
        .strip_prefix("Token ")
        .or_else(|| auth_str.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidFormat)?;

    Ok(Some(token.to_string()))
}

fn lookup(pool: &DbPool, token: &str) -> Result<User, AuthError> {
    let mut conn = pool
        .get()
        .map_err(|e| AuthError::Backend(ApiError::from(e)))?;

    get_user_from_token(&mut conn, token)
        .map_err(|e| AuthError::Backend(ApiError::from(e)))?
        .ok_or(AuthError::InvalidToken)
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = Arc::<DbPool>::from_ref(state);
        let token = header_token(parts)?.ok_or(AuthError::MissingHeader)?;
        let user = lookup(&pool, &token)?;
        Ok(AuthSession { user, token })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = AuthSession::from_request_parts(parts, state).await?;
        Ok(AuthUser(session.user))
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = header_token(parts)? else {
            return Ok(MaybeUser(None));
        };
        let pool = Arc::<DbPool>::from_ref(state);
        Ok(MaybeUser(Some(lookup(&pool, &token)?)))
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<DbPool>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(AuthError::NotAdmin);
        }
        Ok(AdminUser(user))
    }
}

impl MaybeUser {
    pub fn id(&self) -> Option<i32> {
        self.0.as_ref().map(|u| u.id)
    }
}
