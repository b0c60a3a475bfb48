use crate::api::ErrorResponse;
use crate::api::extract::Json;
use crate::auth::{create_session, verify_password};
use crate::db::lower;
use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;
use crate::AppState;
use axum::extract::State;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub auth_token: String,
}

const BAD_CREDENTIALS: &str = "Unable to log in with provided credentials.";

#[utoipa::path(
    post,
    path = "/api/auth/token/login/",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"email": "cook@example.com", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let mut conn = state.conn()?;

    let user: Option<User> = users::table
        .filter(lower(users::email).eq(req.email.trim().to_lowercase()))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    let Some(user) = user else {
        return Err(ApiError::BadRequest(BAD_CREDENTIALS.to_string()));
    };

    if !verify_password(&req.password, &user.password_hash) {
        tracing::info!("Failed login for user {}", user.id);
        return Err(ApiError::BadRequest(BAD_CREDENTIALS.to_string()));
    }

    let auth_token = create_session(&mut conn, user.id, state.config.session_ttl_days)?;

    Ok(Json(LoginResponse { auth_token }))
}
