use crate::api::ErrorResponse;
use crate::api::extract::Json;
use crate::auth::{delete_user_sessions, hash_password, verify_password, AuthSession};
use crate::error::ApiError;
use crate::schema::users;
use crate::AppState;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;
use foodgram_core::validation;
use foodgram_core::FieldErrors;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetPasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[utoipa::path(
    post,
    path = "/api/users/set_password/",
    tag = "users",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed; other sessions are closed"),
        (status = 400, description = "Wrong current password or blank new password", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn set_password(
    session: AuthSession,
    State(state): State<AppState>,
    Json(request): Json<SetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let mut errors = FieldErrors::new();
    validation::password(&mut errors, "new_password", &request.new_password);
    if !verify_password(&request.current_password, &session.user.password_hash) {
        errors.add("current_password", "Wrong password.");
    }
    errors.into_result()?;

    let password_hash = hash_password(&request.new_password)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;

    let mut conn = state.conn()?;
    conn.transaction::<_, ApiError, _>(|conn| {
        diesel::update(users::table.find(session.user.id))
            .set(users::password_hash.eq(&password_hash))
            .execute(conn)?;
        delete_user_sessions(conn, session.user.id, Some(&session.token))?;
        Ok(())
    })?;

    tracing::info!("User {} changed their password", session.user.id);
    Ok(StatusCode::NO_CONTENT)
}
