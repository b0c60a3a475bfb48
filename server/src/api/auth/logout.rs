use crate::api::ErrorResponse;
use crate::auth::{delete_session, AuthSession};
use crate::error::ApiError;
use crate::AppState;
use axum::{extract::State, http::StatusCode};

#[utoipa::path(
    post,
    path = "/api/auth/token/logout/",
    tag = "auth",
    responses(
        (status = 204, description = "Session closed"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn logout(
    session: AuthSession,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.conn()?;
    delete_session(&mut conn, &session.token)?;
    Ok(StatusCode::NO_CONTENT)
}
