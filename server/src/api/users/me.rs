use crate::api::ErrorResponse;
use crate::api::extract::Json;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::State;

use super::view::{user_response, UserResponse};

#[utoipa::path(
    get,
    path = "/api/users/me/",
    tag = "users",
    responses(
        (status = 200, description = "The authenticated user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn get_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut conn = state.conn()?;
    let viewer = Some(user.id);
    Ok(Json(user_response(&mut conn, &state.config, user, viewer)?))
}
