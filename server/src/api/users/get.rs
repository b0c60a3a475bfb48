use crate::api::ErrorResponse;
use crate::api::extract::{Json, Path};
use crate::auth::MaybeUser;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::State;

use super::find_user;
use super::view::{user_response, UserResponse};

#[utoipa::path(
    get,
    path = "/api/users/{id}/",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    viewer: MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut conn = state.conn()?;
    let user = find_user(&mut conn, id)?;
    Ok(Json(user_response(
        &mut conn,
        &state.config,
        user,
        viewer.id(),
    )?))
}
