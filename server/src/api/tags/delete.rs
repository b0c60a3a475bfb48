use crate::api::ErrorResponse;
use crate::api::extract::Path;
use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::schema::tags;
use crate::AppState;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;

#[utoipa::path(
    delete,
    path = "/api/tags/{id}/",
    tag = "tags",
    params(
        ("id" = i32, Path, description = "Tag ID")
    ),
    responses(
        (status = 204, description = "Tag deleted successfully"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn delete_tag(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.conn()?;

    let deleted = diesel::delete(tags::table.find(id)).execute(&mut conn)?;
    if deleted == 0 {
        return Err(ApiError::not_found("Tag"));
    }

    tracing::info!("Admin {} deleted tag {}", admin.id, id);
    Ok(StatusCode::NO_CONTENT)
}
