use crate::api::ErrorResponse;
use crate::api::extract::{Json, Path};
use crate::error::ApiError;
use crate::models::Tag;
use crate::schema::tags;
use crate::AppState;
use axum::extract::State;
use diesel::prelude::*;

use super::TagResponse;

#[utoipa::path(
    get,
    path = "/api/tags/{id}/",
    tag = "tags",
    params(
        ("id" = i32, Path, description = "Tag ID")
    ),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    )
)]
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TagResponse>, ApiError> {
    let mut conn = state.conn()?;

    let tag = tags::table
        .find(id)
        .select(Tag::as_select())
        .first::<Tag>(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Tag"))?;

    Ok(Json(tag.into()))
}
