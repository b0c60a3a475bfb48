use crate::api::extract::Json;
use crate::error::ApiError;
use crate::models::Tag;
use crate::schema::tags;
use crate::AppState;
use axum::extract::State;
use diesel::prelude::*;

use super::TagResponse;

#[utoipa::path(
    get,
    path = "/api/tags/",
    tag = "tags",
    responses(
        (status = 200, description = "All tags, ordered by name", body = Vec<TagResponse>)
    )
)]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagResponse>>, ApiError> {
    let mut conn = state.conn()?;

    let tags = tags::table
        .order(tags::name.asc())
        .select(Tag::as_select())
        .load::<Tag>(&mut conn)?;

    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}
