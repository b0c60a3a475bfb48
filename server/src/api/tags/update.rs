use crate::api::ErrorResponse;
use crate::api::extract::{Json, Path};
use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::models::{Tag, TagChanges};
use crate::schema::tags;
use crate::AppState;
use axum::extract::State;
use diesel::prelude::*;
use foodgram_core::validation::{self, MAX_TAG_LEN};
use foodgram_core::FieldErrors;
use serde::Deserialize;
use utoipa::ToSchema;

use super::{check_unique, TagResponse};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[utoipa::path(
    patch,
    path = "/api/tags/{id}/",
    tag = "tags",
    params(
        ("id" = i32, Path, description = "Tag ID")
    ),
    request_body = UpdateTagRequest,
    responses(
        (status = 200, description = "Tag updated", body = TagResponse),
        (status = 400, description = "Invalid request or duplicate name/slug", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn update_tag(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateTagRequest>,
) -> Result<Json<TagResponse>, ApiError> {
    let name = request.name.as_deref().map(str::trim);
    let slug = request.slug.as_deref().map(str::trim);

    let mut errors = FieldErrors::new();
    if let Some(name) = name {
        validation::required_text(&mut errors, "name", name, Some(MAX_TAG_LEN));
    }
    if let Some(slug) = slug {
        validation::slug(&mut errors, slug);
    }

    let mut conn = state.conn()?;

    let existing = tags::table
        .find(id)
        .select(Tag::as_select())
        .first::<Tag>(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Tag"))?;

    check_unique(&mut conn, &mut errors, name, slug, Some(id))?;
    errors.into_result()?;

    if name.is_none() && slug.is_none() {
        return Ok(Json(existing.into()));
    }

    let tag: Tag = diesel::update(tags::table.find(id))
        .set(TagChanges { name, slug })
        .returning(Tag::as_returning())
        .get_result(&mut conn)?;

    Ok(Json(tag.into()))
}
