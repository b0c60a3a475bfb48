use crate::api::ErrorResponse;
use crate::api::extract::Json;
use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::models::{NewTag, Tag};
use crate::schema::tags;
use crate::AppState;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;
use foodgram_core::validation::{self, MAX_TAG_LEN};
use foodgram_core::FieldErrors;
use serde::Deserialize;
use utoipa::ToSchema;

use super::{check_unique, TagResponse};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTagRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[utoipa::path(
    post,
    path = "/api/tags/",
    tag = "tags",
    request_body(content = CreateTagRequest, example = json!({"name": "Breakfast", "slug": "breakfast"})),
    responses(
        (status = 201, description = "Tag created successfully", body = TagResponse),
        (status = 400, description = "Invalid request or duplicate name/slug", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn create_tag(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(request): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagResponse>), ApiError> {
    let name = request.name.trim();
    let slug = request.slug.trim();

    let mut errors = FieldErrors::new();
    validation::required_text(&mut errors, "name", name, Some(MAX_TAG_LEN));
    validation::slug(&mut errors, slug);

    let mut conn = state.conn()?;
    check_unique(&mut conn, &mut errors, Some(name), Some(slug), None)?;
    errors.into_result()?;

    let tag: Tag = diesel::insert_into(tags::table)
        .values(NewTag { name, slug })
        .returning(Tag::as_returning())
        .get_result(&mut conn)?;

    tracing::info!("Admin {} created tag {} ({})", admin.id, tag.id, tag.slug);
    Ok((StatusCode::CREATED, Json(tag.into())))
}
