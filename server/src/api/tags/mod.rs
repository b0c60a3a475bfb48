pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use crate::error::ApiError;
use crate::models::Tag;
use crate::schema::tags;
use crate::AppState;
use axum::routing::get;
use axum::Router;
use diesel::dsl::exists;
use diesel::prelude::*;
use foodgram_core::FieldErrors;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Returns the router for /api/tags endpoints (mounted at /api/tags)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_tags).post(create::create_tag))
        .route(
            "/{id}",
            get(get::get_tag)
                .patch(update::update_tag)
                .delete(delete::delete_tag),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_tags,
        get::get_tag,
        create::create_tag,
        update::update_tag,
        delete::delete_tag,
    ),
    components(schemas(TagResponse, create::CreateTagRequest, update::UpdateTagRequest))
)]
pub struct ApiDoc;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            slug: tag.slug,
        }
    }
}

/// Record a field error for each of `name`/`slug` already used by another tag.
fn check_unique(
    conn: &mut PgConnection,
    errors: &mut FieldErrors,
    name: Option<&str>,
    slug: Option<&str>,
    except_id: Option<i32>,
) -> Result<(), ApiError> {
    // Serial ids start at 1, so 0 excludes nothing
    let except = except_id.unwrap_or(0);

    if let Some(name) = name {
        let taken: bool = diesel::select(exists(
            tags::table
                .filter(tags::name.eq(name))
                .filter(tags::id.ne(except)),
        ))
        .get_result(conn)?;
        if taken {
            errors.add("name", "A tag with this name already exists.");
        }
    }
    if let Some(slug) = slug {
        let taken: bool = diesel::select(exists(
            tags::table
                .filter(tags::slug.eq(slug))
                .filter(tags::id.ne(except)),
        ))
        .get_result(conn)?;
        if taken {
            errors.add("slug", "A tag with this slug already exists.");
        }
    }
    Ok(())
}
