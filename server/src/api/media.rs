//! Serves stored recipe images and avatars.

use crate::api::ErrorResponse;
use crate::api::extract::Path;
use crate::error::ApiError;
use crate::images;
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use utoipa::OpenApi;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new().route("/media/{id}", get(get_media))
}

#[derive(OpenApi)]
#[openapi(paths(get_media))]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/media/{id}",
    tag = "media",
    params(
        ("id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "image/*", body = Vec<u8>),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
pub async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let mut conn = state.conn()?;
    let (content_type, data) =
        images::load(&mut conn, id)?.ok_or_else(|| ApiError::not_found("Image"))?;

    // Images are never modified in place, only replaced under a new id
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        data,
    )
        .into_response())
}
