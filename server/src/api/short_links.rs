//! Public short links: `/s/<token>/` redirects to the recipe page.

use crate::api::ErrorResponse;
use crate::api::extract::Path;
use crate::error::ApiError;
use crate::schema::recipes;
use crate::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use diesel::prelude::*;
use foodgram_core::short_link::is_valid_token;
use utoipa::OpenApi;

pub fn router() -> Router<AppState> {
    Router::new().route("/s/{token}", get(follow_short_link))
}

#[derive(OpenApi)]
#[openapi(paths(follow_short_link))]
pub struct ApiDoc;

/// Frontend path of a recipe page.
pub fn recipe_path(id: i32) -> String {
    format!("/recipes/{}/", id)
}

#[utoipa::path(
    get,
    path = "/s/{token}/",
    tag = "recipes",
    params(
        ("token" = String, Path, description = "Short link token")
    ),
    responses(
        (status = 302, description = "Redirect to the recipe page"),
        (status = 404, description = "Unknown short link", body = ErrorResponse)
    )
)]
pub async fn follow_short_link(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    if !is_valid_token(&token) {
        return Err(ApiError::not_found("Short link"));
    }

    let mut conn = state.conn()?;
    let recipe_id: i32 = recipes::table
        .filter(recipes::short_link.eq(&token))
        .select(recipes::id)
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Short link"))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, recipe_path(recipe_id))]).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_path() {
        assert_eq!(recipe_path(42), "/recipes/42/");
    }
}
