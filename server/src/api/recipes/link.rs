use crate::api::ErrorResponse;
use crate::api::extract::{Json, Path};
use crate::error::ApiError;
use crate::AppState;
use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use super::find_recipe;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    pub short_link: String,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/get-link/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Absolute short link to the recipe", body = ShortLinkResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ShortLinkResponse>, ApiError> {
    let mut conn = state.conn()?;
    let recipe = find_recipe(&mut conn, id)?;

    Ok(Json(ShortLinkResponse {
        short_link: state.config.short_link_url(&recipe.short_link),
    }))
}
