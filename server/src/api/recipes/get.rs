use crate::api::ErrorResponse;
use crate::api::extract::{Json, Path};
use crate::auth::MaybeUser;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::State;

use super::find_recipe;
use super::view::{hydrate_one, RecipeResponse};

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    viewer: MaybeUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut conn = state.conn()?;
    let recipe = find_recipe(&mut conn, id)?;
    Ok(Json(hydrate_one(
        &mut conn,
        &state.config,
        recipe,
        viewer.id(),
    )?))
}
