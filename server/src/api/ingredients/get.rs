use crate::api::ErrorResponse;
use crate::api::extract::{Json, Path};
use crate::error::ApiError;
use crate::models::Ingredient;
use crate::schema::ingredients;
use crate::AppState;
use axum::extract::State;
use diesel::prelude::*;

use super::IngredientResponse;

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}/",
    tag = "ingredients",
    params(
        ("id" = i32, Path, description = "Ingredient ID")
    ),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 404, description = "Ingredient not found", body = ErrorResponse)
    )
)]
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<IngredientResponse>, ApiError> {
    let mut conn = state.conn()?;

    let ingredient = ingredients::table
        .find(id)
        .select(Ingredient::as_select())
        .first::<Ingredient>(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Ingredient"))?;

    Ok(Json(ingredient.into()))
}
