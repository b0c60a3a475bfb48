use crate::api::extract::{Json, Query};
use crate::db::lower;
use crate::error::ApiError;
use crate::models::Ingredient;
use crate::schema::ingredients;
use crate::AppState;
use axum::extract::State;
use diesel::prelude::*;
use foodgram_core::filters::contains_pattern;
use serde::Deserialize;
use utoipa::IntoParams;

use super::IngredientResponse;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListIngredientsParams {
    /// Case-insensitive substring of the ingredient name
    pub name: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/ingredients/",
    tag = "ingredients",
    params(ListIngredientsParams),
    responses(
        (status = 200, description = "Ingredients ordered by name", body = Vec<IngredientResponse>)
    )
)]
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(params): Query<ListIngredientsParams>,
) -> Result<Json<Vec<IngredientResponse>>, ApiError> {
    let mut conn = state.conn()?;

    let mut query = ingredients::table
        .select(Ingredient::as_select())
        .order((ingredients::name.asc(), ingredients::measurement_unit.asc()))
        .into_boxed();

    if let Some(pattern) = params.name.as_deref().and_then(contains_pattern) {
        query = query.filter(lower(ingredients::name).like(pattern));
    }

    let ingredients = query.load::<Ingredient>(&mut conn)?;

    Ok(Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}
