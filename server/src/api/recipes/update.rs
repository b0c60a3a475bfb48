use crate::api::ErrorResponse;
use crate::api::extract::{Json, Path};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::images;
use crate::models::{Recipe, RecipeChanges};
use crate::schema::recipes;
use crate::AppState;
use axum::extract::State;
use diesel::prelude::*;

use super::payload::{validate, Mode, RecipeRequest};
use super::view::{hydrate_one, RecipeResponse};
use super::{find_recipe, replace_relations};

#[utoipa::path(
    patch,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<RecipeRequest>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let mut conn = state.conn()?;

    let existing = find_recipe(&mut conn, id)?;
    if existing.author_id != user.id {
        return Err(ApiError::Forbidden(
            "Only the author can change this recipe".to_string(),
        ));
    }

    let valid = validate(&mut conn, request, Mode::Update)?;

    let recipe = conn.transaction::<Recipe, ApiError, _>(|conn| {
        let image_id = match &valid.image {
            Some(image) => Some(images::store(conn, image)?),
            None => None,
        };

        let changes = RecipeChanges {
            name: valid.name.as_deref(),
            text: valid.text.as_deref(),
            cooking_time: valid.cooking_time,
            image_id,
        };

        let recipe = if changes.is_empty() {
            existing.clone()
        } else {
            diesel::update(recipes::table.find(id))
                .set(&changes)
                .returning(Recipe::as_returning())
                .get_result(conn)?
        };

        replace_relations(conn, id, &valid.ingredients, &valid.tags)?;

        if image_id.is_some() {
            images::delete(conn, existing.image_id)?;
        }
        Ok(recipe)
    })?;

    let response = hydrate_one(&mut conn, &state.config, recipe, Some(user.id))?;
    Ok(Json(response))
}
