use crate::api::ErrorResponse;
use crate::api::extract::{Json, Path};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::NewFavorite;
use crate::schema::favorites;
use crate::AppState;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;

use super::find_recipe;
use super::view::{short, RecipeShort};

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Recipe added to favorites", body = RecipeShort),
        (status = 400, description = "Already in favorites", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeShort>), ApiError> {
    let mut conn = state.conn()?;
    let recipe = find_recipe(&mut conn, id)?;

    let inserted = diesel::insert_into(favorites::table)
        .values(NewFavorite {
            user_id: user.id,
            recipe_id: id,
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)?;

    if inserted == 0 {
        return Err(ApiError::BadRequest(
            "Recipe is already in favorites".to_string(),
        ));
    }

    Ok((StatusCode::CREATED, Json(short(&state.config, &recipe))))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe removed from favorites"),
        (status = 400, description = "Recipe was not in favorites", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn remove_favorite(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.conn()?;
    find_recipe(&mut conn, id)?;

    let deleted = diesel::delete(
        favorites::table
            .filter(favorites::user_id.eq(user.id))
            .filter(favorites::recipe_id.eq(id)),
    )
    .execute(&mut conn)?;

    if deleted == 0 {
        return Err(ApiError::BadRequest(
            "Recipe is not in favorites".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
