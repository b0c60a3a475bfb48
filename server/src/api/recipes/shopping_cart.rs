use crate::api::ErrorResponse;
use crate::api::extract::{Json, Path};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::NewShoppingCartItem;
use crate::schema::shopping_cart_items;
use crate::AppState;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;

use super::find_recipe;
use super::view::{short, RecipeShort};

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 201, description = "Recipe added to the shopping cart", body = RecipeShort),
        (status = 400, description = "Already in the shopping cart", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn add_to_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeShort>), ApiError> {
    let mut conn = state.conn()?;
    let recipe = find_recipe(&mut conn, id)?;

    let inserted = diesel::insert_into(shopping_cart_items::table)
        .values(NewShoppingCartItem {
            user_id: user.id,
            recipe_id: id,
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)?;

    if inserted == 0 {
        return Err(ApiError::BadRequest(
            "Recipe is already in the shopping cart".to_string(),
        ));
    }

    Ok((StatusCode::CREATED, Json(short(&state.config, &recipe))))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe removed from the shopping cart"),
        (status = 400, description = "Recipe was not in the shopping cart", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn remove_from_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.conn()?;
    find_recipe(&mut conn, id)?;

    let deleted = diesel::delete(
        shopping_cart_items::table
            .filter(shopping_cart_items::user_id.eq(user.id))
            .filter(shopping_cart_items::recipe_id.eq(id)),
    )
    .execute(&mut conn)?;

    if deleted == 0 {
        return Err(ApiError::BadRequest(
            "Recipe is not in the shopping cart".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
