pub mod create;
pub mod delete;
pub mod download;
pub mod favorite;
pub mod get;
pub mod link;
pub mod list;
pub mod payload;
pub mod query;
pub mod shopping_cart;
pub mod update;
pub mod view;

use crate::error::ApiError;
use crate::models::{NewRecipeIngredient, NewRecipeTag, Recipe};
use crate::schema::{recipe_ingredients, recipe_tags, recipes};
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use diesel::prelude::*;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/download_shopping_cart",
            get(download::download_shopping_cart),
        )
        .route(
            "/{id}",
            get(get::get_recipe)
                .patch(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/{id}/get-link", get(link::get_link))
        .route(
            "/{id}/favorite",
            post(favorite::add_favorite).delete(favorite::remove_favorite),
        )
        .route(
            "/{id}/shopping_cart",
            post(shopping_cart::add_to_cart).delete(shopping_cart::remove_from_cart),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        create::create_recipe,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        link::get_link,
        favorite::add_favorite,
        favorite::remove_favorite,
        shopping_cart::add_to_cart,
        shopping_cart::remove_from_cart,
        download::download_shopping_cart,
    ),
    components(schemas(
        payload::RecipeRequest,
        payload::RecipeIngredientInput,
        view::RecipeResponse,
        view::RecipeIngredientResponse,
        view::RecipeShort,
        view::RecipePage,
        link::ShortLinkResponse,
    ))
)]
pub struct ApiDoc;

pub(crate) fn find_recipe(conn: &mut PgConnection, id: i32) -> Result<Recipe, ApiError> {
    recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Recipe"))
}

/// Replace a recipe's ingredient and tag rows with the given sets.
pub(crate) fn replace_relations(
    conn: &mut PgConnection,
    recipe_id: i32,
    ingredients: &[(i32, i32)],
    tags: &[i32],
) -> Result<(), ApiError> {
    diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)))
        .execute(conn)?;
    diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
        .execute(conn)?;

    let ingredient_rows: Vec<NewRecipeIngredient> = ingredients
        .iter()
        .map(|&(ingredient_id, amount)| NewRecipeIngredient {
            recipe_id,
            ingredient_id,
            amount,
        })
        .collect();
    diesel::insert_into(recipe_ingredients::table)
        .values(&ingredient_rows)
        .execute(conn)?;

    let tag_rows: Vec<NewRecipeTag> = tags
        .iter()
        .map(|&tag_id| NewRecipeTag { recipe_id, tag_id })
        .collect();
    diesel::insert_into(recipe_tags::table)
        .values(&tag_rows)
        .execute(conn)?;

    Ok(())
}
