//! Recipe representations and the batch loading behind them.

use crate::api::tags::TagResponse;
use crate::api::users::view::{user_responses, UserResponse};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{Recipe, Tag, User};
use crate::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, shopping_cart_items, tags, users,
};
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    /// Ingredient id
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    /// Absolute image URL
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

/// Compact form used in favorites, the shopping cart and author previews.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeShort {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipePage {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<RecipeResponse>,
}

pub fn short(config: &Config, recipe: &Recipe) -> RecipeShort {
    RecipeShort {
        id: recipe.id,
        name: recipe.name.clone(),
        image: config.media_url(recipe.image_id),
        cooking_time: recipe.cooking_time,
    }
}

/// Recipe ids among `ids` that `viewer` has a row for in a user-recipe
/// table (favorites or cart).
macro_rules! marked_by {
    ($conn:expr, $table:ident, $viewer:expr, $ids:expr) => {
        $table::table
            .filter($table::user_id.eq($viewer))
            .filter($table::recipe_id.eq_any($ids))
            .select($table::recipe_id)
            .load::<i32>($conn)?
            .into_iter()
            .collect::<HashSet<i32>>()
    };
}

/// Expand recipes into full responses. Tags, ingredients, authors and the
/// viewer's favorite and cart marks are each loaded with one query for the
/// whole batch; input order is preserved.
pub fn hydrate(
    conn: &mut PgConnection,
    config: &Config,
    recipes: Vec<Recipe>,
    viewer: Option<i32>,
) -> Result<Vec<RecipeResponse>, ApiError> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();

    let mut tags_by_recipe: HashMap<i32, Vec<TagResponse>> = HashMap::new();
    for (recipe_id, tag) in recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(&ids))
        .order(tags::name.asc())
        .select((recipe_tags::recipe_id, Tag::as_select()))
        .load::<(i32, Tag)>(conn)?
    {
        tags_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(TagResponse::from(tag));
    }

    let mut ingredients_by_recipe: HashMap<i32, Vec<RecipeIngredientResponse>> = HashMap::new();
    for (recipe_id, id, name, measurement_unit, amount) in recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(&ids))
        .order((ingredients::name.asc(), ingredients::id.asc()))
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load::<(i32, i32, String, String, i32)>(conn)?
    {
        ingredients_by_recipe
            .entry(recipe_id)
            .or_default()
            .push(RecipeIngredientResponse {
                id,
                name,
                measurement_unit,
                amount,
            });
    }

    let author_ids: Vec<i32> = recipes
        .iter()
        .map(|r| r.author_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let authors = users::table
        .filter(users::id.eq_any(&author_ids))
        .select(User::as_select())
        .load::<User>(conn)?;
    let authors: HashMap<i32, UserResponse> = user_responses(conn, config, authors, viewer)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let (favorited, in_cart) = match viewer {
        Some(viewer_id) => (
            marked_by!(conn, favorites, viewer_id, &ids),
            marked_by!(conn, shopping_cart_items, viewer_id, &ids),
        ),
        None => (HashSet::new(), HashSet::new()),
    };

    recipes
        .into_iter()
        .map(|recipe| {
            let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                ApiError::Internal(format!(
                    "Author {} of recipe {} missing",
                    recipe.author_id, recipe.id
                ))
            })?;
            Ok(RecipeResponse {
                id: recipe.id,
                tags: tags_by_recipe.remove(&recipe.id).unwrap_or_default(),
                author,
                ingredients: ingredients_by_recipe.remove(&recipe.id).unwrap_or_default(),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
                image: config.media_url(recipe.image_id),
                name: recipe.name,
                text: recipe.text,
                cooking_time: recipe.cooking_time,
            })
        })
        .collect()
}

pub fn hydrate_one(
    conn: &mut PgConnection,
    config: &Config,
    recipe: Recipe,
    viewer: Option<i32>,
) -> Result<RecipeResponse, ApiError> {
    hydrate(conn, config, vec![recipe], viewer)?
        .pop()
        .ok_or_else(|| ApiError::Internal("Recipe response missing".to_string()))
}
