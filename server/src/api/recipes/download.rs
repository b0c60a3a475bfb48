use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::schema::{ingredients, recipe_ingredients, shopping_cart_items};
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use diesel::prelude::*;
use foodgram_core::shopping::{self, CartLine};

#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart/",
    tag = "recipes",
    responses(
        (status = 200, description = "Plain-text shopping list", content_type = "text/plain", body = String),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn download_shopping_cart(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let mut conn = state.conn()?;

    let lines = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(
            recipe_ingredients::recipe_id.eq_any(
                shopping_cart_items::table
                    .filter(shopping_cart_items::user_id.eq(user.id))
                    .select(shopping_cart_items::recipe_id),
            ),
        )
        .select((
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load::<(String, String, i32)>(&mut conn)?
        .into_iter()
        .map(|(name, measurement_unit, amount)| CartLine {
            name,
            measurement_unit,
            amount: i64::from(amount),
        });

    let items = shopping::aggregate(lines);
    let body = shopping::render(&items);

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", shopping::FILENAME),
            ),
        ],
        body,
    )
        .into_response())
}
