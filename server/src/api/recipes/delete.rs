use crate::api::ErrorResponse;
use crate::api::extract::Path;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::images;
use crate::schema::recipes;
use crate::AppState;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;

use super::find_recipe;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted successfully"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.conn()?;

    let recipe = find_recipe(&mut conn, id)?;
    if recipe.author_id != user.id {
        return Err(ApiError::Forbidden(
            "Only the author can delete this recipe".to_string(),
        ));
    }

    conn.transaction::<_, ApiError, _>(|conn| {
        diesel::delete(recipes::table.find(id)).execute(conn)?;
        images::delete(conn, recipe.image_id)?;
        Ok(())
    })?;

    tracing::info!("User {} deleted recipe {}", user.id, id);
    Ok(StatusCode::NO_CONTENT)
}
