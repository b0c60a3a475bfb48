use crate::api::ErrorResponse;
use crate::api::extract::Json;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::images;
use crate::models::{NewRecipe, Recipe};
use crate::schema::recipes;
use crate::AppState;
use axum::{extract::State, http::StatusCode};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use foodgram_core::short_link;

use super::payload::{validate, Mode, RecipeRequest};
use super::replace_relations;
use super::view::{hydrate_one, RecipeResponse};

const SHORT_LINK_CONSTRAINT: &str = "recipes_short_link_key";
const INSERT_ATTEMPTS: usize = 3;

/// A concurrent insert claimed the token between lookup and insert.
fn is_short_link_conflict(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if info.constraint_name() == Some(SHORT_LINK_CONSTRAINT)
    )
}

#[utoipa::path(
    post,
    path = "/api/recipes/",
    tag = "recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created successfully", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    let mut conn = state.conn()?;
    let valid = validate(&mut conn, request, Mode::Create)?;

    let (Some(image), Some(name), Some(text), Some(cooking_time)) =
        (valid.image, valid.name, valid.text, valid.cooking_time)
    else {
        return Err(ApiError::Internal(
            "Validated recipe is missing required fields".to_string(),
        ));
    };

    // Create the image, recipe and join rows atomically
    let recipe = conn.transaction::<Recipe, ApiError, _>(|conn| {
        let image_id = images::store(conn, &image)?;

        let mut attempt = 1;
        let recipe = loop {
            let token = short_link::allocate(|candidate| {
                diesel::select(exists(
                    recipes::table.filter(recipes::short_link.eq(candidate)),
                ))
                .get_result::<bool>(conn)
                .map_err(ApiError::from)
            })?;

            // Nested transaction is a savepoint; a failed insert must not abort the outer one
            let inserted = conn.transaction::<Recipe, DieselError, _>(|conn| {
                diesel::insert_into(recipes::table)
                    .values(NewRecipe {
                        author_id: user.id,
                        name: &name,
                        text: &text,
                        cooking_time,
                        image_id,
                        short_link: &token,
                    })
                    .returning(Recipe::as_returning())
                    .get_result(conn)
            });

            match inserted {
                Err(e) if attempt < INSERT_ATTEMPTS && is_short_link_conflict(&e) => {
                    tracing::debug!("Short link {} taken concurrently, retrying", token);
                    attempt += 1;
                }
                result => break result?,
            }
        };

        replace_relations(conn, recipe.id, &valid.ingredients, &valid.tags)?;
        Ok(recipe)
    })?;

    tracing::info!("User {} created recipe {}", user.id, recipe.id);

    let response = hydrate_one(&mut conn, &state.config, recipe, Some(user.id))?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;

    struct Violation(Option<&'static str>);

    impl DatabaseErrorInformation for Violation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("recipes")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.0
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn unique_violation(constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(Violation(constraint)),
        )
    }

    #[test]
    fn test_short_link_conflict_is_retried() {
        assert!(is_short_link_conflict(&unique_violation(Some(
            "recipes_short_link_key"
        ))));
    }

    #[test]
    fn test_other_errors_are_not_retried() {
        assert!(!is_short_link_conflict(&unique_violation(Some(
            "recipe_ingredients_pkey"
        ))));
        assert!(!is_short_link_conflict(&unique_violation(None)));
        assert!(!is_short_link_conflict(&DieselError::NotFound));
        assert!(!is_short_link_conflict(&DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new(Violation(Some("recipes_short_link_key"))),
        )));
    }
}
