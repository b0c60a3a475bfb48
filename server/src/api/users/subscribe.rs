use crate::api::ErrorResponse;
use crate::api::extract::{Json, Path, Query};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::NewSubscription;
use crate::schema::subscriptions;
use crate::AppState;
use axum::{extract::State, http::StatusCode};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::IntoParams;

use super::find_user;
use super::view::{authors_with_recipes, AuthorWithRecipes};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubscribeParams {
    /// Maximum number of recipes listed for the author
    pub recipes_limit: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe/",
    tag = "users",
    params(
        ("id" = i32, Path, description = "Author ID"),
        SubscribeParams
    ),
    responses(
        (status = 201, description = "Subscribed", body = AuthorWithRecipes),
        (status = 400, description = "Already subscribed, or subscribing to yourself", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn subscribe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<SubscribeParams>,
) -> Result<(StatusCode, Json<AuthorWithRecipes>), ApiError> {
    let mut conn = state.conn()?;
    let author = find_user(&mut conn, id)?;

    if author.id == user.id {
        return Err(ApiError::BadRequest(
            "You cannot subscribe to yourself".to_string(),
        ));
    }

    let inserted = diesel::insert_into(subscriptions::table)
        .values(NewSubscription {
            user_id: user.id,
            author_id: author.id,
        })
        .on_conflict_do_nothing()
        .execute(&mut conn)?;

    if inserted == 0 {
        return Err(ApiError::BadRequest(
            "Already subscribed to this author".to_string(),
        ));
    }

    let mut results = authors_with_recipes(
        &mut conn,
        &state.config,
        vec![author],
        Some(user.id),
        params.recipes_limit,
    )?;
    let author = results
        .pop()
        .ok_or_else(|| ApiError::Internal("Author response missing".to_string()))?;

    Ok((StatusCode::CREATED, Json(author)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe/",
    tag = "users",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn unsubscribe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.conn()?;
    find_user(&mut conn, id)?;

    let deleted = diesel::delete(
        subscriptions::table
            .filter(subscriptions::user_id.eq(user.id))
            .filter(subscriptions::author_id.eq(id)),
    )
    .execute(&mut conn)?;

    if deleted == 0 {
        return Err(ApiError::BadRequest(
            "Not subscribed to this author".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
