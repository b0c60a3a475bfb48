use crate::api::extract::{Json, Query};
use crate::api::{page_links, ErrorResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::User;
use crate::schema::{subscriptions, users};
use crate::AppState;
use axum::extract::{OriginalUri, State};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use super::view::{authors_with_recipes, SubscriptionPage};
use super::SubscriptionParams;

#[utoipa::path(
    get,
    path = "/api/users/subscriptions/",
    tag = "users",
    params(SubscriptionParams),
    responses(
        (status = 200, description = "Authors the user follows, with recipe previews", body = SubscriptionPage),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn list_subscriptions(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<SubscriptionParams>,
) -> Result<Json<SubscriptionPage>, ApiError> {
    let page = params.page();
    let mut conn = state.conn()?;

    let followed = subscriptions::table
        .filter(subscriptions::user_id.eq(user.id))
        .select(subscriptions::author_id);

    let rows: Vec<(User, i64)> = users::table
        .filter(users::id.eq_any(followed))
        .order((users::username.asc(), users::id.asc()))
        .select((User::as_select(), sql::<BigInt>("COUNT(*) OVER()")))
        .limit(page.limit)
        .offset(page.offset())
        .load(&mut conn)?;

    let count = match rows.first() {
        Some((_, total)) => *total,
        None if page.number > 1 => subscriptions::table
            .filter(subscriptions::user_id.eq(user.id))
            .count()
            .get_result(&mut conn)?,
        None => 0,
    };

    let authors = rows.into_iter().map(|(author, _)| author).collect();
    let results = authors_with_recipes(
        &mut conn,
        &state.config,
        authors,
        Some(user.id),
        params.recipes_limit,
    )?;
    let (next, previous) = page_links(&state.config, &uri, page, count);

    Ok(Json(SubscriptionPage {
        count,
        next,
        previous,
        results,
    }))
}
