use crate::api::extract::{Json, Query};
use crate::api::{page_links, ErrorResponse};
use crate::auth::MaybeUser;
use crate::error::ApiError;
use crate::models::User;
use crate::schema::users;
use crate::AppState;
use axum::extract::{OriginalUri, State};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;

use super::view::{user_responses, UserPage};
use super::PageParams;

#[utoipa::path(
    get,
    path = "/api/users/",
    tag = "users",
    params(PageParams),
    responses(
        (status = 200, description = "Page of users ordered by username", body = UserPage),
        (status = 401, description = "Invalid token", body = ErrorResponse)
    )
)]
pub async fn list_users(
    viewer: MaybeUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<PageParams>,
) -> Result<Json<UserPage>, ApiError> {
    let page = params.page();
    let mut conn = state.conn()?;

    let rows: Vec<(User, i64)> = users::table
        .order((users::username.asc(), users::id.asc()))
        .select((User::as_select(), sql::<BigInt>("COUNT(*) OVER()")))
        .limit(page.limit)
        .offset(page.offset())
        .load(&mut conn)?;

    let count = match rows.first() {
        Some((_, total)) => *total,
        None if page.number > 1 => users::table.count().get_result(&mut conn)?,
        None => 0,
    };

    let users = rows.into_iter().map(|(user, _)| user).collect();
    let results = user_responses(&mut conn, &state.config, users, viewer.id())?;
    let (next, previous) = page_links(&state.config, &uri, page, count);

    Ok(Json(UserPage {
        count,
        next,
        previous,
        results,
    }))
}
