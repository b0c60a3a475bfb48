use crate::api::extract::{Json, Path, Query};
use crate::api::recipes::query::{load_page, RecipeFilter};
use crate::api::recipes::view::{hydrate, RecipePage};
use crate::api::{page_links, ErrorResponse};
use crate::auth::MaybeUser;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{OriginalUri, State};

use super::{find_user, PageParams};

#[utoipa::path(
    get,
    path = "/api/users/{id}/recipes/",
    tag = "users",
    params(
        ("id" = i32, Path, description = "Author ID"),
        PageParams
    ),
    responses(
        (status = 200, description = "The author's recipes, newest first", body = RecipePage),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn list_user_recipes(
    viewer: MaybeUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i32>,
    Query(params): Query<PageParams>,
) -> Result<Json<RecipePage>, ApiError> {
    let page = params.page();
    let mut conn = state.conn()?;
    find_user(&mut conn, id)?;

    let filter = RecipeFilter {
        author: Some(id),
        ..RecipeFilter::default()
    };
    let (recipes, count) = load_page(&mut conn, &filter, page)?;
    let results = hydrate(&mut conn, &state.config, recipes, viewer.id())?;
    let (next, previous) = page_links(&state.config, &uri, page, count);

    Ok(Json(RecipePage {
        count,
        next,
        previous,
        results,
    }))
}
