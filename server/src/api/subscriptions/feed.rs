use crate::api::extract::{Json, Query};
use crate::api::recipes::query::{load_page, RecipeFilter};
use crate::api::recipes::view::{hydrate, RecipePage};
use crate::api::users::PageParams;
use crate::api::{page_links, ErrorResponse};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{OriginalUri, State};

#[utoipa::path(
    get,
    path = "/api/subscriptions/recipes/",
    tag = "subscriptions",
    params(PageParams),
    responses(
        (status = 200, description = "Newest recipes by followed authors", body = RecipePage),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("token_auth" = [])
    )
)]
pub async fn feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<PageParams>,
) -> Result<Json<RecipePage>, ApiError> {
    let page = params.page();
    let mut conn = state.conn()?;

    let filter = RecipeFilter {
        followed_by: Some(user.id),
        ..RecipeFilter::default()
    };
    let (recipes, count) = load_page(&mut conn, &filter, page)?;
    let results = hydrate(&mut conn, &state.config, recipes, Some(user.id))?;
    let (next, previous) = page_links(&state.config, &uri, page, count);

    Ok(Json(RecipePage {
        count,
        next,
        previous,
        results,
    }))
}
