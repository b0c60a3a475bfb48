pub mod feed;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for the subscription feed (mounted at /api/subscriptions)
pub fn router() -> Router<AppState> {
    Router::new().route("/recipes", get(feed::feed))
}

#[derive(OpenApi)]
#[openapi(paths(feed::feed))]
pub struct ApiDoc;
