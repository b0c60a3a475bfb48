pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod images;
pub mod models;
pub mod schema;
pub mod telemetry;

use axum::extract::{DefaultBodyLimit, FromRef};
use axum::middleware;
use axum::Router;
use std::sync::Arc;
use tower_http::normalize_path::NormalizePath;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::db::{DbConn, DbPool};
use crate::error::ApiError;

/// Base64 inflates images by a third; leave room for a maximum-size image
/// plus the rest of the JSON body.
const MAX_BODY_SIZE: usize = foodgram_core::MAX_FILE_SIZE * 3 / 2;

/// Application state shared across all handlers
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        Self {
            pool: Arc::new(pool),
            config: Arc::new(config),
        }
    }

    pub fn conn(&self) -> Result<DbConn, ApiError> {
        Ok(self.pool.get()?)
    }
}

/// API, short-link and media routes, with request tracing and per-request
/// query counting.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth/token", api::auth::router())
        .nest("/api/users", api::users::router())
        .nest("/api/subscriptions", api::subscriptions::router())
        .nest("/api/tags", api::tags::router())
        .nest("/api/ingredients", api::ingredients::router())
        .nest("/api/recipes", api::recipes::router())
        .merge(api::short_links::router())
        .merge(api::media::router())
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware::from_fn(
            telemetry::db_query_count_header_middleware,
        ))
        .layer(telemetry::http_trace_layer())
        .layer(middleware::from_fn(telemetry::query_counting_middleware))
}

/// The complete application. Swagger UI is matched first; everything else
/// goes through the API router with trailing slashes trimmed, so
/// `/api/recipes/` and `/api/recipes` hit the same route.
pub fn app(state: AppState) -> Router {
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .merge(swagger_ui)
        .fallback_service(NormalizePath::trim_trailing_slash(router(state)))
}
