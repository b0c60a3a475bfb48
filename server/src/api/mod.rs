pub mod auth;
pub mod extract;
pub mod ingredients;
pub mod media;
pub mod recipes;
pub mod short_links;
pub mod subscriptions;
pub mod tags;
pub mod users;

use axum::http::Uri;
use foodgram_core::{FieldErrors, Page};
use serde::Serialize;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

use crate::config::Config;

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Field name to messages, present on validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub fields: Option<FieldErrors>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: None,
        }
    }
}

/// `next`/`previous` links for a page of results. `uri` is the request's
/// original URI so every other filter survives into the links.
pub fn page_links(
    config: &Config,
    uri: &Uri,
    page: Page,
    total: i64,
) -> (Option<String>, Option<String>) {
    let next = page.next_link(&config.public_url, uri.path(), uri.query(), total);
    let previous = page.previous_link(&config.public_url, uri.path(), uri.query());
    (next, previous)
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Foodgram API",
            description = "Recipes, favorites, shopping lists and author subscriptions"
        ),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "token_auth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        auth::ApiDoc::openapi(),
        users::ApiDoc::openapi(),
        subscriptions::ApiDoc::openapi(),
        tags::ApiDoc::openapi(),
        ingredients::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        short_links::ApiDoc::openapi(),
        media::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_has_core_paths() {
        let spec = openapi();
        for path in [
            "/api/auth/token/login/",
            "/api/users/",
            "/api/users/me/",
            "/api/recipes/",
            "/api/recipes/{id}/",
            "/api/recipes/download_shopping_cart/",
            "/api/tags/",
            "/api/ingredients/",
            "/s/{token}/",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_error_response_omits_empty_fields() {
        let json = serde_json::to_value(ErrorResponse::new("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "nope"}));
    }
}
