//! Router-level tests for behavior that is settled before any database
//! access: authentication rejections, routing, and the OpenAPI document.
//! The pool points at a closed port, so reaching the database would fail
//! these tests with a 500.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use foodgram_server::config::Config;
use foodgram_server::{app, db, AppState};
use tower::ServiceExt;

fn test_app() -> Router {
    let config = Config {
        database_url: "postgres://foodgram@127.0.0.1:1/foodgram".to_string(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        public_url: "http://testserver".to_string(),
        session_ttl_days: 30,
    };
    let pool = db::lazy_pool(&config.database_url);
    app(AppState::new(pool, config))
}

async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = test_app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_me_requires_credentials() {
    let (status, body) = send(request(Method::GET, "/api/users/me/")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["error"],
        "Authentication credentials were not provided"
    );
}

#[tokio::test]
async fn test_trailing_slash_is_optional() {
    let (with_slash, _) = send(request(Method::GET, "/api/users/me/")).await;
    let (without_slash, _) = send(request(Method::GET, "/api/users/me")).await;

    assert_eq!(with_slash, StatusCode::UNAUTHORIZED);
    assert_eq!(without_slash, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_auth_scheme_rejected() {
    let request = Request::builder()
        .uri("/api/users/me/")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid Authorization header format");
}

#[tokio::test]
async fn test_writes_require_credentials() {
    let cases = [
        (Method::POST, "/api/recipes/"),
        (Method::PATCH, "/api/recipes/1/"),
        (Method::DELETE, "/api/recipes/1/"),
        (Method::POST, "/api/recipes/1/favorite/"),
        (Method::POST, "/api/recipes/1/shopping_cart/"),
        (Method::GET, "/api/recipes/download_shopping_cart/"),
        (Method::POST, "/api/users/1/subscribe/"),
        (Method::GET, "/api/users/subscriptions/"),
        (Method::POST, "/api/users/set_password/"),
        (Method::POST, "/api/auth/token/logout/"),
        (Method::POST, "/api/tags/"),
    ];

    for (method, uri) in cases {
        let (status, _) = send(request(method.clone(), uri)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, _) = send(request(Method::GET, "/api/nothing-here/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_short_link_is_not_found() {
    let (status, body) = send(request(Method::GET, "/s/not-a-token/")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Short link not found");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (status, body) = send(request(Method::GET, "/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Foodgram API");

    let paths = body["paths"].as_object().unwrap();
    for path in [
        "/api/users/",
        "/api/recipes/",
        "/api/recipes/download_shopping_cart/",
        "/api/ingredients/",
        "/api/tags/",
    ] {
        assert!(paths.contains_key(path), "missing {}", path);
    }
}
