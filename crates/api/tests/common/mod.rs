#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceExt;

use pm_api::config::ServerConfig;
use pm_api::router::build_app_router;
use pm_api::state::AppState;

/// CORS origin allowed by [`test_config`].
pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// Build a test `ServerConfig` from the built-in defaults, with a generous
/// request timeout.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::from_lookup(|_| None).unwrap();
    config.host = "127.0.0.1".to_string();
    config.port = 0;
    config.cors_origins = vec![TEST_ORIGIN.to_string()];
    config.request_timeout_secs = 30;
    config
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Goes through the same builder as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Apply the schema to the per-test database.
pub async fn setup(pool: &PgPool) {
    pm_db::schema::migrate(pool).await.unwrap();
}

/// Migrate, then build the app.
pub async fn app(pool: &PgPool) -> Router {
    setup(pool).await;
    build_test_app(pool.clone())
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn with_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    with_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    with_json(app, Method::PUT, uri, body).await
}

/// Send a raw, possibly malformed, JSON body.
pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// POST a resource and return its `id` field.
pub async fn create_id(app: Router, uri: &str, body: serde_json::Value) -> String {
    let response = post_json(app, uri, body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string()
}
