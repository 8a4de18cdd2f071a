#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use vatic_api::config::{DatabaseConfig, ServerConfig};
use vatic_api::router::build_app_router;
use vatic_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
        request_timeout_secs: 30,
        frame_base_url: Some("https://frames.test".to_string()),
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
        },
    }
}

/// Build the full application router, with the same middleware stack
/// production uses, over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState::new(pool, test_config()))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// POST and return the `data` of a successful response, asserting the status.
pub async fn create(app: &Router, uri: &str, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(app.clone(), uri, body).await;
    let status = response.status();
    let json = body_json(response).await;
    assert!(status.is_success(), "POST {uri} failed with {status}: {json}");
    json["data"].clone()
}

pub fn id_of(value: &serde_json::Value) -> i64 {
    value["id"].as_i64().unwrap()
}
