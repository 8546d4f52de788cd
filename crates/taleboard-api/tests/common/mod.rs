//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use taleboard_board::domain::layout::LayoutConfig;
use taleboard_core::rng::{RandomSource, SeededRng};
use tower::ServiceExt;

use taleboard_api::routes;
use taleboard_api::state::AppState;

/// Build the full app router with a fixed-seed RNG. Uses the same route
/// structure as `main.rs`.
pub fn build_test_app() -> Router {
    build_test_app_with_rng(SeededRng::new(2026))
}

/// Build the full app router around a custom random source.
pub fn build_test_app_with_rng(rng: impl RandomSource + Send + 'static) -> Router {
    let rng: Arc<Mutex<dyn RandomSource + Send>> = Arc::new(Mutex::new(rng));
    let app_state = AppState::new(rng, LayoutConfig::default());

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/boards", routes::boards::router())
        .with_state(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
