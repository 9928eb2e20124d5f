//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use branchwise_api::state::AppState;
use branchwise_storage::file_content_source::FileContentSource;
use branchwise_storage::json_file_store::JsonFileStore;
use branchwise_test_support::FixedClock;

/// The content directory shipped with the repository.
pub fn content_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../content")
}

/// A router over the shipped content and a progress file in a fresh
/// temporary directory. Keep the `TempDir` alive for the test's duration.
pub struct TestApp {
    pub router: Router,
    pub progress_file: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    /// A second app over the same progress file, as after a server restart.
    pub fn restarted(&self) -> Router {
        build_router(content_dir(), self.progress_file.clone())
    }
}

fn build_router(content_dir: PathBuf, progress_file: PathBuf) -> Router {
    let state = AppState::new(
        Arc::new(FileContentSource::new(content_dir)),
        Arc::new(JsonFileStore::new(progress_file)),
        Arc::new(FixedClock::default()),
    );
    branchwise_api::app(state)
}

/// Build the full app router the same way `main.rs` does, with a
/// deterministic clock.
pub fn build_test_app() -> TestApp {
    build_test_app_with_content(content_dir())
}

/// Build the full app router over a custom content directory.
pub fn build_test_app_with_content(content_dir: PathBuf) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let progress_file = dir.path().join("progress.json");
    TestApp {
        router: build_router(content_dir, progress_file.clone()),
        progress_file,
        _dir: dir,
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
