//! Liveness endpoint. Also reports how many scenarios the catalogue offers;
//! a count of one on a fresh deployment usually means `CONTENT_DIR` is wrong
//! and the built-in fallback is being served.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::state::AppState;

const SERVICE_NAME: &str = "branchwise";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// Entries in the catalogue, built-in fallback included.
    pub scenario_count: usize,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let index = state.loader.load_index().await;
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        scenario_count: index.scenarios.len(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
