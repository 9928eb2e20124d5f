//! Persisted progress endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use branchwise_scenario::domain::progress::ProgressDocument;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /progress
#[instrument(skip(state))]
async fn get_progress(State(state): State<AppState>) -> Result<Json<ProgressDocument>, ApiError> {
    Ok(Json(state.progress.load().await?))
}

/// Returns the router for the progress document.
pub fn router() -> Router<AppState> {
    Router::new().route("/progress", get(get_progress))
}
