//! Scenario catalogue endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use branchwise_scenario::domain::index::ScenarioIndex;
use tracing::instrument;

use crate::state::AppState;

/// GET /scenarios
///
/// Never fails: an unreachable catalogue is replaced by the built-in one.
#[instrument(skip(state))]
async fn list_scenarios(State(state): State<AppState>) -> Json<ScenarioIndex> {
    Json(state.loader.load_index().await)
}

/// Returns the router for the scenario catalogue.
pub fn router() -> Router<AppState> {
    Router::new().route("/scenarios", get(list_scenarios))
}
