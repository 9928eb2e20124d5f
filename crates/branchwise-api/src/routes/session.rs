//! Routes driving the single navigation session.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use branchwise_scenario::application::navigator::{
    Navigator, ResumeOutcome, SaveStatus, Transition,
};
use branchwise_scenario::domain::graph::{Choice, Node};
use branchwise_scenario::domain::session::ScenarioSession;
use branchwise_scenario::domain::traversal::HistoryEntry;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /session/load.
#[derive(Debug, Deserialize)]
pub struct LoadScenarioRequest {
    /// Scenario id or document file name.
    pub scenario_id: String,
}

/// Request body for POST /session/advance.
#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    pub choice_id: String,
}

/// Request body for POST /session/back-to.
#[derive(Debug, Deserialize)]
pub struct BackToRequest {
    /// History length to rewind to. Zero returns to the start node.
    pub history_index: usize,
}

/// Everything a presentation layer needs to render the current position.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub scenario_id: String,
    pub title: String,
    pub current_node_id: String,
    pub node: Node,
    /// Choices on the current node that pass their requirements.
    pub available_choices: Vec<Choice>,
    /// Approximate completion percentage in `0..=100`.
    pub progress: f64,
    pub is_complete: bool,
    pub can_go_back: bool,
    pub history: Vec<HistoryEntry>,
}

impl SessionView {
    fn of(session: &ScenarioSession) -> Self {
        Self {
            scenario_id: session.scenario_id().to_owned(),
            title: session.graph().title().to_owned(),
            current_node_id: session.current_node_id().to_owned(),
            node: session.current_node().clone(),
            available_choices: session.available_choices().into_iter().cloned().collect(),
            progress: session.progress(),
            is_complete: session.is_complete(),
            can_go_back: session.can_go_back(),
            history: session.history().to_vec(),
        }
    }
}

/// Response body returned after a transition.
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    #[serde(flatten)]
    pub session: SessionView,
    /// Whether the new position reached the progress store.
    pub saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_error: Option<String>,
}

/// Response body for POST /session/resume.
#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    #[serde(flatten)]
    pub session: SessionView,
    /// `false` when the saved position was stale and the scenario restarted.
    pub resumed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart_reason: Option<String>,
}

fn transition_response(
    navigator: &Navigator,
    transition: Transition,
) -> Result<Json<TransitionResponse>, ApiError> {
    let session = SessionView::of(navigator.active()?);
    let (saved, save_error) = match transition.save {
        SaveStatus::Saved => (true, None),
        SaveStatus::Failed(reason) => (false, Some(reason)),
    };
    Ok(Json(TransitionResponse {
        session,
        saved,
        save_error,
    }))
}

/// GET /session
#[instrument(skip(state))]
async fn current_session(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let navigator = state.navigator.lock().await;
    Ok(Json(SessionView::of(navigator.active()?)))
}

/// POST /session/load
#[instrument(skip(state, request), fields(scenario_id = %request.scenario_id))]
async fn load_scenario(
    State(state): State<AppState>,
    Json(request): Json<LoadScenarioRequest>,
) -> Result<Json<TransitionResponse>, ApiError> {
    info!("handling load_scenario request");
    let mut navigator = state.navigator.lock().await;
    let transition = navigator.load_scenario(&request.scenario_id).await?;
    transition_response(&navigator, transition)
}

/// POST /session/resume
#[instrument(skip(state))]
async fn resume(State(state): State<AppState>) -> Result<Json<ResumeResponse>, ApiError> {
    let mut navigator = state.navigator.lock().await;
    let outcome = navigator
        .resume_saved()
        .await?
        .ok_or(ApiError::NoSavedProgress)?;

    let (resumed, restart_reason) = match outcome {
        ResumeOutcome::Resumed => (true, None),
        ResumeOutcome::Restarted { reason } => (false, Some(reason)),
    };
    Ok(Json(ResumeResponse {
        session: SessionView::of(navigator.active()?),
        resumed,
        restart_reason,
    }))
}

/// DELETE /session/saved
#[instrument(skip(state))]
async fn clear_saved(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let navigator = state.navigator.lock().await;
    navigator.clear_saved().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /session/advance
#[instrument(skip(state, request), fields(choice_id = %request.choice_id))]
async fn advance(
    State(state): State<AppState>,
    Json(request): Json<AdvanceRequest>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let mut navigator = state.navigator.lock().await;
    let transition = navigator.advance(&request.choice_id).await?;
    transition_response(&navigator, transition)
}

/// POST /session/back
#[instrument(skip(state))]
async fn go_back(State(state): State<AppState>) -> Result<Json<TransitionResponse>, ApiError> {
    let mut navigator = state.navigator.lock().await;
    let transition = navigator.go_back().await?;
    transition_response(&navigator, transition)
}

/// POST /session/back-to
#[instrument(skip(state, request), fields(history_index = request.history_index))]
async fn go_back_to(
    State(state): State<AppState>,
    Json(request): Json<BackToRequest>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let mut navigator = state.navigator.lock().await;
    let transition = navigator.go_back_to(request.history_index).await?;
    transition_response(&navigator, transition)
}

/// POST /session/restart
#[instrument(skip(state))]
async fn restart(State(state): State<AppState>) -> Result<Json<TransitionResponse>, ApiError> {
    let mut navigator = state.navigator.lock().await;
    let transition = navigator.restart().await?;
    transition_response(&navigator, transition)
}

/// Returns the router for the navigation session.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", get(current_session))
        .route("/session/load", post(load_scenario))
        .route("/session/resume", post(resume))
        .route("/session/saved", delete(clear_saved))
        .route("/session/advance", post(advance))
        .route("/session/back", post(go_back))
        .route("/session/back-to", post(go_back_to))
        .route("/session/restart", post(restart))
}
