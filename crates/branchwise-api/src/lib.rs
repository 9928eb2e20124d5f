//! Branchwise HTTP API: a single-session JSON adapter over the scenario
//! navigator.

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use state::AppState;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::scenarios::router())
        .merge(routes::session::router())
        .merge(routes::progress::router());

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
