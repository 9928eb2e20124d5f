//! Branchwise API server entry point.

use branchwise_api::config::Config;
use branchwise_api::error::AppError;
use branchwise_api::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Branchwise API server");

    let config = Config::from_env()?;
    tracing::info!(
        content_dir = %config.content_dir.display(),
        progress_file = %config.progress_file.display(),
        "configuration loaded"
    );

    let app_state = AppState::from_config(&config);
    let app = branchwise_api::app(app_state);

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
