//! Branchwise API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use branchwise_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer error that implements `IntoResponse`.
#[derive(Debug)]
pub enum ApiError {
    /// A navigator or store operation failed.
    Domain(DomainError),
    /// Resume was requested but nothing has been saved.
    NoSavedProgress,
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NoSavedProgress => (StatusCode::NOT_FOUND, "no_saved_progress"),
            Self::Domain(err) => match err {
                DomainError::ContentUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "content_unavailable")
                }
                DomainError::InvalidGraph { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "invalid_graph")
                }
                DomainError::UnknownChoice { .. } => (StatusCode::NOT_FOUND, "unknown_choice"),
                DomainError::ChoiceNotAvailable { .. } => {
                    (StatusCode::CONFLICT, "choice_not_available")
                }
                DomainError::NoHistory => (StatusCode::CONFLICT, "no_history"),
                DomainError::NoActiveScenario => (StatusCode::CONFLICT, "no_active_scenario"),
                DomainError::Infrastructure(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
                }
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::NoSavedProgress => "no saved progress to resume".to_owned(),
            Self::Domain(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self.message(), code = error_code, "request failed");
        }

        let body = ErrorBody {
            error: error_code,
            message: self.message(),
        };

        (status, Json(body)).into_response()
    }
}
