use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::contracts::{ContractServiceError, RepositoryError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Top-level failure for the binary and for handlers that bubble errors up.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error("contract error: {0}")]
    Contract(#[from] ContractServiceError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Contract(ContractServiceError::Repository(RepositoryError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            Self::Contract(ContractServiceError::Repository(RepositoryError::Conflict)) => {
                StatusCode::CONFLICT
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
