//! Error types for feedgen
//!
//! Three failure classes matter to callers:
//! - source failures abort the run,
//! - per-record failures (bad image, undecodable record) are absorbed,
//! - sink failures abort the run and carry the remote status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::blob_store::StorageError;
use crate::services::source::SourceError;

/// Sink writer errors
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Write {path} failed: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("No blob storage configured for remote destination")]
    StorageNotConfigured,
}

/// Run-level pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Serialize feed failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Feed generation failed (500)
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
