//! Error types for the RAG API

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for RAG API operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG API errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client sent an unusable request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Multipart body could not be read
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    /// Ingestion service reported failure
    #[error("Failed to ingest '{file_name}'")]
    IngestionFailed { file_name: String },

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            Error::Multipart(err) => (err.status(), "multipart_error", err.body_text()),
            Error::IngestionFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ingestion_error",
                "Error ingesting document.".to_string(),
            ),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::bad_request("Question is required.").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::IngestionFailed { file_name: "a.pdf".to_string() }
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::Config("memory.service_url must not be empty".to_string())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
