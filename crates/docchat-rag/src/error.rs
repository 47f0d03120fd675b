//! Error types for the document Q&A system

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for docchat-rag operations
pub type Result<T> = std::result::Result<T, Error>;

/// Document Q&A system errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or out-of-range request parameter
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Session id is not a valid version-4 UUID
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    /// Uploaded file failed size/type validation
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// Uploaded document could not be parsed into text
    #[error("Unsupported document '{filename}': {message}")]
    UnsupportedDocument { filename: String, message: String },

    /// No verified owner identity on the request
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Embedding provider error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Generative model error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Vector index write failure
    #[error("Index write failed: {0}")]
    IndexWrite(String),

    /// Vector index search/delete failure
    #[error("Index error: {0}")]
    Index(String),

    /// Conversation store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an invalid session id error
    pub fn invalid_session_id(message: impl Into<String>) -> Self {
        Self::InvalidSessionId(message.into())
    }

    /// Create an invalid upload error
    pub fn invalid_upload(message: impl Into<String>) -> Self {
        Self::InvalidUpload(message.into())
    }

    /// Create an unsupported document error
    pub fn unsupported_document(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedDocument {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an index write error
    pub fn index_write(message: impl Into<String>) -> Self {
        Self::IndexWrite(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            Error::InvalidSessionId(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_session_id", msg.clone())
            }
            Error::InvalidUpload(msg) => (StatusCode::BAD_REQUEST, "invalid_upload", msg.clone()),
            Error::UnsupportedDocument { filename, message } => (
                StatusCode::BAD_REQUEST,
                "unsupported_document",
                format!("Failed to parse '{}': {}", filename, message),
            ),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            Error::Embedding(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "embedding_error", msg.clone())
            }
            Error::Llm(msg) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error", msg.clone()),
            Error::IndexWrite(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "index_write_error", msg.clone())
            }
            Error::Index(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "index_error", msg.clone()),
            Error::Storage(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg.clone())
            }
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
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
