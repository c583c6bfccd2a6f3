//! Error types and handling for the askboard server and client

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::fmt;
use tracing::error;

/// Message shown to users when the question query could not run
pub const STORE_FAILURE_MESSAGE: &str = "Failed to fetch questions";

/// Application error types
#[derive(Debug, Clone, Serialize)]
pub enum AppError {
    /// The store could not execute a query (connectivity, SQL error, closed pool)
    StoreFailure(String),
    NotFound(String),
    /// Bad CLI or seed-file input. Filters never produce this.
    InvalidInput(String),
    /// Transport failure or non-success status from the query endpoint
    RequestFailed(String),
    Timeout(String),
    Config(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::StoreFailure(msg) => write!(f, "Store failure: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            AppError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::StoreFailure(_) => "store_failure",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::RequestFailed(_) => "request_failed",
            AppError::Timeout(_) => "timeout",
            AppError::Config(_) => "config_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status used when this error leaves the server
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to an end user.
    ///
    /// Store failures are opaque: the underlying cause is logged, never returned.
    pub fn public_message(&self) -> String {
        match self {
            AppError::StoreFailure(_) | AppError::RequestFailed(_) | AppError::Timeout(_) => {
                STORE_FAILURE_MESSAGE.to_string()
            }
            AppError::NotFound(msg) => msg.clone(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Config(_) | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidInput(_) | AppError::Config(_) => 1,
            AppError::RequestFailed(_) | AppError::StoreFailure(_) => 2,
            AppError::NotFound(_) => 3,
            AppError::Timeout(_) => 4,
            AppError::Internal(_) => 5,
        }
    }
}

/// Body of every error response: `{ "error": "..." }`
#[derive(Debug, Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.error_code(), "{}", self);
        }
        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Convert anyhow::Error to AppError
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert sqlx::Error to AppError
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            other => AppError::StoreFailure(other.to_string()),
        }
    }
}

/// Convert reqwest::Error to AppError
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(err.to_string())
        } else if err.is_decode() {
            AppError::RequestFailed(format!("Malformed response: {}", err))
        } else {
            AppError::RequestFailed(err.to_string())
        }
    }
}

/// Convert serde_json::Error to AppError
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// Convert std::io::Error to AppError
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
