//! HTTP client utilities
//!
//! Provides a reqwest::Client configured with request timeouts. System proxy
//! environment variables are honored by reqwest itself.

use reqwest::Client;
use std::time::Duration;

use crate::error::AppError;

/// Connect phase is capped separately so an unreachable server fails fast
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a reqwest Client with the given overall request timeout
pub fn client_with_timeout(timeout: Duration) -> Result<Client, AppError> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .user_agent(concat!("askboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))
}
