//! Client for the askboard HTTP API

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{AppError, ErrorBody};
use crate::forum::{Question, QuestionId, Tag};
use crate::http::client_with_timeout;
use crate::search::FilterState;

/// Typed access to the question endpoints of a running server
#[derive(Clone)]
pub struct ForumClient {
    client: reqwest::Client,
    base: Url,
}

impl ForumClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3000`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| AppError::InvalidInput(format!("Invalid server URL {}: {}", base_url, e)))?;
        // Url::join drops the last path segment unless it ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client: client_with_timeout(timeout)?,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// GET /api/get-questions with the filter's active parameters
    pub async fn fetch_questions(&self, filter: &FilterState) -> Result<Vec<Question>, AppError> {
        let url = self.endpoint("api/get-questions")?;
        let params = filter.to_query_pairs();
        debug!(%url, ?params, "Fetching questions");

        let response = self.client.get(url).query(&params).send().await?;
        read_json(response).await
    }

    /// GET /api/questions/{id}
    pub async fn fetch_question(&self, id: QuestionId) -> Result<Question, AppError> {
        let url = self.endpoint(&format!("api/questions/{}", id))?;
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    /// GET /api/tags
    pub async fn fetch_tags(&self) -> Result<Vec<Tag>, AppError> {
        let url = self.endpoint("api/tags")?;
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        self.base
            .join(path)
            .map_err(|e| AppError::Internal(format!("Cannot build endpoint URL: {}", e)))
    }
}

/// Decode a success body, or turn an `{ error }` body into an AppError
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    Err(match status {
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => AppError::Timeout(message),
        _ => AppError::RequestFailed(format!("{}: {}", status, message)),
    })
}
