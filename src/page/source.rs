//! Where a search page gets its data from

use std::future::Future;

use crate::client::ForumClient;
use crate::error::AppError;
use crate::forum::{Question, QuestionId, Tag};
use crate::search::FilterState;
use crate::store::QuestionStore;

/// Backend answering the page's requests: the HTTP API or a local store
pub trait QuestionSource {
    fn fetch_questions(
        &self,
        filter: &FilterState,
    ) -> impl Future<Output = Result<Vec<Question>, AppError>> + Send;

    fn fetch_question(&self, id: QuestionId) -> impl Future<Output = Result<Question, AppError>> + Send;

    fn fetch_tags(&self) -> impl Future<Output = Result<Vec<Tag>, AppError>> + Send;
}

impl QuestionSource for ForumClient {
    async fn fetch_questions(&self, filter: &FilterState) -> Result<Vec<Question>, AppError> {
        ForumClient::fetch_questions(self, filter).await
    }

    async fn fetch_question(&self, id: QuestionId) -> Result<Question, AppError> {
        ForumClient::fetch_question(self, id).await
    }

    async fn fetch_tags(&self) -> Result<Vec<Tag>, AppError> {
        ForumClient::fetch_tags(self).await
    }
}

impl QuestionSource for QuestionStore {
    async fn fetch_questions(&self, filter: &FilterState) -> Result<Vec<Question>, AppError> {
        self.search(filter).await
    }

    async fn fetch_question(&self, id: QuestionId) -> Result<Question, AppError> {
        self.get_question(id).await
    }

    async fn fetch_tags(&self) -> Result<Vec<Tag>, AppError> {
        self.list_tags().await
    }
}
