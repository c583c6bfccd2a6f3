//! Request handlers for the question API

use axum::extract::{Path, RawQuery, State};
use axum::Json;
use tracing::info;

use crate::error::AppError;
use crate::forum::{Question, QuestionId, Tag};
use crate::search::FilterState;

use super::AppState;

/// GET /api/get-questions?tag=a,b&isResolved=true&keyword=x
pub async fn get_questions(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<Question>>, AppError> {
    let filter = FilterState::from_query_str(query.as_deref().unwrap_or_default());
    let questions = state.store.search(&filter).await?;
    info!(
        tags = ?filter.sorted_tags(),
        keyword = filter.active_keyword().unwrap_or_default(),
        resolved = ?filter.resolved(),
        count = questions.len(),
        "Served question search"
    );
    Ok(Json(questions))
}

/// GET /api/questions/{id}
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Question>, AppError> {
    let id: QuestionId = id.parse()?;
    Ok(Json(state.store.get_question(id).await?))
}

/// GET /api/tags
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, AppError> {
    Ok(Json(state.store.list_tags().await?))
}

pub async fn health() -> &'static str {
    "ok"
}
