//! `askboard show`: question detail view

use tracing::debug;

use crate::cli::ShowArgs;
use crate::config::Config;
use crate::error::AppError;
use crate::forum::QuestionId;
use crate::page::{render_question_detail, PassthroughRenderer, QuestionSource};

use super::Backend;

pub async fn execute_show(args: ShowArgs, config: &Config) -> Result<String, AppError> {
    let id: QuestionId = args.id.parse()?;
    let backend = Backend::connect(&args.connection, config).await?;
    let result = show_question(&backend, id).await;
    backend.close().await;
    result
}

pub async fn show_question<S: QuestionSource>(source: &S, id: QuestionId) -> Result<String, AppError> {
    debug!(id = %id, "Fetching question");
    let question = source.fetch_question(id).await?;
    Ok(render_question_detail(&question, &PassthroughRenderer))
}
