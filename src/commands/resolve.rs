//! `askboard resolve`: accept an answer by flipping the resolved flag

use crate::cli::ResolveArgs;
use crate::config::Config;
use crate::error::AppError;
use crate::forum::QuestionId;
use crate::store::QuestionStore;

use super::database_url;

pub async fn execute_resolve(args: ResolveArgs, config: &Config) -> Result<String, AppError> {
    let id: QuestionId = args.id.parse()?;
    let store = QuestionStore::open(database_url(&args.database, config)).await?;
    let result = resolve_question(&store, id, !args.unresolve).await;
    store.close().await;
    result
}

pub async fn resolve_question(store: &QuestionStore, id: QuestionId, resolved: bool) -> Result<String, AppError> {
    store.set_resolved(id, resolved).await?;
    let state = if resolved { "resolved" } else { "unresolved" };
    Ok(format!("✓ Question {} marked {}", id, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{FilterState, ResolvedFilter};
    use crate::store::test_helpers::scenario_store;

    #[tokio::test]
    async fn test_resolve_and_unresolve() {
        let store = scenario_store().await;

        let out = resolve_question(&store, QuestionId(1), true).await.unwrap();
        assert_eq!(out, "✓ Question 1 marked resolved");
        let open = store
            .search(&FilterState::new().with_resolved(ResolvedFilter::Unresolved))
            .await
            .unwrap();
        assert!(open.is_empty());

        resolve_question(&store, QuestionId(2), false).await.unwrap();
        assert!(!store.get_question(QuestionId(2)).await.unwrap().is_resolved);
    }

    #[tokio::test]
    async fn test_resolve_unknown_question() {
        let store = scenario_store().await;
        let err = resolve_question(&store, QuestionId(50), true).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
