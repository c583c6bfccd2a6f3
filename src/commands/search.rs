//! `askboard search`: drive a search page from the command line

use std::time::Duration;
use tracing::info;
use url::Url;

use crate::cli::SearchArgs;
use crate::config::Config;
use crate::error::AppError;
use crate::page::{render_page, PassthroughRenderer, QuestionSource, SearchPage, SearchStatus};

use super::{request_timeout, Backend};

pub async fn execute_search(args: SearchArgs, config: &Config) -> Result<String, AppError> {
    let backend = Backend::connect(&args.connection, config).await?;
    let timeout = request_timeout(&args.connection, config);
    let result = run_search(&backend, &args, timeout).await;
    backend.close().await;
    result
}

/// Mount the page (from `--url` when given), apply the command-line filters
/// and search. A page still `Idle` after mounting gets one unfiltered search.
pub async fn run_search<S: QuestionSource>(
    source: &S,
    args: &SearchArgs,
    timeout: Duration,
) -> Result<String, AppError> {
    let mut page = match &args.url {
        Some(raw) => {
            let url = Url::parse(raw)
                .map_err(|e| AppError::InvalidInput(format!("Invalid page URL {}: {}", raw, e)))?;
            SearchPage::from_url(&url)
        }
        None => SearchPage::new(),
    };

    page.mount(source, timeout).await?;

    if let Some(keyword) = &args.keyword {
        page.set_keyword(keyword.as_str())?;
    }
    for name in &args.tags {
        page.select_tag(name)?;
    }
    if let Some(resolved) = args.resolved {
        page.set_resolved(Some(resolved).into())?;
    }

    if args.has_edits() || page.status() == &SearchStatus::Idle {
        page.search(source, timeout).await?;
    }

    if let SearchStatus::Error(message) = page.status() {
        return Err(AppError::RequestFailed(message.clone()));
    }

    info!(count = page.questions().len(), "Search complete");
    Ok(render_page(&page, &PassthroughRenderer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Backend;
    use crate::store::test_helpers::scenario_store;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_search_without_filters_lists_everything() {
        let backend = Backend::Local(scenario_store().await);
        let out = run_search(&backend, &SearchArgs::default(), TIMEOUT).await.unwrap();
        assert!(out.contains("Found 2 question(s)"));
        assert!(out.find("[Paging]").unwrap() < out.find("[Deadlock]").unwrap());
    }

    #[tokio::test]
    async fn test_search_from_page_url() {
        let backend = Backend::Local(scenario_store().await);
        let args = SearchArgs {
            url: Some("http://localhost/search_question?tag=concurrency".to_string()),
            ..SearchArgs::default()
        };
        let out = run_search(&backend, &args, TIMEOUT).await.unwrap();
        assert!(out.contains("Tags: concurrency"));
        assert!(out.contains("[Deadlock](/question/1)"));
        assert!(!out.contains("Paging"));
    }

    #[tokio::test]
    async fn test_search_with_filters() {
        let backend = Backend::Local(scenario_store().await);
        let args = SearchArgs {
            keyword: Some("MMU".to_string()),
            resolved: Some(true),
            ..SearchArgs::default()
        };
        let out = run_search(&backend, &args, TIMEOUT).await.unwrap();
        assert!(out.contains("Keyword: MMU | Tags: (any) | Status: resolved"));
        assert!(out.contains("Found 1 question(s)"));
    }

    #[tokio::test]
    async fn test_search_with_no_matches() {
        let backend = Backend::Local(scenario_store().await);
        let args = SearchArgs {
            keyword: Some("kubernetes".to_string()),
            ..SearchArgs::default()
        };
        let out = run_search(&backend, &args, TIMEOUT).await.unwrap();
        assert!(out.contains("No questions matched the current filters."));
    }

    #[tokio::test]
    async fn test_unknown_tag_is_invalid_input() {
        let backend = Backend::Local(scenario_store().await);
        let args = SearchArgs {
            tags: vec!["kernel".to_string()],
            ..SearchArgs::default()
        };
        let err = run_search(&backend, &args, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_generic_message() {
        let store = scenario_store().await;
        store.close().await;
        let err = run_search(&Backend::Local(store), &SearchArgs::default(), TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Request failed: Failed to fetch questions");
        assert_eq!(err.exit_code(), 2);
    }
}
