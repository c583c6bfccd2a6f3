//! `askboard tags`: the tag catalog

use crate::cli::ConnectionArgs;
use crate::config::Config;
use crate::error::AppError;
use crate::page::QuestionSource;

use super::Backend;

pub async fn execute_tags(args: ConnectionArgs, config: &Config) -> Result<String, AppError> {
    let backend = Backend::connect(&args, config).await?;
    let result = list_tags(&backend).await;
    backend.close().await;
    result
}

pub async fn list_tags<S: QuestionSource>(source: &S) -> Result<String, AppError> {
    let tags = source.fetch_tags().await?;
    if tags.is_empty() {
        return Ok("No tags yet.".to_string());
    }

    let mut output = format!("Tags ({}):\n", tags.len());
    for tag in tags {
        output.push_str(&format!("  • {}\n", tag.name));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_helpers::scenario_store;
    use crate::store::QuestionStore;

    #[tokio::test]
    async fn test_list_tags() {
        let out = list_tags(&scenario_store().await).await.unwrap();
        assert_eq!(out, "Tags (2):\n  • concurrency\n  • memory\n");
    }

    #[tokio::test]
    async fn test_list_tags_empty() {
        let store = QuestionStore::in_memory().await.unwrap();
        assert_eq!(list_tags(&store).await.unwrap(), "No tags yet.");
    }
}
