//! `askboard seed`: bulk-load questions from a JSON file

use std::fs;
use std::path::Path;
use tracing::info;

use crate::cli::SeedArgs;
use crate::config::Config;
use crate::error::AppError;
use crate::forum::NewQuestion;
use crate::store::QuestionStore;

use super::database_url;

pub async fn execute_seed(args: SeedArgs, config: &Config) -> Result<String, AppError> {
    let questions = read_seed_file(&args.file)?;
    let database = database_url(&args.database, config);

    let store = QuestionStore::open(database).await?;
    let result = seed_questions(&store, &questions).await;
    store.close().await;

    let count = result?;
    Ok(format!("✓ Seeded {} question(s) into {}", count, database))
}

/// Parse and validate every entry before anything is written
pub fn read_seed_file(path: &Path) -> Result<Vec<NewQuestion>, AppError> {
    let data = fs::read_to_string(path).map_err(|e| {
        AppError::InvalidInput(format!("Failed to read seed file {}: {}", path.display(), e))
    })?;
    let questions: Vec<NewQuestion> = serde_json::from_str(&data)?;

    for (index, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|e| AppError::InvalidInput(format!("Entry {}: {}", index, e)))?;
    }
    Ok(questions)
}

pub async fn seed_questions(store: &QuestionStore, questions: &[NewQuestion]) -> Result<usize, AppError> {
    for question in questions {
        store.create_question(question).await?;
    }
    info!(count = questions.len(), "Seeded questions");
    Ok(questions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forum::QuestionId;
    use crate::search::FilterState;

    const SEED: &str = r#"[
        {"title": "Deadlock", "content": "Two threads", "createdAt": "2024-06-01T10:00:00Z", "tags": ["concurrency"]},
        {"title": "Paging", "content": "MMU", "isResolved": true, "tags": ["memory", "os"]}
    ]"#;

    #[test]
    fn test_read_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(&path, SEED).unwrap();

        let questions = read_seed_file(&path).unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions[1].is_resolved);
        assert!(questions[1].created_at.is_none());
    }

    #[test]
    fn test_blank_title_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(&path, r#"[{"title": "ok", "content": ""}, {"title": "  ", "content": ""}]"#).unwrap();

        let err = read_seed_file(&path).unwrap_err();
        assert!(err.to_string().contains("Entry 1"));
    }

    #[test]
    fn test_malformed_json_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(&path, "{").unwrap();
        assert!(matches!(read_seed_file(&path), Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_execute_seed_into_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        fs::write(&path, SEED).unwrap();
        let database = format!("sqlite://{}", dir.path().join("board.db").display());

        let args = SeedArgs {
            file: path,
            database: Some(database.clone()),
        };
        let out = execute_seed(args, &Config::default()).await.unwrap();
        assert!(out.contains("Seeded 2 question(s)"));

        let store = QuestionStore::open(&database).await.unwrap();
        let paging = store.get_question(QuestionId(2)).await.unwrap();
        assert_eq!(paging.tags.len(), 2);
        let os = store.search(&FilterState::new().with_tag("os")).await.unwrap();
        assert_eq!(os.len(), 1);
    }
}
