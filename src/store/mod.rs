//! SQLite question store
//!
//! Holds questions, tags and the question/tag link table. Search is read-only;
//! the write paths (seeding, resolved flip) run inside a transaction.

mod schema;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::AppError;
use crate::forum::{NewQuestion, Question, QuestionId, Tag};
use crate::search::predicate::fold_case;
use crate::search::{query, FilterPlan, FilterState};

/// Upper bound on ids per tag lookup, well under SQLite's variable limit
const TAG_BATCH_SIZE: usize = 500;

/// Question store backed by a SQLite pool
#[derive(Clone)]
pub struct QuestionStore {
    pool: SqlitePool,
}

impl QuestionStore {
    /// Open (creating if missing) the database at `database_url`, e.g. `sqlite://askboard.db`
    pub async fn open(database_url: &str) -> Result<Self, AppError> {
        if is_memory_url(database_url) {
            return Self::in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Config(format!("Invalid database URL {}: {}", database_url, e)))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        info!(url = %database_url, "Opening question store");

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(8)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect_with(options)
            .await
            .map_err(|e| AppError::StoreFailure(format!("Failed to connect to database: {}", e)))?;

        Self::init(pool).await
    }

    /// Private in-memory database, used by tests and `sqlite::memory:`
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::Config(e.to_string()))?
            .foreign_keys(true);

        // Every connection to :memory: is a separate database, so the pool
        // must hold exactly one connection and never recycle it.
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| AppError::StoreFailure(format!("Failed to open in-memory database: {}", e)))?;

        Self::init(pool).await
    }

    async fn init(pool: SqlitePool) -> Result<Self, AppError> {
        for (name, statement) in schema::SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| AppError::StoreFailure(format!("Failed to create {}: {}", name, e)))?;
        }
        debug!("Question store schema ready");
        Ok(Self { pool })
    }

    /// Close the pool. Every later call fails with a store failure.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Questions matching every active predicate of `filter`, newest first
    pub async fn search(&self, filter: &FilterState) -> Result<Vec<Question>, AppError> {
        let plan = FilterPlan::from_filter(filter);
        debug!(predicates = ?plan.predicates(), "Running question search");

        let mut builder = query::search_query(&plan);
        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(store_failure)?;

        let mut questions = rows
            .iter()
            .map(question_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        self.attach_tags(&mut questions).await?;

        debug!(count = questions.len(), "Question search finished");
        Ok(questions)
    }

    /// Single question with tags
    pub async fn get_question(&self, id: QuestionId) -> Result<Question, AppError> {
        let row = sqlx::query(
            "SELECT q.id, q.title, q.content, q.created_at, q.is_resolved FROM questions q WHERE q.id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_failure)?
        .ok_or_else(|| AppError::NotFound(format!("Question {} does not exist", id)))?;

        let mut questions = vec![question_from_row(&row)?];
        self.attach_tags(&mut questions).await?;
        Ok(questions.remove(0))
    }

    /// All tags, sorted by name
    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        let rows = sqlx::query("SELECT id, name FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(store_failure)?;

        rows.iter()
            .map(|row| {
                Ok(Tag {
                    id: row.try_get("id").map_err(store_failure)?,
                    name: row.try_get("name").map_err(store_failure)?,
                })
            })
            .collect()
    }

    /// Insert a question, creating any tags it names
    pub async fn create_question(&self, new: &NewQuestion) -> Result<Question, AppError> {
        new.validate()?;

        let created_at = new.created_at.unwrap_or_else(Utc::now);
        let tag_names: BTreeSet<&str> = new.tags.iter().map(|t| t.trim()).collect();

        let mut tx = self.pool.begin().await.map_err(store_failure)?;

        let result = sqlx::query(
            "INSERT INTO questions (title, content, title_folded, content_folded, created_at, is_resolved) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.title)
        .bind(&new.content)
        .bind(fold_case(&new.title))
        .bind(fold_case(&new.content))
        .bind(created_at.timestamp_millis())
        .bind(new.is_resolved)
        .execute(&mut *tx)
        .await
        .map_err(store_failure)?;
        let question_id = result.last_insert_rowid();

        for name in tag_names {
            sqlx::query("INSERT INTO tags (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
                .bind(name)
                .execute(&mut *tx)
                .await
                .map_err(store_failure)?;

            let tag_id: i64 = sqlx::query_scalar("SELECT id FROM tags WHERE name = ?")
                .bind(name)
                .fetch_one(&mut *tx)
                .await
                .map_err(store_failure)?;

            sqlx::query("INSERT OR IGNORE INTO question_tags (question_id, tag_id) VALUES (?, ?)")
                .bind(question_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .map_err(store_failure)?;
        }

        tx.commit().await.map_err(store_failure)?;
        debug!(id = question_id, "Created question");

        self.get_question(QuestionId(question_id)).await
    }

    /// Flip the resolved flag (answer acceptance)
    pub async fn set_resolved(&self, id: QuestionId, resolved: bool) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE questions SET is_resolved = ? WHERE id = ?")
            .bind(resolved)
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(store_failure)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Question {} does not exist", id)));
        }
        info!(id = %id, resolved, "Updated resolved state");
        Ok(())
    }

    async fn attach_tags(&self, questions: &mut [Question]) -> Result<(), AppError> {
        if questions.is_empty() {
            return Ok(());
        }

        let ids: Vec<QuestionId> = questions.iter().map(|q| q.id).collect();
        let mut by_question: HashMap<i64, Vec<Tag>> = HashMap::new();

        for chunk in ids.chunks(TAG_BATCH_SIZE) {
            let mut builder = query::tags_query(chunk);
            let rows = builder
                .build()
                .fetch_all(&self.pool)
                .await
                .map_err(store_failure)?;

            for row in &rows {
                let question_id: i64 = row.try_get(0).map_err(store_failure)?;
                let tag = Tag {
                    id: row.try_get(1).map_err(store_failure)?,
                    name: row.try_get(2).map_err(store_failure)?,
                };
                by_question.entry(question_id).or_default().push(tag);
            }
        }

        for question in questions.iter_mut() {
            question.tags = by_question.remove(&question.id.0).unwrap_or_default();
        }
        Ok(())
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Every failure inside the store is reported as one opaque kind
fn store_failure(err: sqlx::Error) -> AppError {
    AppError::StoreFailure(err.to_string())
}

fn question_from_row(row: &SqliteRow) -> Result<Question, AppError> {
    let millis: i64 = row.try_get("created_at").map_err(store_failure)?;
    let created_at = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| AppError::StoreFailure(format!("Invalid created_at value {}", millis)))?;

    Ok(Question {
        id: QuestionId(row.try_get("id").map_err(store_failure)?),
        title: row.try_get("title").map_err(store_failure)?,
        content: row.try_get("content").map_err(store_failure)?,
        created_at,
        is_resolved: row.try_get("is_resolved").map_err(store_failure)?,
        tags: Vec::new(),
    })
}
