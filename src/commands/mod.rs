//! CLI command executors
//!
//! Each command returns the text to print on stdout. Logging goes to stderr.

pub mod resolve;
pub mod search;
pub mod seed;
pub mod serve;
pub mod show;
pub mod tags;

use std::time::Duration;
use tracing::debug;

use crate::cli::ConnectionArgs;
use crate::client::ForumClient;
use crate::config::Config;
use crate::error::AppError;
use crate::forum::{Question, QuestionId, Tag};
use crate::page::QuestionSource;
use crate::search::FilterState;
use crate::store::QuestionStore;

/// Data backend picked from the connection flags
#[derive(Clone)]
pub enum Backend {
    Remote(ForumClient),
    Local(QuestionStore),
}

impl Backend {
    /// `--database` wins over `--server`; with neither the configured server is used
    pub async fn connect(args: &ConnectionArgs, config: &Config) -> Result<Self, AppError> {
        if let Some(database) = &args.database {
            debug!(database = %database, "Using local store");
            return Ok(Backend::Local(QuestionStore::open(database).await?));
        }

        let server = args.server.as_deref().unwrap_or(&config.server_url);
        debug!(server = %server, "Using remote server");
        let client = ForumClient::new(server, request_timeout(args, config))?;
        Ok(Backend::Remote(client))
    }

    pub async fn close(&self) {
        if let Backend::Local(store) = self {
            store.close().await;
        }
    }
}

impl QuestionSource for Backend {
    async fn fetch_questions(&self, filter: &FilterState) -> Result<Vec<Question>, AppError> {
        match self {
            Backend::Remote(client) => client.fetch_questions(filter).await,
            Backend::Local(store) => store.search(filter).await,
        }
    }

    async fn fetch_question(&self, id: QuestionId) -> Result<Question, AppError> {
        match self {
            Backend::Remote(client) => client.fetch_question(id).await,
            Backend::Local(store) => store.get_question(id).await,
        }
    }

    async fn fetch_tags(&self) -> Result<Vec<Tag>, AppError> {
        match self {
            Backend::Remote(client) => client.fetch_tags().await,
            Backend::Local(store) => store.list_tags().await,
        }
    }
}

/// `--timeout` if given, else the configured request timeout
pub fn request_timeout(args: &ConnectionArgs, config: &Config) -> Duration {
    args.timeout
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| config.request_timeout())
}

/// Database named on the command line, else the configured one
pub(crate) fn database_url<'a>(flag: &'a Option<String>, config: &'a Config) -> &'a str {
    flag.as_deref().unwrap_or(&config.database_url)
}
