//! Command-line interface
//!
//! Every command except `serve` talks either to a running server (default)
//! or straight to a database with `--database`.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// askboard CLI
#[derive(Parser, Debug)]
#[command(name = "askboard")]
#[command(about = "Anonymous Q&A forum: question search server and client", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Search questions the way the search page does
    Search(SearchArgs),
    /// Show one question
    Show(ShowArgs),
    /// List all tags
    Tags(ConnectionArgs),
    /// Load questions from a JSON file into a database
    Seed(SeedArgs),
    /// Mark a question resolved (or unresolved again)
    Resolve(ResolveArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "ASKBOARD_BIND", value_name = "ADDR")]
    pub bind: Option<String>,

    /// SQLite database URL, e.g. sqlite://askboard.db
    #[arg(long, env = "ASKBOARD_DATABASE_URL", value_name = "URL")]
    pub database: Option<String>,
}

/// Where a client command gets its data. `--database` takes precedence.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Base URL of a running askboard server
    #[arg(long, env = "ASKBOARD_SERVER_URL", value_name = "URL")]
    pub server: Option<String>,

    /// Query a SQLite database directly instead of a server
    #[arg(long, value_name = "URL")]
    pub database: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Page URL to start from; its `tag` parameter seeds the selection
    #[arg(long, value_name = "PAGE_URL")]
    pub url: Option<String>,

    /// Tag to select (repeatable, or comma-separated)
    #[arg(long = "tag", value_name = "NAME", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Case-insensitive substring of title or content
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Only resolved (true) or unresolved (false) questions
    #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
    pub resolved: Option<bool>,
}

impl SearchArgs {
    /// Whether any filter was given on the command line
    pub fn has_edits(&self) -> bool {
        !self.tags.is_empty() || self.keyword.is_some() || self.resolved.is_some()
    }
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Question id
    pub id: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    /// JSON array of {title, content, createdAt?, isResolved?, tags}
    pub file: PathBuf,

    /// Target database (defaults to the configured one)
    #[arg(long, env = "ASKBOARD_DATABASE_URL", value_name = "URL")]
    pub database: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Question id
    pub id: String,

    /// Clear the resolved flag instead of setting it
    #[arg(long)]
    pub unresolve: bool,

    #[arg(long, env = "ASKBOARD_DATABASE_URL", value_name = "URL")]
    pub database: Option<String>,
}
