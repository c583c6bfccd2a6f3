//! askboard: anonymous Q&A forum question search
//!
//! One binary, several subcommands:
//! - `serve` runs the HTTP API (`/api/get-questions` and friends)
//! - `search`, `show`, `tags` query a server or a database directly
//! - `seed`, `resolve` write to a database

mod cli;
mod client;
mod commands;
mod config;
mod error;
mod forum;
mod http;
mod page;
mod search;
mod server;
mod store;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use error::AppError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flags
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr) // stdout carries command output only
        .init();

    let result = run(cli).await;

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<String, AppError> {
    let config = match &cli.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
    .map_err(|e| AppError::Config(format!("{:#}", e)))?;

    match cli.command {
        Commands::Serve(args) => commands::serve::execute_serve(args, &config).await,
        Commands::Search(args) => commands::search::execute_search(args, &config).await,
        Commands::Show(args) => commands::show::execute_show(args, &config).await,
        Commands::Tags(args) => commands::tags::execute_tags(args, &config).await,
        Commands::Seed(args) => commands::seed::execute_seed(args, &config).await,
        Commands::Resolve(args) => commands::resolve::execute_resolve(args, &config).await,
    }
}
