//! `askboard serve`

use tracing::info;

use crate::cli::ServeArgs;
use crate::config::Config;
use crate::error::AppError;
use crate::server;
use crate::store::QuestionStore;

use super::database_url;

/// Open the store and serve until shut down
pub async fn execute_serve(args: ServeArgs, config: &Config) -> Result<String, AppError> {
    let bind = args.bind.as_deref().unwrap_or(&config.bind);
    let database = database_url(&args.database, config);

    let store = QuestionStore::open(database).await?;
    info!(bind = %bind, database = %database, "Starting askboard server");
    server::serve(bind, store).await?;

    Ok("Server stopped".to_string())
}
