//! HTTP service exposing the question search endpoint
//!
//! Routes:
//! - `GET /api/get-questions` filtered search
//! - `GET /api/questions/{id}` single question
//! - `GET /api/tags` tag catalog
//! - `GET /health`

mod handlers;

#[cfg(test)]
mod api_tests;

use axum::{routing::get, Router};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::AppError;
use crate::store::QuestionStore;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: QuestionStore,
}

pub fn router(store: QuestionStore) -> Router {
    Router::new()
        .route("/api/get-questions", get(handlers::get_questions))
        .route("/api/questions/:id", get(handlers::get_question))
        .route("/api/tags", get(handlers::list_tags))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}

/// Bind `address` and serve until Ctrl+C or SIGTERM
pub async fn serve(address: &str, store: QuestionStore) -> Result<(), AppError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind {}: {}", address, e)))?;
    serve_with_shutdown(listener, store, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    store: QuestionStore,
    shutdown: F,
) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = listener.local_addr()?;
    info!("Server running on http://{}", address);

    axum::serve(listener, router(store.clone()))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    store.close().await;
    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
