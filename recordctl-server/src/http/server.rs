//! Axum server setup
//!
//! Server skeleton with:
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::repos::RecordRepository;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    pub bind_addr: SocketAddr,

    /// Path segment the record routes live under (default: records)
    pub collection: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            collection: "records".to_string(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordRepository>,
}

impl AppState {
    pub fn new(records: Arc<dyn RecordRepository>) -> Self {
        Self { records }
    }
}

/// Build the application router with all routes.
pub fn build_router(state: AppState, collection: &str) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::records::router(collection))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&config.database).await?;
/// let records = Arc::new(PgRecordRepo::new(pool.clone()));
/// run_server(records, ServerConfig::default()).await?;
/// pool.close().await;
/// ```
pub async fn run_server(
    records: Arc<dyn RecordRepository>,
    config: ServerConfig,
) -> Result<(), ServerError> {
    let app = build_router(AppState::new(records), &config.collection);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        collection = %config.collection,
        "Server listening on {}",
        config.bind_addr
    );

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
