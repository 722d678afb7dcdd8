//! HTTP server command
//!
//! Loads configuration, opens the PostgreSQL pool and serves the record API
//! until Ctrl+C/SIGTERM. The pool is closed after the server stops.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use recordctl_server::config::AppConfig;
use recordctl_server::db::{create_pool, ensure_schema, PgRecordRepo};
use recordctl_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// YAML config file
    #[arg(long, short = 'c', env = "RECORDCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind to (overrides server.host/server.port)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides config/environment)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Path segment for the record routes, e.g. "albums"
    #[arg(long)]
    pub collection: Option<String>,

    /// Create the records table if it does not exist
    #[arg(long)]
    pub init_schema: bool,
}

impl ServeArgs {
    /// Apply command-line overrides on top of file/environment config.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(bind) = self.bind {
            config.server.host = bind.ip().to_string();
            config.server.port = bind.port();
        }
        if let Some(url) = &self.database_url {
            config.database.url = Some(url.clone());
        }
        if let Some(collection) = &self.collection {
            config.server.collection = collection.clone();
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config =
        AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;

    let server_config = ServerConfig {
        bind_addr: config.bind_addr()?,
        collection: config.server.collection.clone(),
    };

    tracing::info!(database = ?config.database, "Connecting to database");
    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;
    tracing::info!("Successfully connected to database");

    if args.init_schema {
        ensure_schema(&pool)
            .await
            .context("Failed to create records table")?;
    }

    let records = Arc::new(PgRecordRepo::new(pool.clone()));

    // Run server (blocks until shutdown), then release the pool
    let result = run_server(records, server_config)
        .await
        .context("Server error");
    pool.close().await;

    result
}
