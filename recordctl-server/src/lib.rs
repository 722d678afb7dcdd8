//! recordctl-server: HTTP server for record management
//!
//! Exposes create/read/update/delete over a single `records` table.
//! Handlers talk to storage only through the [`RecordRepository`] trait,
//! so PostgreSQL can be swapped for the in-memory store in tests.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{AppConfig, ConfigError, DbConfig};
pub use db::repos::{DbError, MemoryRecordRepo, PgRecordRepo, RecordRepository};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig};
pub use models::{NewRecord, Record, RecordChanges, ValidationError};
