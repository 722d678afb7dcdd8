//! Repository implementations for database access
//!
//! `RecordRepository` is the storage contract the HTTP layer depends on.
//! Adapters:
//! - `PgRecordRepo`: PostgreSQL via sqlx
//! - `MemoryRecordRepo`: process-local map, same error semantics

use async_trait::async_trait;

use crate::models::{NewRecord, Record, RecordChanges};

pub mod memory;
pub mod records;

pub use memory::MemoryRecordRepo;
pub use records::PgRecordRepo;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    pub(crate) fn record_not_found(id: &str) -> Self {
        Self::NotFound {
            resource: "record",
            id: id.to_owned(),
        }
    }
}

/// Storage contract for records.
///
/// Every method is a single unit of work; there are no multi-call
/// transactions. Missing rows are `DbError::NotFound`.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Short name of the backing store, e.g. "postgres".
    fn backend(&self) -> &'static str;

    /// Insert a record and return it with its store-assigned id.
    async fn create(&self, record: NewRecord) -> Result<Record, DbError>;

    /// All records, ordered by id. Empty store yields an empty vec.
    async fn read(&self) -> Result<Vec<Record>, DbError>;

    /// A single record by id.
    async fn read_one(&self, id: &str) -> Result<Record, DbError>;

    /// Overwrite the provided fields and return the row after update.
    async fn update(&self, id: &str, changes: RecordChanges) -> Result<Record, DbError>;

    /// Remove a record, returning its id.
    async fn delete(&self, id: &str) -> Result<String, DbError>;
}
