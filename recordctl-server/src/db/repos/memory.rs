//! In-memory record repository
//!
//! Drop-in substitute for `PgRecordRepo` in tests and local runs.
//! Ids are random UUIDs, as with the PostgreSQL column default.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DbError, RecordRepository};
use crate::models::{NewRecord, Record, RecordChanges};

/// Record store held in process memory, keyed (and ordered) by id
#[derive(Default)]
pub struct MemoryRecordRepo {
    records: RwLock<BTreeMap<String, Record>>,
}

impl MemoryRecordRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordRepository for MemoryRecordRepo {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, record: NewRecord) -> Result<Record, DbError> {
        let record = record.into_record(Uuid::new_v4().to_string());
        self.records
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn read(&self) -> Result<Vec<Record>, DbError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn read_one(&self, id: &str) -> Result<Record, DbError> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| DbError::record_not_found(id))
    }

    async fn update(&self, id: &str, changes: RecordChanges) -> Result<Record, DbError> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| DbError::record_not_found(id))?;
        changes.apply_to(record);
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<String, DbError> {
        self.records
            .write()
            .await
            .remove(id)
            .map(|record| record.id)
            .ok_or_else(|| DbError::record_not_found(id))
    }
}
