//! Record repository - PostgreSQL adapter
//!
//! - create/update/delete use RETURNING, so each call is one statement
//! - update binds every column through COALESCE; absent fields bind NULL
//!   and keep the stored value
//! - lookups use fetch_optional so "no rows" maps to NotFound

use async_trait::async_trait;
use sqlx::PgPool;

use super::{DbError, RecordRepository};
use crate::models::{NewRecord, Record, RecordChanges};

/// Record repository backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgRecordRepo {
    pool: PgPool,
}

impl PgRecordRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository for PgRecordRepo {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, record: NewRecord) -> Result<Record, DbError> {
        let created: Record = sqlx::query_as(
            r#"
            INSERT INTO records (title, artist, price)
            VALUES ($1, $2, $3)
            RETURNING id, title, artist, price
            "#,
        )
        .bind(record.title())
        .bind(record.artist())
        .bind(record.price())
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = %created.id, "inserted record");
        Ok(created)
    }

    async fn read(&self) -> Result<Vec<Record>, DbError> {
        let records: Vec<Record> = sqlx::query_as(
            r#"
            SELECT id, title, artist, price
            FROM records
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn read_one(&self, id: &str) -> Result<Record, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, title, artist, price
            FROM records
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::record_not_found(id))
    }

    async fn update(&self, id: &str, changes: RecordChanges) -> Result<Record, DbError> {
        let updated: Option<Record> = sqlx::query_as(
            r#"
            UPDATE records
            SET title  = COALESCE($1, title),
                artist = COALESCE($2, artist),
                price  = COALESCE($3, price)
            WHERE id = $4
            RETURNING id, title, artist, price
            "#,
        )
        .bind(changes.title.as_deref())
        .bind(changes.artist.as_deref())
        .bind(changes.price)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let updated = updated.ok_or_else(|| DbError::record_not_found(id))?;
        tracing::debug!(id = %updated.id, "updated record");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<String, DbError> {
        let deleted: Option<String> = sqlx::query_scalar(
            r#"
            DELETE FROM records
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        deleted.ok_or_else(|| DbError::record_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;
    use sqlx::postgres::PgPoolOptions;

    // Integration tests - run with DATABASE_URL set
    // cargo test -p recordctl-server -- --ignored

    async fn repo() -> PgRecordRepo {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("pool creation failed");
        ensure_schema(&pool).await.expect("schema bootstrap failed");
        PgRecordRepo::new(pool)
    }

    fn new_record(title: &str) -> NewRecord {
        NewRecord::new(title, "unknown", 49).unwrap()
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_read_one() {
        let repo = repo().await;

        let created = repo.create(new_record("New Album")).await.unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.title, "New Album");
        assert_eq!(created.artist, "unknown");
        assert_eq!(created.price, 49);

        let fetched = repo.read_one(&created.id).await.unwrap();
        assert_eq!(fetched, created);

        repo.delete(&created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn read_includes_created_record() {
        let repo = repo().await;
        let created = repo.create(new_record("Listed")).await.unwrap();

        let all = repo.read().await.unwrap();
        assert!(all.iter().any(|r| r.id == created.id));

        repo.delete(&created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn read_one_missing_is_not_found() {
        let repo = repo().await;
        let err = repo.read_one("no-such-record").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "record", .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn partial_update_preserves_other_fields() {
        let repo = repo().await;
        let created = repo.create(new_record("Before")).await.unwrap();

        let changes = RecordChanges {
            title: Some("After".into()),
            ..Default::default()
        };
        let updated = repo.update(&created.id, changes).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "After");
        assert_eq!(updated.artist, created.artist);
        assert_eq!(updated.price, created.price);

        repo.delete(&created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn empty_update_returns_unchanged_row() {
        let repo = repo().await;
        let created = repo.create(new_record("Unchanged")).await.unwrap();

        let updated = repo
            .update(&created.id, RecordChanges::default())
            .await
            .unwrap();
        assert_eq!(updated, created);

        repo.delete(&created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_binds_hostile_input_as_data() {
        let repo = repo().await;
        let created = repo.create(new_record("Safe")).await.unwrap();

        let hostile = "x'; DROP TABLE records; --";
        let changes = RecordChanges {
            artist: Some(hostile.into()),
            ..Default::default()
        };
        let updated = repo.update(&created.id, changes).await.unwrap();
        assert_eq!(updated.artist, hostile);

        repo.delete(&created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_missing_is_not_found() {
        let repo = repo().await;
        let err = repo
            .update("no-such-record", RecordChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_twice_is_not_found() {
        let repo = repo().await;
        let created = repo.create(new_record("Doomed")).await.unwrap();

        assert_eq!(repo.delete(&created.id).await.unwrap(), created.id);
        let err = repo.delete(&created.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
