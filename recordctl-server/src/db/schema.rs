//! Table bootstrap for the records table
//!
//! A single idempotent statement, not a migration system.
//! `gen_random_uuid()` is built in from PostgreSQL 13.

use sqlx::PgPool;

const CREATE_RECORDS: &str = r#"
    CREATE TABLE IF NOT EXISTS records (
        id     TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
        title  TEXT   NOT NULL,
        artist TEXT   NOT NULL,
        price  BIGINT NOT NULL
    )
"#;

/// Create the `records` table when absent.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Ensuring records table exists");
    sqlx::query(CREATE_RECORDS).execute(pool).await?;
    Ok(())
}
