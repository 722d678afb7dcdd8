//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::{ConfigError, DbConfig};

/// Create a PostgreSQL connection pool from configuration.
///
/// Connects eagerly, so an unreachable database fails here rather than
/// on the first request.
///
/// # Errors
///
/// Returns an error if the settings are invalid or the connection fails.
///
/// # Example
///
/// ```ignore
/// let config = AppConfig::load(None)?;
/// let pool = create_pool(&config.database).await?;
/// ```
pub async fn create_pool(config: &DbConfig) -> Result<PgPool, ConfigError> {
    let options = config.connect_options()?;
    tracing::debug!(?config, "connecting to database");
    Ok(create_pool_with_options(options, config.max_connections).await?)
}

/// Create a PostgreSQL connection pool with custom options.
///
/// # Arguments
///
/// * `options` - PostgreSQL connect options
/// * `max_connections` - Maximum number of connections in the pool
pub async fn create_pool_with_options(
    options: PgConnectOptions,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p recordctl-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let config = DbConfig {
            url: Some(url),
            ..Default::default()
        };
        let pool = create_pool(&config).await.expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_pool_access() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let options = PgConnectOptions::from_str(&url).expect("invalid DATABASE_URL");
        let pool = create_pool_with_options(options, 5)
            .await
            .expect("pool creation failed");

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let result: (i32,) = sqlx::query_as("SELECT $1::int")
                        .bind(i)
                        .fetch_one(&pool)
                        .await
                        .expect("concurrent query failed");
                    result.0
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.await.expect("task panicked");
            assert_eq!(result, i as i32);
        }
    }

    #[tokio::test]
    async fn invalid_settings_fail_before_connecting() {
        let config = DbConfig {
            sslmode: "sometimes".into(),
            ..Default::default()
        };
        let err = create_pool(&config).await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
