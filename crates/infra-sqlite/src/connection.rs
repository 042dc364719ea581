// SQLite Connection Pool Setup

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use taskdesk_core::error::{AppError, Result};

/// Create SQLite connection pool with WAL mode
///
/// `sqlite::memory:` gets a single connection: every pooled connection to
/// an in-memory database would otherwise see its own empty database.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
        .busy_timeout(Duration::from_secs(5))
        .create_if_missing(true);
    if !in_memory {
        options = options.journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);
    }

    let mut pool_options = SqlitePoolOptions::new().max_connections(if in_memory { 1 } else { 10 });
    if in_memory {
        // Closing the only connection drops the database
        pool_options = pool_options
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        assert!(pool.acquire().await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_is_database_error() {
        let err = create_pool("postgres://nope").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
