/// Database pool creation and migration runner
///
/// Migrations live in the `migrations/` directory at the project root and
/// are embedded at compile time via `sqlx::migrate!`.

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Creates a SQLite connection pool from configuration
///
/// # Errors
///
/// Returns an error if the database file cannot be opened or created.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    info!(url = %config.url, "Database pool created");

    Ok(pool)
}

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration file is malformed or fails to execute.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool_and_migrate_in_memory() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };

        let pool = create_pool(&config).await.expect("Pool should connect");
        run_migrations(&pool).await.expect("Migrations should run");

        // Both tables exist after migration
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'tasks')",
        )
        .fetch_one(&pool)
        .await
        .expect("Query should succeed");

        assert_eq!(count, 2);
    }
}
