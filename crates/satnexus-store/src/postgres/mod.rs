//! PostgreSQL storage adapter

pub mod analysis;
pub mod config;
pub mod image;
pub mod migrations;
pub mod user;

pub use config::{ConfigError, PoolConfig, PostgresConfig};
pub use migrations::{MigrationError, MigrationManager, MigrationStatus};

use satnexus_core::error::{Result, SatnexusError};
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Image, analysis and user stores backed by one PostgreSQL pool
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Open the pool and check that the server answers
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        config.validate().map_err(|e| SatnexusError::ConfigInvalid {
            key: e.key.to_string(),
            reason: e.reason,
        })?;

        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .max_lifetime(config.pool.max_lifetime)
            .connect(&config.database_url)
            .await
            .map_err(|e| SatnexusError::storage(format!("Failed to connect to database: {}", e)))?;

        sqlx::query("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(|e| SatnexusError::storage(format!("Connection test failed: {}", e)))?;

        tracing::info!(
            max_connections = config.pool.max_connections,
            "Connected to PostgreSQL"
        );

        Ok(Self { pool })
    }

    /// Open the pool and bring the schema up to date
    pub async fn with_migrations(config: PostgresConfig) -> Result<Self> {
        let store = Self::new(config).await?;
        store.run_migrations().await?;
        Ok(store)
    }

    /// Apply pending schema migrations
    pub async fn run_migrations(&self) -> Result<()> {
        self.migrations()
            .run_migrations()
            .await
            .map_err(|e| SatnexusError::storage(e.to_string()))
    }

    pub async fn migration_status(&self) -> Result<Vec<MigrationStatus>> {
        self.migrations()
            .check_status()
            .await
            .map_err(|e| SatnexusError::storage(format!("Failed to read migration status: {}", e)))
    }

    pub async fn has_pending_migrations(&self) -> Result<bool> {
        self.migrations()
            .has_pending_migrations()
            .await
            .map_err(|e| SatnexusError::storage(format!("Failed to read migration status: {}", e)))
    }

    fn migrations(&self) -> MigrationManager {
        MigrationManager::new(self.pool.clone())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Convert an unsigned paging value to a SQL BIGINT
fn to_sql_count(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_sql_count_saturates() {
        assert_eq!(to_sql_count(10), 10);
        assert_eq!(to_sql_count(u64::MAX), i64::MAX);
    }
}
