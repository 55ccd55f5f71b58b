//! PostgreSQL connection settings

use std::time::Duration;
use thiserror::Error;

/// Rejected connection settings
#[derive(Debug, Error)]
#[error("Invalid configuration value for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub reason: String,
}

impl ConfigError {
    fn new(key: &'static str, reason: impl Into<String>) -> Self {
        Self { key, reason: reason.into() }
    }
}

/// Where the catalog database lives and how many connections to keep
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub database_url: String,
    pub pool: PoolConfig,
}

impl PostgresConfig {
    /// Settings for `database_url` with the default pool sizing
    pub fn from_database_url(database_url: &str) -> Result<Self, ConfigError> {
        let config =
            Self { database_url: database_url.trim().to_string(), pool: PoolConfig::default() };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.database_url.trim();
        if url.is_empty() {
            return Err(ConfigError::new("database_url", "cannot be empty"));
        }

        let scheme_ok = ["postgres://", "postgresql://"].iter().any(|s| url.starts_with(s));
        if !scheme_ok {
            return Err(ConfigError::new(
                "database_url",
                "must start with postgres:// or postgresql://",
            ));
        }

        self.pool.validate()
    }
}

/// Connection pool sizing and timeouts
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Idle connections are closed after this long
    pub idle_timeout: Duration,
    /// Connections are recycled after this long
    pub max_lifetime: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_connections: 1,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(10 * 60),
            max_lifetime: Duration::from_secs(30 * 60),
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::new("pool.max_connections", "must be greater than 0"));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::new(
                "pool.min_connections",
                format!(
                    "{} exceeds max_connections ({})",
                    self.min_connections, self.max_connections
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_both_schemes() {
        assert!(PostgresConfig::from_database_url("postgresql://localhost/satnexus").is_ok());
        assert!(PostgresConfig::from_database_url(" postgres://user:pw@db:5432/satnexus ").is_ok());
    }

    #[test]
    fn test_rejects_blank_url() {
        let err = PostgresConfig::from_database_url("  ").unwrap_err();
        assert_eq!(err.key, "database_url");
    }

    #[test]
    fn test_rejects_other_databases() {
        assert!(PostgresConfig::from_database_url("mongodb://localhost:27017/satellite-app").is_err());
    }

    #[test]
    fn test_pool_bounds() {
        assert!(PoolConfig::default().validate().is_ok());

        let pool = PoolConfig { min_connections: 20, max_connections: 10, ..Default::default() };
        assert_eq!(pool.validate().unwrap_err().key, "pool.min_connections");

        let pool = PoolConfig { min_connections: 0, max_connections: 0, ..Default::default() };
        assert_eq!(pool.validate().unwrap_err().key, "pool.max_connections");
    }
}
