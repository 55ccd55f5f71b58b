use anyhow::{anyhow, Context, Result};
use satnexus_core::config::LayeredConfig;
use satnexus_store::ports::{AnalysisStore, ImageStore, UserStore};
use satnexus_store::postgres::{PostgresConfig, PostgresStore};
use std::sync::Arc;

/// Host, port and database of a connection string, without credentials
fn connection_target(url: &str) -> (String, String, String) {
    let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let authority = rest.rsplit_once('@').map(|(_, host)| host).unwrap_or(rest);

    let (host_port, database) = authority.split_once('/').unwrap_or((authority, "satnexus"));
    let (host, port) = host_port.split_once(':').unwrap_or((host_port, "5432"));
    let database = database.split('?').next().unwrap_or(database);

    (host.to_string(), port.to_string(), database.to_string())
}

/// Connect to the configured PostgreSQL database
pub async fn connect(config: &LayeredConfig, migrate: bool) -> Result<PostgresStore> {
    let database_url = config.database_url.value.as_deref().ok_or_else(|| {
        anyhow!("No database configured. Set DATABASE_URL or pass --database-url.")
    })?;

    let pg_config =
        PostgresConfig::from_database_url(database_url).context("Invalid database URL")?;

    let result = if migrate {
        PostgresStore::with_migrations(pg_config).await
    } else {
        PostgresStore::new(pg_config).await
    };

    result.map_err(|e| {
        let (host, port, database) = connection_target(database_url);
        anyhow!(
            "Failed to connect to PostgreSQL\n\n\
                Connection details:\n\
                  Host: {}\n\
                  Port: {}\n\
                  Database: {}\n\n\
                Remediation:\n\
                  1. Ensure PostgreSQL is running\n\
                  2. Check DATABASE_URL or --database-url\n\
                  3. Verify credentials and that the database exists\n\n\
                Error: {}",
            host,
            port,
            database,
            e
        )
    })
}

/// Catalog and account stores backed by PostgreSQL, with the schema brought
/// up to date
pub struct Storage {
    pub images: Arc<dyn ImageStore>,
    pub analyses: Arc<dyn AnalysisStore>,
    pub users: Arc<dyn UserStore>,
}

impl Storage {
    pub async fn open(config: &LayeredConfig) -> Result<Self> {
        let store = Arc::new(connect(config, true).await?);
        Ok(Self { images: store.clone(), analyses: store.clone(), users: store })
    }
}
