use crate::cli::{DbArgs, DbCommand};
use crate::output::OutputWriter;
use crate::storage;
use anyhow::{Context, Result};
use satnexus_core::config::LayeredConfig;
use satnexus_store::postgres::{MigrationStatus, PostgresStore};
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Serialize, Tabled)]
struct MigrationRow {
    #[tabled(rename = "Version")]
    version: i64,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "State")]
    state: &'static str,
}

impl From<MigrationStatus> for MigrationRow {
    fn from(status: MigrationStatus) -> Self {
        Self {
            version: status.version,
            description: status.description,
            state: if status.applied { "applied" } else { "pending" },
        }
    }
}

/// Execute database management commands
pub async fn execute(args: DbArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let store = storage::connect(config, false).await?;

    match args.command {
        DbCommand::Migrate => execute_migrate(&store, output).await,
        DbCommand::Status => execute_status(&store, output).await,
    }
}

async fn execute_migrate(store: &PostgresStore, output: &OutputWriter) -> Result<()> {
    let pending = store
        .has_pending_migrations()
        .await
        .context("Failed to check migration status")?;

    if !pending {
        output.success("Schema is up to date");
        return Ok(());
    }

    output.info("Applying pending migrations...");
    store.run_migrations().await.context("Failed to apply migrations")?;
    output.success("Migrations applied");

    Ok(())
}

async fn execute_status(store: &PostgresStore, output: &OutputWriter) -> Result<()> {
    let statuses = store.migration_status().await.context("Failed to read migration status")?;
    let pending = statuses.iter().filter(|s| !s.applied).count();

    let rows: Vec<MigrationRow> = statuses.into_iter().map(MigrationRow::from).collect();
    output.section("Migrations");
    output.table(rows)?;

    if pending > 0 {
        output.warning(format!("{} pending migration(s). Run `satnexus db migrate`.", pending));
    }

    Ok(())
}
