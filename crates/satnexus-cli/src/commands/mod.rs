//! Command implementations

mod analyses;
mod area;
mod config;
mod db;
mod images;
mod seed;
mod token;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use satnexus_core::config::LayeredConfig;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Token(args) => token::execute(args, &config, &output),
        Commands::Area(args) => area::execute(args, &config, &output),
        Commands::Db(args) => db::execute(args, &config, &output).await,
        Commands::Seed(args) => seed::execute(args, &config, &output).await,
        Commands::Images(args) => images::execute(args, &config, &output).await,
        Commands::Analyses(args) => analyses::execute(args, &config, &output).await,
        Commands::Config => config::execute(&config, &output),
    }
}

/// Defaults, then the config file, then the environment, then flags
fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = match &cli.config {
        Some(path) => LayeredConfig::with_defaults()
            .load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?
            .load_from_env(),
        None => LayeredConfig::load().context("Failed to load configuration")?,
    };

    config.update_from_cli(cli.overrides());
    config.validate().context("Invalid configuration")?;

    Ok(config)
}
