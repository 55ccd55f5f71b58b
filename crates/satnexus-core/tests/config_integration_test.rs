//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use satnexus_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use satnexus_core::geo::{AreaMode, CoordinateValidity};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_KEYS: [&str; 6] = [
    "SATNEXUS_PORT",
    "SATNEXUS_AREA_MODE",
    "SATNEXUS_COORDINATE_VALIDITY",
    "SATNEXUS_JWT_SECRET",
    "SATNEXUS_MAX_UPLOAD_BYTES",
    "DATABASE_URL",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("SATNEXUS_PORT", "4100");
    env::set_var("SATNEXUS_AREA_MODE", "geodesic");
    env::set_var("DATABASE_URL", "postgresql://localhost/satnexus");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
port = 8080
area_mode = "Planar"
coordinate_validity = "Lenient"
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap().load_from_env();

    assert_eq!(config.port.value, 4100);
    assert_eq!(config.port.source, ConfigSource::Environment);
    assert_eq!(config.area_mode.value, AreaMode::Geodesic);
    assert_eq!(config.area_mode.source, ConfigSource::Environment);
    assert_eq!(config.database_url.value.as_deref(), Some("postgresql://localhost/satnexus"));
    // Only set in the file
    assert_eq!(config.coordinate_validity.value, CoordinateValidity::Lenient);
    assert_eq!(config.coordinate_validity.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("SATNEXUS_PORT", "not-a-port");
    env::set_var("SATNEXUS_COORDINATE_VALIDITY", "sloppy");
    env::set_var("SATNEXUS_MAX_UPLOAD_BYTES", "0");
    env::set_var("SATNEXUS_JWT_SECRET", "");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.port.value, 3001);
    assert_eq!(config.port.source, ConfigSource::Default);
    assert_eq!(config.coordinate_validity.value, CoordinateValidity::Strict);
    assert_eq!(config.max_upload_bytes.source, ConfigSource::Default);
    assert!(config.uses_dev_secret());

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_all() {
    clear_env();
    env::set_var("SATNEXUS_PORT", "4100");
    env::set_var("SATNEXUS_JWT_SECRET", "from-env");

    let mut config = LayeredConfig::with_defaults().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        port: Some(5000),
        jwt_secret: Some("from-cli".to_string()),
        ..Default::default()
    });

    assert_eq!(config.port.value, 5000);
    assert_eq!(config.port.source, ConfigSource::Cli);
    assert_eq!(config.jwt_secret.value, "from-cli");

    assert!(ConfigSource::Cli.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());

    clear_env();
}

#[test]
#[serial]
fn test_missing_config_file_is_an_error() {
    clear_env();
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/satnexus.toml");
    assert!(result.is_err());
}
