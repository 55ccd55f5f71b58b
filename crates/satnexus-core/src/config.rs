use crate::error::{Result, SatnexusError};
use crate::geo::{AreaMode, CoordinateValidity};
use crate::ports::UploadPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Secret used when none is configured. Only suitable for local development.
pub const DEV_JWT_SECRET: &str = "satnexus-dev-secret";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for SatNexus
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub port: ConfigValue<u16>,
    pub cors_origin: ConfigValue<String>,
    pub database_url: ConfigValue<Option<String>>,
    pub upload_dir: ConfigValue<PathBuf>,
    pub max_upload_bytes: ConfigValue<usize>,
    pub jwt_secret: ConfigValue<String>,
    pub token_ttl_hours: ConfigValue<u32>,
    pub area_mode: ConfigValue<AreaMode>,
    pub coordinate_validity: ConfigValue<CoordinateValidity>,
    pub default_page_size: ConfigValue<u32>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            port: ConfigValue::new(3001, ConfigSource::Default),
            cors_origin: ConfigValue::new(
                "http://localhost:3000".to_string(),
                ConfigSource::Default,
            ),
            database_url: ConfigValue::new(None, ConfigSource::Default),
            upload_dir: ConfigValue::new(PathBuf::from("uploads"), ConfigSource::Default),
            max_upload_bytes: ConfigValue::new(
                UploadPolicy::default().max_bytes,
                ConfigSource::Default,
            ),
            jwt_secret: ConfigValue::new(DEV_JWT_SECRET.to_string(), ConfigSource::Default),
            token_ttl_hours: ConfigValue::new(24, ConfigSource::Default),
            area_mode: ConfigValue::new(AreaMode::Planar, ConfigSource::Default),
            coordinate_validity: ConfigValue::new(
                CoordinateValidity::Strict,
                ConfigSource::Default,
            ),
            default_page_size: ConfigValue::new(10, ConfigSource::Default),
        }
    }

    /// Defaults, then the file named by `SATNEXUS_CONFIG` (if any), then the environment
    pub fn load() -> Result<Self> {
        let config = Self::with_defaults();
        let config = match env::var("SATNEXUS_CONFIG") {
            Ok(path) => config.load_from_file(path)?,
            Err(_) => config,
        };
        Ok(config.load_from_env())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| SatnexusError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| SatnexusError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(port) = file_config.port {
            self.port.update(port, ConfigSource::File);
        }
        if let Some(cors_origin) = file_config.cors_origin {
            self.cors_origin.update(cors_origin, ConfigSource::File);
        }
        if let Some(database_url) = file_config.database_url {
            self.database_url.update(Some(database_url), ConfigSource::File);
        }
        if let Some(upload_dir) = file_config.upload_dir {
            self.upload_dir.update(upload_dir, ConfigSource::File);
        }
        if let Some(max_upload_bytes) = file_config.max_upload_bytes {
            self.max_upload_bytes.update(max_upload_bytes, ConfigSource::File);
        }
        if let Some(jwt_secret) = file_config.jwt_secret {
            self.jwt_secret.update(jwt_secret, ConfigSource::File);
        }
        if let Some(token_ttl_hours) = file_config.token_ttl_hours {
            self.token_ttl_hours.update(token_ttl_hours, ConfigSource::File);
        }
        if let Some(area_mode) = file_config.area_mode {
            self.area_mode.update(area_mode, ConfigSource::File);
        }
        if let Some(coordinate_validity) = file_config.coordinate_validity {
            self.coordinate_validity.update(coordinate_validity, ConfigSource::File);
        }
        if let Some(default_page_size) = file_config.default_page_size {
            self.default_page_size.update(default_page_size, ConfigSource::File);
        }

        self.validate()?;
        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Some(port) = parse_env::<u16>("SATNEXUS_PORT", "expected a port number") {
            self.port.update(port, ConfigSource::Environment);
        }

        if let Ok(cors_origin) = env::var("SATNEXUS_CORS_ORIGIN") {
            self.cors_origin.update(cors_origin, ConfigSource::Environment);
        }

        if let Ok(database_url) = env::var("DATABASE_URL") {
            if !database_url.trim().is_empty() {
                self.database_url.update(Some(database_url), ConfigSource::Environment);
            }
        }

        if let Ok(upload_dir) = env::var("SATNEXUS_UPLOAD_DIR") {
            self.upload_dir.update(PathBuf::from(upload_dir), ConfigSource::Environment);
        }

        if let Some(bytes) =
            parse_env::<usize>("SATNEXUS_MAX_UPLOAD_BYTES", "expected a byte count")
        {
            if bytes > 0 {
                self.max_upload_bytes.update(bytes, ConfigSource::Environment);
            } else {
                tracing::warn!("Ignoring SATNEXUS_MAX_UPLOAD_BYTES=0");
            }
        }

        if let Ok(secret) = env::var("SATNEXUS_JWT_SECRET") {
            if secret.is_empty() {
                tracing::warn!("Ignoring empty SATNEXUS_JWT_SECRET");
            } else {
                self.jwt_secret.update(secret, ConfigSource::Environment);
            }
        }

        if let Some(hours) = parse_env::<u32>("SATNEXUS_TOKEN_TTL_HOURS", "expected hours") {
            self.token_ttl_hours.update(hours, ConfigSource::Environment);
        }

        if let Ok(mode_str) = env::var("SATNEXUS_AREA_MODE") {
            match parse_area_mode(&mode_str) {
                Ok(mode) => self.area_mode.update(mode, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid SATNEXUS_AREA_MODE value '{}': expected planar or geodesic",
                    mode_str
                ),
            }
        }

        if let Ok(validity_str) = env::var("SATNEXUS_COORDINATE_VALIDITY") {
            match parse_coordinate_validity(&validity_str) {
                Ok(validity) => {
                    self.coordinate_validity.update(validity, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid SATNEXUS_COORDINATE_VALIDITY value '{}': expected strict or lenient",
                    validity_str
                ),
            }
        }

        if let Some(size) = parse_env::<u32>("SATNEXUS_PAGE_SIZE", "expected a page size") {
            if size > 0 {
                self.default_page_size.update(size, ConfigSource::Environment);
            } else {
                tracing::warn!("Ignoring SATNEXUS_PAGE_SIZE=0");
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(port) = overrides.port {
            self.port.update(port, ConfigSource::Cli);
        }
        if let Some(database_url) = overrides.database_url {
            self.database_url.update(Some(database_url), ConfigSource::Cli);
        }
        if let Some(jwt_secret) = overrides.jwt_secret {
            self.jwt_secret.update(jwt_secret, ConfigSource::Cli);
        }
        if let Some(area_mode) = overrides.area_mode {
            self.area_mode.update(area_mode, ConfigSource::Cli);
        }
        if let Some(coordinate_validity) = overrides.coordinate_validity {
            self.coordinate_validity.update(coordinate_validity, ConfigSource::Cli);
        }
    }

    /// Reject values that parse but cannot work
    pub fn validate(&self) -> Result<()> {
        if self.max_upload_bytes.value == 0 {
            return Err(SatnexusError::ConfigInvalid {
                key: "max_upload_bytes".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.default_page_size.value == 0 {
            return Err(SatnexusError::ConfigInvalid {
                key: "default_page_size".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.jwt_secret.value.is_empty() {
            return Err(SatnexusError::ConfigInvalid {
                key: "jwt_secret".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Whether the built-in development secret is still in use
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret.source == ConfigSource::Default
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy { max_bytes: self.max_upload_bytes.value, ..UploadPolicy::default() }
    }

    /// Get all configuration values as a map for inspection. Secrets are masked.
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("port".to_string(), (self.port.value.to_string(), self.port.source));
        map.insert(
            "cors_origin".to_string(),
            (self.cors_origin.value.clone(), self.cors_origin.source),
        );
        map.insert(
            "database_url".to_string(),
            (
                if self.database_url.value.is_some() { "<set>" } else { "<memory>" }.to_string(),
                self.database_url.source,
            ),
        );
        map.insert(
            "upload_dir".to_string(),
            (self.upload_dir.value.display().to_string(), self.upload_dir.source),
        );
        map.insert(
            "max_upload_bytes".to_string(),
            (self.max_upload_bytes.value.to_string(), self.max_upload_bytes.source),
        );
        map.insert("jwt_secret".to_string(), ("<redacted>".to_string(), self.jwt_secret.source));
        map.insert(
            "token_ttl_hours".to_string(),
            (self.token_ttl_hours.value.to_string(), self.token_ttl_hours.source),
        );
        map.insert(
            "area_mode".to_string(),
            (format!("{:?}", self.area_mode.value), self.area_mode.source),
        );
        map.insert(
            "coordinate_validity".to_string(),
            (format!("{:?}", self.coordinate_validity.value), self.coordinate_validity.source),
        );
        map.insert(
            "default_page_size".to_string(),
            (self.default_page_size.value.to_string(), self.default_page_size.source),
        );

        map
    }
}

fn parse_env<T: FromStr>(key: &str, expected: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} value '{}': {}", key, raw, expected);
            None
        }
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    port: Option<u16>,
    cors_origin: Option<String>,
    database_url: Option<String>,
    upload_dir: Option<PathBuf>,
    max_upload_bytes: Option<usize>,
    jwt_secret: Option<String>,
    token_ttl_hours: Option<u32>,
    area_mode: Option<AreaMode>,
    coordinate_validity: Option<CoordinateValidity>,
    default_page_size: Option<u32>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub jwt_secret: Option<String>,
    pub area_mode: Option<AreaMode>,
    pub coordinate_validity: Option<CoordinateValidity>,
}

/// Parse area mode from string
pub fn parse_area_mode(s: &str) -> Result<AreaMode> {
    match s.to_lowercase().as_str() {
        "planar" => Ok(AreaMode::Planar),
        "geodesic" => Ok(AreaMode::Geodesic),
        _ => Err(SatnexusError::ConfigInvalid {
            key: "area_mode".to_string(),
            reason: format!("Invalid area mode: {}. Use planar or geodesic", s),
        }),
    }
}

/// Parse coordinate validity mode from string
pub fn parse_coordinate_validity(s: &str) -> Result<CoordinateValidity> {
    match s.to_lowercase().as_str() {
        "strict" => Ok(CoordinateValidity::Strict),
        "lenient" => Ok(CoordinateValidity::Lenient),
        _ => Err(SatnexusError::ConfigInvalid {
            key: "coordinate_validity".to_string(),
            reason: format!("Invalid coordinate validity: {}. Use strict or lenient", s),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.port.value, 3001);
        assert_eq!(config.port.source, ConfigSource::Default);
        assert_eq!(config.max_upload_bytes.value, 10 * 1024 * 1024);
        assert_eq!(config.area_mode.value, AreaMode::Planar);
        assert_eq!(config.coordinate_validity.value, CoordinateValidity::Strict);
        assert!(config.database_url.value.is_none());
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);

        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
port = 8080
upload_dir = "/var/lib/satnexus/uploads"
area_mode = "Geodesic"
coordinate_validity = "Lenient"
jwt_secret = "from-file"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.port.value, 8080);
        assert_eq!(config.port.source, ConfigSource::File);
        assert_eq!(config.upload_dir.value, PathBuf::from("/var/lib/satnexus/uploads"));
        assert_eq!(config.area_mode.value, AreaMode::Geodesic);
        assert_eq!(config.coordinate_validity.value, CoordinateValidity::Lenient);
        assert!(!config.uses_dev_secret());
        assert_eq!(config.default_page_size.source, ConfigSource::Default);
    }

    #[test]
    fn test_file_with_invalid_values_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_page_size = 0").unwrap();
        assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        config.update_from_cli(CliConfigOverrides {
            port: Some(9000),
            area_mode: Some(AreaMode::Geodesic),
            ..Default::default()
        });

        assert_eq!(config.port.value, 9000);
        assert_eq!(config.port.source, ConfigSource::Cli);
        assert_eq!(config.area_mode.value, AreaMode::Geodesic);
        assert_eq!(config.coordinate_validity.source, ConfigSource::Default);
    }

    #[test]
    fn test_parsers() {
        assert_eq!(parse_area_mode("PLANAR").unwrap(), AreaMode::Planar);
        assert_eq!(parse_area_mode("geodesic").unwrap(), AreaMode::Geodesic);
        assert!(parse_area_mode("spherical").is_err());
        assert_eq!(parse_coordinate_validity("Lenient").unwrap(), CoordinateValidity::Lenient);
        assert!(parse_coordinate_validity("loose").is_err());
    }

    #[test]
    fn test_inspection_map_masks_secret() {
        let map = LayeredConfig::with_defaults().to_inspection_map();
        assert_eq!(map["jwt_secret"].0, "<redacted>");
        assert_eq!(map["port"].0, "3001");
        assert_eq!(map["database_url"].0, "<memory>");
    }

    #[test]
    fn test_upload_policy_uses_configured_limit() {
        let mut config = LayeredConfig::with_defaults();
        config.max_upload_bytes.update(1024, ConfigSource::Cli);
        let policy = config.upload_policy();
        assert_eq!(policy.max_bytes, 1024);
        assert!(policy.allowed_extensions.contains(&"tiff".to_string()));
    }
}
