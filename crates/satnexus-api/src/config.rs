use satnexus_core::config::LayeredConfig;
use satnexus_core::error::Result;
use satnexus_core::geo::{AreaMode, CoordinateValidity};
use satnexus_core::ports::UploadPolicy;
use std::path::PathBuf;

/// API server configuration resolved from the layered configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    pub database_url: Option<String>,
    pub upload_dir: PathBuf,
    pub upload_policy: UploadPolicy,
    pub jwt_secret: String,
    pub token_ttl_hours: u32,
    pub area_mode: AreaMode,
    pub coordinate_validity: CoordinateValidity,
    pub default_page_size: u32,
    /// True when no secret was configured and the development secret is used
    pub dev_secret: bool,
}

impl ApiConfig {
    /// Load defaults, the optional config file and the environment
    pub fn load() -> Result<Self> {
        let layered = LayeredConfig::load()?;
        layered.validate()?;
        Ok(Self::from_layered(&layered))
    }

    pub fn from_layered(config: &LayeredConfig) -> Self {
        Self {
            port: config.port.value,
            cors_origin: config.cors_origin.value.clone(),
            database_url: config.database_url.value.clone(),
            upload_dir: config.upload_dir.value.clone(),
            upload_policy: config.upload_policy(),
            jwt_secret: config.jwt_secret.value.clone(),
            token_ttl_hours: config.token_ttl_hours.value,
            area_mode: config.area_mode.value,
            coordinate_validity: config.coordinate_validity.value,
            default_page_size: config.default_page_size.value,
            dev_secret: config.uses_dev_secret(),
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Check if PostgreSQL storage is configured
    pub fn uses_postgres(&self) -> bool {
        self.database_url.is_some()
    }

    /// Request body limit. Leaves room for multipart framing so oversized
    /// files reach the upload policy and get a descriptive error.
    pub fn body_limit(&self) -> usize {
        self.upload_policy.max_bytes.saturating_add(1024 * 1024)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_layered(&LayeredConfig::with_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert!(!config.uses_postgres());
        assert!(config.dev_secret);
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.token_ttl_hours, 24);
        assert!(config.body_limit() > config.upload_policy.max_bytes);
    }
}
