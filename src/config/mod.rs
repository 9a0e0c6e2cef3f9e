// Configuration module

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ServiceError;

pub mod server;
pub mod transform;

pub use server::ServerConfig;
pub use transform::TransformConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON-formatted log lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ServiceError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ServiceError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_yaml::from_str(&contents).map_err(|e| {
            ServiceError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to full defaults when the file
    /// does not exist. The service is usable with zero configuration.
    pub fn load(path: &Path) -> Result<Self, ServiceError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Validate field values with descriptive errors
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.server.address.is_empty() {
            return Err(ServiceError::Config(
                "server.address must not be empty".to_string(),
            ));
        }
        if self.server.max_body_size == 0 {
            return Err(ServiceError::Config(
                "server.max_body_size must be greater than 0".to_string(),
            ));
        }
        if self.transform.max_source_pixels == 0 {
            return Err(ServiceError::Config(
                "transform.max_source_pixels must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
