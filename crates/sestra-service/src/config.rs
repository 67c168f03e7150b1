//! Configuration file parsing for the service.
//!
//! Loads the `[store]` and `[logging]` tables from a TOML file.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use sestra_store::StoreConfig;
use std::path::Path;
use thiserror::Error;

/// Service configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A setting has an unusable value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Service configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SestraConfig {
    /// Where annotations are stored
    pub store: StoreConfig,

    /// Log output
    pub logging: LoggingConfig,
}

impl SestraConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: SestraConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("store: {}", e)))?;
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid("logging: level must not be empty".to_string()));
        }
        Ok(())
    }

    /// Create a default configuration for testing
    pub fn for_testing() -> Self {
        Self {
            store: StoreConfig::in_memory(),
            logging: LoggingConfig::default(),
        }
    }
}
