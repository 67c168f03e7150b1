//! Log output setup

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `sestra_service=debug`
    ///
    /// `RUST_LOG` takes precedence when set.
    pub level: String,

    /// Colourise output
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: false,
        }
    }
}

impl LoggingConfig {
    fn filter(&self) -> Result<EnvFilter, ConfigError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.level)
                .map_err(|e| ConfigError::Invalid(format!("logging: {}", e))),
        }
    }
}

/// Install a stderr subscriber
///
/// Calling this again once a subscriber is installed is a no-op.
pub fn init(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = config.filter()?;

    let installed = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LoggingConfig::default();
        assert!(init(&config).is_ok());
        assert!(init(&config).is_ok());
    }

    #[test]
    fn test_default_level() {
        assert_eq!(LoggingConfig::default().level, "info");
    }
}
