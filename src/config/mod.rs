//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `COLLOQUY` prefix and nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use colloquy::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod endpoint;
mod error;

pub use endpoint::EndpointConfig;
pub use error::{ConfigError, ValidationError};

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Chat and submission endpoint configuration.
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Whether sessions run in preview mode (answers flagged, session
    /// resettable on re-entry).
    #[serde(default)]
    pub preview: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file if present, then reads variables with the
    /// `COLLOQUY` prefix; nested values use `__` as separator, e.g.
    /// `COLLOQUY__ENDPOINT__BASE_URL=https://forms.example.com`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COLLOQUY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.endpoint.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.preview);
    }
}
