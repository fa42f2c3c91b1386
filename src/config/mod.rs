//! Application configuration module
//!
//! This module provides type-safe configuration loading using the `config`
//! and `dotenvy` crates. Values come from an optional `item-service` config
//! file, then environment variables with the `ITEM_SERVICE` prefix; nested
//! values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use item_service::config::{init_tracing, AppConfig};
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! init_tracing(&config.logging);
//! ```

mod directory;
mod error;
mod items;
mod logging;

pub use directory::{DirectoryConfig, DirectoryUserConfig};
pub use error::{ConfigError, ValidationError};
pub use items::ItemsConfig;
pub use logging::{init_tracing, LoggingConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Log level and output format
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Item endpoint limits
    #[serde(default)]
    pub items: ItemsConfig,

    /// Seed for the configuration-backed directory
    #[serde(default)]
    pub directory: DirectoryConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads `item-service.{toml,json,yaml}` if present
    /// 3. Reads environment variables with `ITEM_SERVICE` prefix
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ITEM_SERVICE__LOGGING__LEVEL=debug` -> `logging.level = debug`
    /// - `ITEM_SERVICE__ITEMS__MAX_LIST_LIMIT=50` -> `items.max_list_limit = 50`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("item-service").required(false))
            .add_source(
                config::Environment::default()
                    .prefix("ITEM_SERVICE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Parse configuration from a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.logging.validate()?;
        self.items.validate()?;
        self.directory.validate()?;
        Ok(())
    }
}
