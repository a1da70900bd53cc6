//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate. Each
//! sub-module represents a logical configuration section.

pub mod app;
pub mod auth;
pub mod data_source;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{Schema, SecurityConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::data_source::{DataSourceConfig, DataSourceType, RedisConfig};
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Published server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Token signing settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Identity store backend settings.
    #[serde(default)]
    pub data_source: DataSourceConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and the environment.
    ///
    /// Merges `config/default`, an environment-specific overlay
    /// `config/{env}` and environment variables prefixed with `FERRUM__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FERRUM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let loaded: Self = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject configurations that cannot start a server.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.server.schema == Schema::Https && self.server.security.is_none() {
            return Err(AppError::configuration(
                "https schema requires a certificate pair (server.security)",
            ));
        }

        if self.data_source.kind == DataSourceType::File
            && self.data_source.source.as_deref().is_none_or(str::is_empty)
        {
            return Err(AppError::configuration(
                "data_source.source must point at a data file for the file backend",
            ));
        }

        if self.data_source.namespace.is_empty() {
            return Err(AppError::configuration("data_source.namespace is empty"));
        }

        Ok(())
    }
}
