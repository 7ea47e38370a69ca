//! Configuration management for survey-intake.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "survey-intake";

/// Default record log file name.
const LOG_FILE_NAME: &str = "survey.ndjson";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "SURVEY_INTAKE_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SURVEY_INTAKE_`, sections
///    separated by `__`, e.g. `SURVEY_INTAKE_SERVER__BIND_ADDRESS`)
/// 2. TOML config file at `~/.config/survey-intake/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Record log configuration.
    pub storage: StorageConfig,
}

/// HTTP server configuration.
///
/// Handed to [`crate::server::router`] at startup; nothing reads it from
/// global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_address: String,
    /// Value of `Access-Control-Allow-Origin` on `/v1` routes.
    pub cors_allowed_origin: String,
    /// Largest request body accepted, in bytes.
    pub max_body_bytes: usize,
}

/// Record log configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the record log.
    /// Defaults to `~/.local/share/survey-intake/survey.ndjson`
    pub log_path: Option<PathBuf>,
    /// `fsync` the log after every append.
    pub sync_on_append: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            cors_allowed_origin: "*".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            log_path: None, // Will be resolved to default at runtime
            sync_on_append: true,
        }
    }
}

impl Config {
    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        self.bind_address()?;

        if self.server.max_body_bytes == 0 {
            return Err(Error::config_validation(
                "max_body_bytes must be greater than 0",
            ));
        }

        if self.server.cors_allowed_origin.is_empty()
            || axum::http::HeaderValue::from_str(&self.server.cors_allowed_origin).is_err()
        {
            return Err(Error::config_validation(format!(
                "invalid cors_allowed_origin: {:?}",
                self.server.cors_allowed_origin
            )));
        }

        Ok(())
    }

    /// Get the bind address as a socket address.
    ///
    /// # Errors
    ///
    /// Returns an error if `bind_address` is not a valid socket address.
    pub fn bind_address(&self) -> Result<SocketAddr> {
        self.server.bind_address.parse().map_err(|_| {
            Error::config_validation(format!(
                "invalid bind_address: {:?}",
                self.server.bind_address
            ))
        })
    }

    /// Get the record log path, resolving defaults if not set.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.storage
            .log_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(LOG_FILE_NAME))
    }
}
