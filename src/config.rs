//! Application configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::profile_service::{PROFILES_NAMESPACE, is_reserved_key};

/// Settings for the command-line front end and its store.
///
/// Every field has a default, so an empty TOML file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct AppConfig {
    /// SQLite database file.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Key holding the counters blob; match records live under `"<key>:games"`.
    #[serde(default = "default_stats_key")]
    stats_key: String,

    /// Opponent label used when none is given.
    #[serde(default = "default_opponent")]
    default_opponent: String,

    /// Number of rows shown by the history command.
    #[serde(default = "default_history_limit")]
    history_limit: usize,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

fn default_db_path() -> String {
    "gamerzo.db".to_string()
}

fn default_stats_key() -> String {
    "gameStats".to_string()
}

fn default_opponent() -> String {
    "CPU".to_string()
}

fn default_history_limit() -> usize {
    20
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            stats_key: default_stats_key(),
            default_opponent: default_opponent(),
            history_limit: default_history_limit(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid TOML for this shape.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the settings can be used together.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `stats_key` is blank or would share keys
    /// with the account list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stats_key.trim().is_empty() {
            return Err(ConfigError::new("stats_key must not be empty"));
        }
        if is_reserved_key(&self.stats_key) {
            return Err(ConfigError::new(format!(
                "stats_key '{}' is inside the reserved '{}' namespace",
                self.stats_key, PROFILES_NAMESPACE
            )));
        }
        Ok(())
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(db_path = %config.db_path, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
