//! Core configuration.
//!
//! # Responsibility
//! - Describe storage and logging settings for embedding hosts.
//! - Parse host-provided JSON configuration with defaults for missing fields.
//!
//! # Invariants
//! - `storage_key` is never blank after validation.

use crate::logging::{default_log_level, init_logging};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Blob key holding the note collection.
pub const DEFAULT_STORAGE_KEY: &str = "notes";

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    BlankStorageKey,
    Logging(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid configuration: {err}"),
            Self::BlankStorageKey => write!(f, "storage_key cannot be blank"),
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::BlankStorageKey | Self::Logging(_) => None,
        }
    }
}

/// Settings of one `NoteStore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn with_storage_key(storage_key: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::BlankStorageKey);
        }
        Ok(())
    }
}

/// File logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level_string")]
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: String,
}

fn default_level_string() -> String {
    default_log_level().to_string()
}

/// Top-level configuration handed over by the embedding host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub store: StoreConfig,
    pub logging: Option<LoggingConfig>,
}

impl CoreConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str::<Self>(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()
    }

    /// Starts file logging when configured.
    ///
    /// Returns `Ok(false)` when no logging section is present.
    pub fn init_logging(&self) -> Result<bool, ConfigError> {
        let Some(logging) = self.logging.as_ref() else {
            return Ok(false);
        };
        init_logging(&logging.level, &logging.log_dir).map_err(ConfigError::Logging)?;
        Ok(true)
    }
}
