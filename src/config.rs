// src/config.rs
//
// Application settings, loaded from a TOML file.
// Every key has a default so an empty file is a valid configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Database file. `None` resolves to the per-user data directory.
    pub path: Option<PathBuf>,
    /// Pool checkout timeout and SQLite busy timeout
    pub timeout_seconds: u64,
    /// Create the database file when it does not exist yet
    pub auto_create: bool,
    pub pool_size: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: None,
            timeout_seconds: 10,
            auto_create: true,
            pool_size: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingSettings {
    pub fn level_filter(&self) -> AppResult<log::LevelFilter> {
        self.level
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid log level '{}'", self.level)))
    }
}

impl Settings {
    /// Load settings from a TOML file. A missing or malformed file is fatal.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read settings file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let parsed: Self = toml::from_str(contents)?;
        parsed.logging.level_filter()?;
        Ok(parsed)
    }
}
