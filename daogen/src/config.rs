//! Runtime database configuration
//!
//! Loaded from a TOML file, then overridden by environment variables:
//!
//! - `DAOGEN_DATABASE_URL`: connection URL
//! - `DAOGEN_SQL_LOG`: `off`, or a log level to enable statement logging at

use crate::error::{Error, Result};
use crate::logging::SqlLogConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL (required)
    #[serde(default)]
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    #[serde(default)]
    pub sql_log: SqlLogConfig,
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            connect_timeout: default_connect_timeout(),
            sql_log: SqlLogConfig::default(),
        }
    }
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_sql_log(mut self, sql_log: SqlLogConfig) -> Self {
        self.sql_log = sql_log;
        self
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let content = fs::read_to_string(path_ref).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path_ref.display(),
                e
            ))
        })?;

        let mut config: DatabaseConfig = toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}. Check TOML syntax.",
                path_ref.display(),
                e
            ))
        })?;

        config.apply_env_overrides();
        config.validate()?;

        log::debug!(
            "Successfully loaded database configuration from: {}",
            path_ref.display()
        );
        Ok(config)
    }

    /// Create configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        let mut config = DatabaseConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(Error::config("Database URL is required"));
        }
        if self.max_connections == 0 {
            return Err(Error::config("max_connections must be at least 1"));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("DAOGEN_DATABASE_URL") {
            self.url = url;
        }

        if let Ok(level) = env::var("DAOGEN_SQL_LOG") {
            if level.eq_ignore_ascii_case("off") {
                self.sql_log.enabled = false;
            } else {
                self.sql_log.enabled = true;
                self.sql_log.level = level;
            }
        }
    }
}
