//! SQL statement logging sink
//!
//! Statement logging is switched on by configuration and carried by the
//! executor that runs the statements. Records go to the `daogen::sql` log
//! target at the configured level.

use crate::types::SqlValue;
use serde::{Deserialize, Serialize};

pub const SQL_LOG_TARGET: &str = "daogen::sql";

/// Statement logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlLogConfig {
    #[serde(default)]
    pub enabled: bool,

    /// One of error, warn, info, debug, trace
    #[serde(default = "default_sql_log_level")]
    pub level: String,
}

fn default_sql_log_level() -> String {
    "info".to_string()
}

impl Default for SqlLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: default_sql_log_level(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlLogger {
    level: Option<log::Level>,
}

impl SqlLogger {
    pub fn disabled() -> Self {
        Self { level: None }
    }

    pub fn at(level: log::Level) -> Self {
        Self { level: Some(level) }
    }

    pub fn from_config(config: &SqlLogConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        match config.level.parse::<log::Level>() {
            Ok(level) => Self::at(level),
            Err(_) => {
                log::warn!(
                    "Unknown SQL log level '{}', falling back to info",
                    config.level
                );
                Self::at(log::Level::Info)
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.level.is_some()
    }

    pub fn statement(&self, sql: &str, params: &[SqlValue]) {
        if let Some(level) = self.level {
            log::log!(target: SQL_LOG_TARGET, level, "sql is {}", sql);
            log::log!(target: SQL_LOG_TARGET, level, "params is [{}]", render_params(params));
        }
    }
}

impl Default for SqlLogger {
    fn default() -> Self {
        Self::disabled()
    }
}

fn render_params(params: &[SqlValue]) -> String {
    params
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
