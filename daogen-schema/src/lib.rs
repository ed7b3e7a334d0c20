//! daogen schema - database schema introspection and code generation
//!
//! Reads live catalog metadata for a table, maps every column to a Rust
//! field, and renders a layered data-access module set per table:
//! model, extend, view, param, dao, service and controller.
//!
//! # Example
//!
//! ```rust,ignore
//! use daogen_schema::{Generator, GeneratorConfig, MySqlSchemaSource};
//!
//! # async fn example() -> daogen_schema::Result<()> {
//! let config = GeneratorConfig::from_file("daogen.toml")?;
//! let source = MySqlSchemaSource::connect_lazy(&config.dsn)?;
//! let report = Generator::new(config)?.generate(&source).await?;
//! for table in &report.tables {
//!     println!("{}", table.table);
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub mod caser;
pub mod codegen;
pub mod config;
pub mod descriptor;
pub mod field;
pub mod generator;
pub mod introspect;
pub mod type_map;

pub use config::GeneratorConfig;
pub use descriptor::{Layer, LayerTarget, ModuleDescriptor, ModuleRequest, PackageLayout};
pub use field::Field;
pub use codegen::FileState;
pub use generator::{
    GenerationReport, Generator, LayerOutcome, LayerReport, StatusEntry, TableOutcome, TableReport,
};
pub use introspect::{Introspector, MySqlSchemaSource, RawColumn, SchemaSource, TableSchema};
pub use type_map::TypeMapping;

/// Why a table lookup came back empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// No such table in the active schema
    Missing,
    /// The table is visible but the catalog returned no columns for it
    NoColumns,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::Missing => write!(f, "table does not exist in the active schema"),
            NotFoundReason::NoColumns => write!(f, "catalog returned no columns"),
        }
    }
}

/// Schema system errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Schema query failed: {0}")]
    SchemaQueryFailed(String),

    #[error("Table not found: {table} ({reason})")]
    TableNotFound {
        table: String,
        reason: NotFoundReason,
    },

    #[error("Table {0} has no primary key")]
    NoPrimaryKey(String),

    #[error("Unsupported column type '{column_type}' for {table}.{column}")]
    UnsupportedColumnType {
        table: String,
        column: String,
        column_type: String,
    },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid module path: {0}")]
    InvalidModulePath(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Generated code does not parse: {0}")]
    InvalidOutput(String),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SchemaError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn schema_query(msg: impl Into<String>) -> Self {
        Self::SchemaQueryFailed(msg.into())
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Fatal errors abort a whole run; everything else skips one table or layer
    pub fn is_fatal(&self) -> bool {
        matches!(self, SchemaError::Configuration(_))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SchemaError::Configuration(_) => "E_CONFIGURATION",
            SchemaError::SchemaQueryFailed(_) => "E_SCHEMA_QUERY",
            SchemaError::TableNotFound { .. } => "E_TABLE_NOT_FOUND",
            SchemaError::NoPrimaryKey(_) => "E_NO_PRIMARY_KEY",
            SchemaError::UnsupportedColumnType { .. } => "E_UNSUPPORTED_COLUMN_TYPE",
            SchemaError::InvalidIdentifier(_) => "E_INVALID_IDENTIFIER",
            SchemaError::InvalidModulePath(_) => "E_INVALID_MODULE_PATH",
            SchemaError::Template(_) => "E_TEMPLATE",
            SchemaError::InvalidOutput(_) => "E_INVALID_OUTPUT",
            SchemaError::Write { .. } => "E_WRITE",
        }
    }
}

impl From<handlebars::RenderError> for SchemaError {
    fn from(err: handlebars::RenderError) -> Self {
        SchemaError::Template(err.to_string())
    }
}

impl From<handlebars::TemplateError> for SchemaError {
    fn from(err: handlebars::TemplateError) -> Self {
        SchemaError::Template(err.to_string())
    }
}

impl From<sqlx::Error> for SchemaError {
    fn from(err: sqlx::Error) -> Self {
        SchemaError::SchemaQueryFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_configuration_is_fatal() {
        assert!(SchemaError::configuration("dsn is required").is_fatal());
        assert!(!SchemaError::NoPrimaryKey("t".into()).is_fatal());
        assert!(!SchemaError::TableNotFound {
            table: "t".into(),
            reason: NotFoundReason::Missing
        }
        .is_fatal());
    }

    #[test]
    fn test_not_found_reasons_render_differently() {
        let missing = SchemaError::TableNotFound {
            table: "t".into(),
            reason: NotFoundReason::Missing,
        };
        let empty = SchemaError::TableNotFound {
            table: "t".into(),
            reason: NotFoundReason::NoColumns,
        };
        assert_ne!(missing.to_string(), empty.to_string());
        assert_eq!(missing.error_code(), empty.error_code());
    }
}
