//! daogen - runtime support for generated data-access code
//!
//! The generator in `daogen-schema` emits model, view, param, dao, service and
//! controller modules per table. Those modules lean on this crate for:
//! - the dynamic [`SqlValue`] that statement parameters and result cells use
//! - tag-driven row materialization into `#[derive(Record)]` structs
//! - an async [`Executor`] over a MySQL pool with optional statement logging

// Enforce error handling best practices
#![cfg_attr(
    not(test),
    warn(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
    )
)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used,))]

// Lets the derive's `::daogen::` paths resolve inside this crate too
extern crate self as daogen;

pub mod config;
pub mod cursor;
pub mod error;
pub mod executor;
pub mod logging;
pub mod materialize;
pub mod record;
pub mod statement;
pub mod types;

pub use config::DatabaseConfig;
pub use cursor::{Cursor, MemoryCursor};
pub use error::{Error, Result};
pub use executor::Executor;
pub use logging::{SqlLogConfig, SqlLogger, SQL_LOG_TARGET};
pub use materialize::{
    materialize, materialize_into, materialize_one, materialize_scalar, materialize_scalars,
};
pub use record::{Binding, BindingMap, FieldDescriptor, FieldKind, Record};
pub use statement::{placeholders, Statement, StatementBuilder};
pub use types::{ConversionError, FromSqlValue, MySqlCursor, SqlValue};

pub use daogen_macros::Record;

// Re-exported for generated code
pub use chrono;
pub use rust_decimal;
pub use serde;
pub use serde_json;

/// Prelude for generated modules
pub mod prelude {
    pub use crate::{
        placeholders, Error, Executor, FromSqlValue, Record, Result, SqlValue, Statement,
    };
    pub use serde::{Deserialize, Serialize};
}
