//! Value model, scanning conversions and the MySQL converter

pub mod mysql_converter;
pub mod scan;
pub mod value;

pub use mysql_converter::{MySqlCursor, MySqlTypeConverter};
pub use scan::{ConversionError, FromSqlValue};
pub use value::SqlValue;
