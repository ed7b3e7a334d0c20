//! MySQL row conversion and parameter binding

use super::value::SqlValue;
use crate::cursor::Cursor;
use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, Row, TypeInfo, ValueRef};

/// MySQL type converter
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlTypeConverter;

impl MySqlTypeConverter {
    /// Extract a TINYINT value (TINYINT(1) may be decoded as bool by the driver)
    fn extract_tinyint(row: &MySqlRow, index: usize) -> Result<SqlValue> {
        if let Ok(val) = row.try_get::<i8, _>(index) {
            return Ok(SqlValue::TinyInt(val));
        }
        if let Ok(val) = row.try_get::<bool, _>(index) {
            log::trace!("TINYINT at index {} extracted as bool: {}", index, val);
            return Ok(SqlValue::TinyInt(val as i8));
        }
        Err(Error::scan(
            "",
            format!("failed to extract TINYINT at index {}", index),
        ))
    }

    fn extract_datetime(row: &MySqlRow, index: usize) -> Result<SqlValue> {
        if let Ok(dt) = row.try_get::<NaiveDateTime, _>(index) {
            return Ok(SqlValue::DateTime(dt));
        }
        if let Ok(dt) = row.try_get::<chrono::DateTime<chrono::Utc>, _>(index) {
            return Ok(SqlValue::DateTime(dt.naive_utc()));
        }
        // MySQL may hand back the textual form
        if let Ok(s) = row.try_get::<String, _>(index) {
            for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(dt) = NaiveDateTime::parse_from_str(&s, fmt) {
                    return Ok(SqlValue::DateTime(dt));
                }
            }
            return Ok(SqlValue::String(s));
        }
        Err(Error::scan(
            "",
            format!("failed to extract datetime at index {}", index),
        ))
    }

    fn extract_decimal(row: &MySqlRow, index: usize) -> Result<SqlValue> {
        if let Ok(d) = row.try_get::<Decimal, _>(index) {
            return Ok(SqlValue::Decimal(d));
        }
        // DECIMAL is usually returned as string to preserve precision
        if let Ok(s) = row.try_get::<String, _>(index) {
            if let Ok(d) = s.parse::<Decimal>() {
                return Ok(SqlValue::Decimal(d));
            }
            return Ok(SqlValue::String(s));
        }
        Err(Error::scan(
            "",
            format!("failed to extract decimal at index {}", index),
        ))
    }

    fn extract_unsigned(row: &MySqlRow, index: usize, type_name: &str) -> Result<Option<SqlValue>> {
        let value = if type_name.contains("TINYINT") {
            row.try_get::<u8, _>(index).map(SqlValue::UnsignedTinyInt)
        } else if type_name.contains("SMALLINT") {
            row.try_get::<u16, _>(index).map(SqlValue::UnsignedSmallInt)
        } else if type_name.contains("BIGINT") {
            row.try_get::<u64, _>(index).map(SqlValue::UnsignedBigInt)
        } else if type_name.contains("INT") {
            row.try_get::<u32, _>(index).map(SqlValue::UnsignedInt)
        } else {
            return Ok(None);
        };
        value
            .map(Some)
            .map_err(|e| Error::scan("", format!("failed to extract {}: {}", type_name, e)))
    }

    /// Convert one column of a MySQL row by its reported type name
    pub fn extract_column_value(row: &MySqlRow, index: usize) -> Result<SqlValue> {
        let column = row.columns().get(index).ok_or_else(|| {
            Error::database_query(format!("Column index {} out of bounds", index))
        })?;

        let raw = row.try_get_raw(index).map_err(|e| {
            Error::database_query(format!("Failed to get raw value at column {}: {}", index, e))
        })?;
        if raw.is_null() {
            return Ok(SqlValue::Null);
        }

        let type_info = column.type_info();
        let type_name = type_info.name();

        fn get<'r, T>(row: &'r MySqlRow, index: usize, what: &str) -> Result<T>
        where
            T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
        {
            row.try_get::<T, _>(index)
                .map_err(|e| Error::scan("", format!("failed to extract {}: {}", what, e)))
        }

        match type_name {
            "BOOLEAN" | "BOOL" | "TINYINT" => Self::extract_tinyint(row, index),
            "SMALLINT" => get(row, index, "smallint").map(SqlValue::SmallInt),
            "MEDIUMINT" | "INT" | "INTEGER" => get(row, index, "int").map(SqlValue::Int),
            "BIGINT" => get(row, index, "bigint").map(SqlValue::BigInt),
            "FLOAT" => get(row, index, "float").map(SqlValue::Float),
            "DOUBLE" | "REAL" => get(row, index, "double").map(SqlValue::Double),
            "DECIMAL" | "NUMERIC" => Self::extract_decimal(row, index),
            "VARCHAR" | "CHAR" | "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM"
            | "SET" => get(row, index, "string").map(SqlValue::String),
            "JSON" => get::<JsonValue>(row, index, "json").map(SqlValue::Json),
            "DATE" => get::<NaiveDate>(row, index, "date").map(SqlValue::Date),
            "TIME" => get::<NaiveTime>(row, index, "time").map(SqlValue::Time),
            "DATETIME" | "TIMESTAMP" => Self::extract_datetime(row, index),
            "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
                get::<Vec<u8>>(row, index, "binary").map(SqlValue::Bytes)
            }
            "YEAR" => get(row, index, "year").map(SqlValue::SmallInt),
            "BIT" => {
                if let Ok(val) = row.try_get::<u64, _>(index) {
                    return Ok(SqlValue::UnsignedBigInt(val));
                }
                let bytes: Vec<u8> = get(row, index, "bit")?;
                // Big-endian bit string
                let val = bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);
                Ok(SqlValue::UnsignedBigInt(val))
            }
            _ => {
                if type_name.contains("UNSIGNED") {
                    if let Some(value) = Self::extract_unsigned(row, index, type_name)? {
                        return Ok(value);
                    }
                }

                // Try to extract as string for unknown types
                match row.try_get::<String, _>(index) {
                    Ok(s) => Ok(SqlValue::String(s)),
                    Err(_) => {
                        log::warn!(
                            "Unknown MySQL type '{}' for column '{}'",
                            type_name,
                            column.name()
                        );
                        Err(Error::scan(
                            "",
                            format!("unsupported MySQL type '{}'", type_name),
                        ))
                    }
                }
            }
        }
    }

    /// Bind a SqlValue to a MySQL query
    pub fn bind_param<'q>(
        query: Query<'q, MySql, MySqlArguments>,
        value: SqlValue,
    ) -> Query<'q, MySql, MySqlArguments> {
        match value {
            SqlValue::Null => query.bind(None::<Vec<u8>>), // MySQL accepts NULL for any type
            SqlValue::Bool(b) => query.bind(b),

            SqlValue::TinyInt(i) => query.bind(i),
            SqlValue::SmallInt(i) => query.bind(i),
            SqlValue::Int(i) => query.bind(i),
            SqlValue::BigInt(i) => query.bind(i),

            SqlValue::UnsignedTinyInt(i) => query.bind(i),
            SqlValue::UnsignedSmallInt(i) => query.bind(i),
            SqlValue::UnsignedInt(i) => query.bind(i),
            SqlValue::UnsignedBigInt(i) => query.bind(i),

            SqlValue::Float(f) => query.bind(f),
            SqlValue::Double(f) => query.bind(f),
            SqlValue::Decimal(d) => query.bind(d),

            SqlValue::String(s) => query.bind(s),
            SqlValue::Bytes(b) => query.bind(b),
            SqlValue::Json(j) => query.bind(j),

            SqlValue::Date(d) => query.bind(d),
            SqlValue::Time(t) => query.bind(t),
            SqlValue::DateTime(dt) => query.bind(dt),
        }
    }
}

/// Cursor over rows fetched from MySQL
pub struct MySqlCursor {
    columns: Vec<String>,
    rows: std::vec::IntoIter<MySqlRow>,
    current: Option<MySqlRow>,
}

impl MySqlCursor {
    pub fn new(rows: Vec<MySqlRow>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        Self {
            columns,
            rows: rows.into_iter(),
            current: None,
        }
    }
}

impl Cursor for MySqlCursor {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn advance(&mut self) -> Result<bool> {
        self.current = self.rows.next();
        Ok(self.current.is_some())
    }

    fn value(&mut self, index: usize) -> Result<SqlValue> {
        let row = self
            .current
            .as_ref()
            .ok_or_else(|| Error::database_query("cursor is not positioned on a row"))?;
        MySqlTypeConverter::extract_column_value(row, index)
    }

    fn discard(&mut self, _index: usize) -> Result<()> {
        // Fetched rows are fully decoded by the driver already
        Ok(())
    }
}
