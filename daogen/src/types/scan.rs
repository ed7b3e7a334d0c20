//! Conversion from scanned column values into record field types

use super::value::SqlValue;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// A column value that does not fit the destination field type
#[derive(Error, Debug, Clone, PartialEq)]
#[error("cannot convert {found} into {expected}{}", detail_suffix(.detail))]
pub struct ConversionError {
    pub expected: &'static str,
    pub found: &'static str,
    pub detail: Option<String>,
}

impl ConversionError {
    pub fn new(expected: &'static str, value: &SqlValue) -> Self {
        Self {
            expected,
            found: value.kind(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {}", d)).unwrap_or_default()
}

/// Types a column value can be scanned into
///
/// NULL only converts into `Option<T>`; scanning NULL into a plain field
/// is an error rather than a silent zero.
pub trait FromSqlValue: Sized {
    fn from_sql_value(value: &SqlValue) -> Result<Self, ConversionError>;
}

impl<T: FromSqlValue> FromSqlValue for Option<T> {
    fn from_sql_value(value: &SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Null => Ok(None),
            other => T::from_sql_value(other).map(Some),
        }
    }
}

macro_rules! impl_integer_scan {
    ($($ty:ty),*) => {
        $(
            impl FromSqlValue for $ty {
                fn from_sql_value(value: &SqlValue) -> Result<Self, ConversionError> {
                    match value {
                        SqlValue::Bool(b) => Ok((*b as u8) as $ty),
                        SqlValue::String(s) => s.trim().parse::<$ty>().map_err(|e| {
                            ConversionError::new(stringify!($ty), value).with_detail(e.to_string())
                        }),
                        other => match other.as_integer() {
                            Some(i) => <$ty>::try_from(i).map_err(|_| {
                                ConversionError::new(stringify!($ty), value)
                                    .with_detail(format!("{} out of range", i))
                            }),
                            None => Err(ConversionError::new(stringify!($ty), value)),
                        },
                    }
                }
            }
        )*
    };
}

impl_integer_scan!(i8, i16, i32, i64, u8, u16, u32, u64);

impl FromSqlValue for bool {
    fn from_sql_value(value: &SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Bool(b) => Ok(*b),
            SqlValue::String(s) => match s.to_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(ConversionError::new("bool", value).with_detail(s.clone())),
            },
            other => other
                .as_integer()
                .map(|i| i != 0)
                .ok_or_else(|| ConversionError::new("bool", value)),
        }
    }
}

impl FromSqlValue for f64 {
    fn from_sql_value(value: &SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Float(f) => Ok(*f as f64),
            SqlValue::Double(f) => Ok(*f),
            SqlValue::Decimal(d) => d
                .to_string()
                .parse()
                .map_err(|_| ConversionError::new("f64", value)),
            SqlValue::String(s) => s
                .trim()
                .parse()
                .map_err(|_| ConversionError::new("f64", value).with_detail(s.clone())),
            other => other
                .as_integer()
                .map(|i| i as f64)
                .ok_or_else(|| ConversionError::new("f64", value)),
        }
    }
}

impl FromSqlValue for f32 {
    fn from_sql_value(value: &SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Float(f) => Ok(*f),
            other => f64::from_sql_value(other)
                .map(|f| f as f32)
                .map_err(|e| ConversionError { expected: "f32", ..e }),
        }
    }
}

impl FromSqlValue for Decimal {
    fn from_sql_value(value: &SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Decimal(d) => Ok(*d),
            SqlValue::String(s) => s
                .trim()
                .parse()
                .map_err(|_| ConversionError::new("Decimal", value).with_detail(s.clone())),
            SqlValue::Float(f) => {
                Decimal::from_f64_retain(*f as f64).ok_or_else(|| ConversionError::new("Decimal", value))
            }
            SqlValue::Double(f) => {
                Decimal::from_f64_retain(*f).ok_or_else(|| ConversionError::new("Decimal", value))
            }
            other => match other.as_integer() {
                Some(i) => i64::try_from(i)
                    .map(Decimal::from)
                    .or_else(|_| u64::try_from(i).map(Decimal::from))
                    .map_err(|_| ConversionError::new("Decimal", value)),
                None => Err(ConversionError::new("Decimal", value)),
            },
        }
    }
}

impl FromSqlValue for String {
    fn from_sql_value(value: &SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::String(s) => Ok(s.clone()),
            SqlValue::Bytes(bytes) => String::from_utf8(bytes.clone()).map_err(|e| {
                ConversionError::new("String", value).with_detail(e.to_string())
            }),
            SqlValue::Null => Err(ConversionError::new("String", value)),
            other => Ok(other.to_string()),
        }
    }
}

impl FromSqlValue for Vec<u8> {
    fn from_sql_value(value: &SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Bytes(bytes) => Ok(bytes.clone()),
            SqlValue::String(s) => Ok(s.clone().into_bytes()),
            _ => Err(ConversionError::new("Vec<u8>", value)),
        }
    }
}

impl FromSqlValue for JsonValue {
    fn from_sql_value(value: &SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Json(j) => Ok(j.clone()),
            SqlValue::String(s) => serde_json::from_str(s).map_err(|e| {
                ConversionError::new("serde_json::Value", value).with_detail(e.to_string())
            }),
            SqlValue::Null => Err(ConversionError::new("serde_json::Value", value)),
            other => Ok(other.to_json()),
        }
    }
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

impl FromSqlValue for NaiveDateTime {
    fn from_sql_value(value: &SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::DateTime(dt) => Ok(*dt),
            SqlValue::Date(d) => Ok(d.and_time(NaiveTime::MIN)),
            SqlValue::String(s) => DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .ok_or_else(|| ConversionError::new("NaiveDateTime", value).with_detail(s.clone())),
            _ => Err(ConversionError::new("NaiveDateTime", value)),
        }
    }
}

impl FromSqlValue for NaiveDate {
    fn from_sql_value(value: &SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Date(d) => Ok(*d),
            SqlValue::DateTime(dt) => Ok(dt.date()),
            SqlValue::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|e| ConversionError::new("NaiveDate", value).with_detail(e.to_string())),
            _ => Err(ConversionError::new("NaiveDate", value)),
        }
    }
}

impl FromSqlValue for NaiveTime {
    fn from_sql_value(value: &SqlValue) -> Result<Self, ConversionError> {
        match value {
            SqlValue::Time(t) => Ok(*t),
            SqlValue::DateTime(dt) => Ok(dt.time()),
            SqlValue::String(s) => NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
                .map_err(|e| ConversionError::new("NaiveTime", value).with_detail(e.to_string())),
            _ => Err(ConversionError::new("NaiveTime", value)),
        }
    }
}

impl FromSqlValue for SqlValue {
    fn from_sql_value(value: &SqlValue) -> Result<Self, ConversionError> {
        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_only_fits_option() {
        assert_eq!(Option::<i32>::from_sql_value(&SqlValue::Null), Ok(None));
        let err = i32::from_sql_value(&SqlValue::Null).unwrap_err();
        assert_eq!(err.expected, "i32");
        assert_eq!(err.found, "NULL");
        assert!(String::from_sql_value(&SqlValue::Null).is_err());
    }

    #[test]
    fn test_integer_widening_and_narrowing() {
        assert_eq!(i64::from_sql_value(&SqlValue::Int(42)), Ok(42));
        assert_eq!(u8::from_sql_value(&SqlValue::BigInt(200)), Ok(200));
        assert!(i8::from_sql_value(&SqlValue::BigInt(200)).is_err());
        assert!(u32::from_sql_value(&SqlValue::Int(-1)).is_err());
        assert_eq!(i32::from_sql_value(&SqlValue::String(" 17 ".into())), Ok(17));
    }

    #[test]
    fn test_bool_from_tinyint() {
        assert_eq!(bool::from_sql_value(&SqlValue::TinyInt(1)), Ok(true));
        assert_eq!(bool::from_sql_value(&SqlValue::TinyInt(0)), Ok(false));
        assert!(bool::from_sql_value(&SqlValue::Double(1.0)).is_err());
    }

    #[test]
    fn test_temporal_from_strings() {
        let dt = NaiveDateTime::from_sql_value(&SqlValue::String("2025-09-03 19:35:50".into()))
            .expect("datetime parses");
        assert_eq!(dt.to_string(), "2025-09-03 19:35:50");

        let date = NaiveDate::from_sql_value(&SqlValue::DateTime(dt)).expect("date from datetime");
        assert_eq!(date.to_string(), "2025-09-03");
    }

    #[test]
    fn test_string_accepts_display_values() {
        assert_eq!(String::from_sql_value(&SqlValue::Int(5)), Ok("5".to_string()));
        assert_eq!(
            String::from_sql_value(&SqlValue::Bytes(b"abc".to_vec())),
            Ok("abc".to_string())
        );
    }

    #[test]
    fn test_decimal_from_integer_and_text() {
        assert_eq!(Decimal::from_sql_value(&SqlValue::Int(3)), Ok(Decimal::from(3)));
        assert_eq!(
            Decimal::from_sql_value(&SqlValue::String("10.50".into())),
            Ok(Decimal::new(1050, 2))
        );
    }
}
