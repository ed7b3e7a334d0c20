//! Runtime value model for parameters and scanned columns
//!
//! Every column read from a cursor and every parameter bound to a statement
//! passes through [`SqlValue`]. The variants line up with the accessor names
//! used by the generator's type mapping table, so generated code can build
//! parameters with `SqlValue::Int(..)`, `SqlValue::DateTime(..)` and so on.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Generic SQL value type for parameter binding and result extraction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    Null,

    Bool(bool),

    // Integer variants (for precise type mapping)
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),

    // Unsigned integers (important for MySQL)
    UnsignedTinyInt(u8),
    UnsignedSmallInt(u16),
    UnsignedInt(u32),
    UnsignedBigInt(u64),

    // Floating point
    Float(f32),
    Double(f64),
    Decimal(Decimal),

    String(String),
    Bytes(Vec<u8>),
    Json(JsonValue),

    // Temporal
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl SqlValue {
    /// Check if this value is NULL
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Name of the variant, used in conversion diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "NULL",
            SqlValue::Bool(_) => "Bool",
            SqlValue::TinyInt(_) => "TinyInt",
            SqlValue::SmallInt(_) => "SmallInt",
            SqlValue::Int(_) => "Int",
            SqlValue::BigInt(_) => "BigInt",
            SqlValue::UnsignedTinyInt(_) => "UnsignedTinyInt",
            SqlValue::UnsignedSmallInt(_) => "UnsignedSmallInt",
            SqlValue::UnsignedInt(_) => "UnsignedInt",
            SqlValue::UnsignedBigInt(_) => "UnsignedBigInt",
            SqlValue::Float(_) => "Float",
            SqlValue::Double(_) => "Double",
            SqlValue::Decimal(_) => "Decimal",
            SqlValue::String(_) => "String",
            SqlValue::Bytes(_) => "Bytes",
            SqlValue::Json(_) => "Json",
            SqlValue::Date(_) => "Date",
            SqlValue::Time(_) => "Time",
            SqlValue::DateTime(_) => "DateTime",
        }
    }

    /// Widen any integer variant to i128 for checked narrowing
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            SqlValue::TinyInt(i) => Some(*i as i128),
            SqlValue::SmallInt(i) => Some(*i as i128),
            SqlValue::Int(i) => Some(*i as i128),
            SqlValue::BigInt(i) => Some(*i as i128),
            SqlValue::UnsignedTinyInt(i) => Some(*i as i128),
            SqlValue::UnsignedSmallInt(i) => Some(*i as i128),
            SqlValue::UnsignedInt(i) => Some(*i as i128),
            SqlValue::UnsignedBigInt(i) => Some(*i as i128),
            _ => None,
        }
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> JsonValue {
        match self {
            SqlValue::Null => JsonValue::Null,
            SqlValue::Bool(b) => JsonValue::Bool(*b),
            SqlValue::TinyInt(i) => JsonValue::Number((*i).into()),
            SqlValue::SmallInt(i) => JsonValue::Number((*i).into()),
            SqlValue::Int(i) => JsonValue::Number((*i).into()),
            SqlValue::BigInt(i) => JsonValue::Number((*i).into()),
            SqlValue::UnsignedTinyInt(i) => JsonValue::Number((*i).into()),
            SqlValue::UnsignedSmallInt(i) => JsonValue::Number((*i).into()),
            SqlValue::UnsignedInt(i) => JsonValue::Number((*i).into()),
            SqlValue::UnsignedBigInt(i) => JsonValue::Number((*i).into()),
            SqlValue::Float(f) => serde_json::Number::from_f64(*f as f64)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            SqlValue::Double(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            SqlValue::Decimal(d) => JsonValue::String(d.to_string()),
            SqlValue::String(s) => JsonValue::String(s.clone()),
            SqlValue::Bytes(bytes) => {
                JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect())
            }
            SqlValue::Json(j) => j.clone(),
            SqlValue::Date(d) => JsonValue::String(d.to_string()),
            SqlValue::Time(t) => JsonValue::String(t.to_string()),
            SqlValue::DateTime(dt) => JsonValue::String(dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Bool(b) => write!(f, "{}", b),
            SqlValue::TinyInt(i) => write!(f, "{}", i),
            SqlValue::SmallInt(i) => write!(f, "{}", i),
            SqlValue::Int(i) => write!(f, "{}", i),
            SqlValue::BigInt(i) => write!(f, "{}", i),
            SqlValue::UnsignedTinyInt(i) => write!(f, "{}", i),
            SqlValue::UnsignedSmallInt(i) => write!(f, "{}", i),
            SqlValue::UnsignedInt(i) => write!(f, "{}", i),
            SqlValue::UnsignedBigInt(i) => write!(f, "{}", i),
            SqlValue::Float(fl) => write!(f, "{}", fl),
            SqlValue::Double(d) => write!(f, "{}", d),
            SqlValue::Decimal(d) => write!(f, "{}", d),
            SqlValue::String(s) => write!(f, "{}", s),
            SqlValue::Bytes(b) => write!(f, "<binary:{} bytes>", b.len()),
            SqlValue::Json(j) => write!(f, "{}", j),
            SqlValue::Date(d) => write!(f, "{}", d),
            SqlValue::Time(t) => write!(f, "{}", t),
            SqlValue::DateTime(dt) => write!(f, "{}", dt),
        }
    }
}

macro_rules! impl_from_for_sql_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for SqlValue {
                fn from(v: $ty) -> Self {
                    SqlValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_sql_value! {
    bool => Bool,
    i8 => TinyInt,
    i16 => SmallInt,
    i32 => Int,
    i64 => BigInt,
    u8 => UnsignedTinyInt,
    u16 => UnsignedSmallInt,
    u32 => UnsignedInt,
    u64 => UnsignedBigInt,
    f32 => Float,
    f64 => Double,
    Decimal => Decimal,
    String => String,
    Vec<u8> => Bytes,
    JsonValue => Json,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::String(s.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(s: &String) -> Self {
        SqlValue::String(s.clone())
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => SqlValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_maps_to_null() {
        let missing: Option<i32> = None;
        assert_eq!(SqlValue::from(missing), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(7i32)), SqlValue::Int(7));
        assert_eq!(SqlValue::from(Some("abc")), SqlValue::String("abc".into()));
    }

    #[test]
    fn test_as_integer_covers_unsigned() {
        assert_eq!(SqlValue::UnsignedBigInt(u64::MAX).as_integer(), Some(u64::MAX as i128));
        assert_eq!(SqlValue::TinyInt(-3).as_integer(), Some(-3));
        assert_eq!(SqlValue::String("3".into()).as_integer(), None);
    }

    #[test]
    fn test_to_json_temporal_and_decimal() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(10, 30, 0))
            .unwrap();
        assert_eq!(
            SqlValue::DateTime(dt).to_json(),
            JsonValue::String("2024-01-15 10:30:00".into())
        );
        assert_eq!(
            SqlValue::Decimal(Decimal::new(1050, 2)).to_json(),
            JsonValue::String("10.50".into())
        );
        assert_eq!(SqlValue::Null.to_json(), JsonValue::Null);
    }
}
