//! Catalog type name to Rust type mapping
//!
//! Lookup is exact and case-sensitive on the name the catalog reports, with
//! ` unsigned` appended for unsigned integer columns.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// How one catalog type is represented in generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeMapping {
    pub base_type: &'static str,
    pub nullable_type: &'static str,
    /// `daogen::SqlValue` variant carrying the value
    pub accessor: &'static str,
    /// Zero value literal, `None` when the type has no meaningful zero
    pub zero_literal: &'static str,
    /// Whether the base type can key a map
    pub hashable: bool,
}

impl TypeMapping {
    pub fn has_zero(&self) -> bool {
        self.zero_literal != "None"
    }

    /// Type used where a column value is expected to be present
    pub fn view_type(&self) -> &'static str {
        if self.has_zero() {
            self.base_type
        } else {
            self.nullable_type
        }
    }
}

const fn mapping(
    base_type: &'static str,
    nullable_type: &'static str,
    accessor: &'static str,
    zero_literal: &'static str,
    hashable: bool,
) -> TypeMapping {
    TypeMapping {
        base_type,
        nullable_type,
        accessor,
        zero_literal,
        hashable,
    }
}

const TINYINT: TypeMapping = mapping("i8", "Option<i8>", "TinyInt", "0", true);
const SMALLINT: TypeMapping = mapping("i16", "Option<i16>", "SmallInt", "0", true);
const INT: TypeMapping = mapping("i32", "Option<i32>", "Int", "0", true);
const BIGINT: TypeMapping = mapping("i64", "Option<i64>", "BigInt", "0", true);
const UTINYINT: TypeMapping = mapping("u8", "Option<u8>", "UnsignedTinyInt", "0", true);
const USMALLINT: TypeMapping = mapping("u16", "Option<u16>", "UnsignedSmallInt", "0", true);
const UINT: TypeMapping = mapping("u32", "Option<u32>", "UnsignedInt", "0", true);
const UBIGINT: TypeMapping = mapping("u64", "Option<u64>", "UnsignedBigInt", "0", true);
const BOOL: TypeMapping = mapping("bool", "Option<bool>", "Bool", "false", true);
const STRING: TypeMapping = mapping("String", "Option<String>", "String", "String::new()", true);
const BYTES: TypeMapping = mapping("Vec<u8>", "Option<Vec<u8>>", "Bytes", "Vec::new()", true);
const DATE: TypeMapping = mapping(
    "chrono::NaiveDate",
    "Option<chrono::NaiveDate>",
    "Date",
    "None",
    true,
);
const TIME: TypeMapping = mapping(
    "chrono::NaiveTime",
    "Option<chrono::NaiveTime>",
    "Time",
    "None",
    true,
);
const DATETIME: TypeMapping = mapping(
    "chrono::NaiveDateTime",
    "Option<chrono::NaiveDateTime>",
    "DateTime",
    "None",
    true,
);
const FLOAT: TypeMapping = mapping("f32", "Option<f32>", "Float", "0.0", false);
const DOUBLE: TypeMapping = mapping("f64", "Option<f64>", "Double", "0.0", false);
const DECIMAL: TypeMapping = mapping(
    "rust_decimal::Decimal",
    "Option<rust_decimal::Decimal>",
    "Decimal",
    "rust_decimal::Decimal::ZERO",
    true,
);
const JSON: TypeMapping = mapping(
    "serde_json::Value",
    "Option<serde_json::Value>",
    "Json",
    "serde_json::Value::Null",
    false,
);

static TYPE_MAP: Lazy<HashMap<&'static str, TypeMapping>> = Lazy::new(|| {
    let entries: &[(&[&'static str], TypeMapping)] = &[
        (&["tinyint"], TINYINT),
        (&["smallint", "year"], SMALLINT),
        (&["int", "integer", "mediumint"], INT),
        (&["bigint"], BIGINT),
        (&["tinyint unsigned"], UTINYINT),
        (&["smallint unsigned"], USMALLINT),
        (&["int unsigned", "integer unsigned", "mediumint unsigned"], UINT),
        (&["bigint unsigned", "bit"], UBIGINT),
        (&["bool", "boolean"], BOOL),
        (
            &[
                "enum", "set", "char", "varchar", "tinytext", "text", "mediumtext", "longtext",
            ],
            STRING,
        ),
        (
            &["binary", "varbinary", "tinyblob", "blob", "mediumblob", "longblob"],
            BYTES,
        ),
        (&["date"], DATE),
        (&["time"], TIME),
        (&["datetime", "timestamp"], DATETIME),
        (&["float"], FLOAT),
        (&["double", "real"], DOUBLE),
        (&["decimal", "numeric"], DECIMAL),
        (&["json"], JSON),
    ];

    let mut map = HashMap::new();
    for (names, mapping) in entries {
        for name in *names {
            map.insert(*name, *mapping);
        }
    }
    map
});

/// Mapping for a catalog type name, if supported
pub fn resolve(type_name: &str) -> Option<&'static TypeMapping> {
    TYPE_MAP.get(type_name)
}

/// Every supported catalog type name, sorted
pub fn supported_types() -> Vec<&'static str> {
    let mut names: Vec<_> = TYPE_MAP.keys().copied().collect();
    names.sort_unstable();
    names
}
