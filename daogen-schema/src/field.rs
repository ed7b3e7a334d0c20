//! Generated field description of one table column

use crate::caser;
use crate::introspect::RawColumn;
use crate::type_map::{self, TypeMapping};
use crate::{Result, SchemaError};
use serde::Serialize;

/// Attribute tags attached to a generated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldTags {
    /// `column(name = "..")`
    pub persistence: String,
    /// `serde(rename = "..")`
    pub external: String,
    /// `serde(alias = "..")`
    pub form: String,
    /// `column(default = "..")`, only when the column declares a default
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub column_name: String,
    /// Catalog type name used for the mapping lookup
    pub column_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    pub comment: String,
    pub default: Option<String>,

    pub field_name: String,
    pub lower_camel: String,
    pub constant_name: String,
    pub ident: String,

    pub mapping: TypeMapping,
    pub tags: FieldTags,
}

impl Field {
    /// Build a field from one catalog row
    pub fn from_column(table: &str, column: &RawColumn) -> Result<Self> {
        let mapping = type_map::resolve(&column.data_type).ok_or_else(|| {
            SchemaError::UnsupportedColumnType {
                table: table.to_string(),
                column: column.name.clone(),
                column_type: column.data_type.clone(),
            }
        })?;

        let lower_camel = caser::to_lower_camel(&column.name)?;
        let tags = FieldTags {
            persistence: format!("column(name = {:?})", column.name),
            external: format!("serde(rename = {:?})", column.name),
            form: format!("serde(alias = {:?})", lower_camel),
            default: column
                .default
                .as_ref()
                .map(|d| format!("column(default = {:?})", d)),
        };

        Ok(Self {
            column_name: column.name.clone(),
            column_type: column.data_type.clone(),
            nullable: column.nullable,
            primary_key: column.primary_key,
            comment: column.comment.clone(),
            default: column.default.clone(),
            field_name: caser::to_upper_camel(&column.name)?,
            lower_camel,
            constant_name: caser::to_constant_name(&column.name)?,
            ident: caser::to_ident(&column.name)?,
            mapping: *mapping,
            tags,
        })
    }

    pub fn base_type(&self) -> &'static str {
        self.mapping.base_type
    }

    pub fn nullable_type(&self) -> &'static str {
        self.mapping.nullable_type
    }

    /// Type the column takes when nullability is honoured
    pub fn declared_type(&self) -> &'static str {
        if self.nullable {
            self.mapping.nullable_type
        } else {
            self.mapping.base_type
        }
    }

    pub fn zero_literal(&self) -> &'static str {
        self.mapping.zero_literal
    }

    /// Whether the form alias adds a name beyond the column name
    pub fn has_distinct_alias(&self) -> bool {
        self.lower_camel != self.column_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, data_type: &str) -> RawColumn {
        RawColumn {
            name: name.to_string(),
            data_type: data_type.to_string(),
            nullable: false,
            primary_key: false,
            comment: String::new(),
            default: None,
        }
    }

    #[test]
    fn test_derived_names_and_tags() {
        let field = Field::from_column("user", &column("created_at", "datetime")).unwrap();
        assert_eq!(field.field_name, "CreatedAt");
        assert_eq!(field.lower_camel, "createdAt");
        assert_eq!(field.constant_name, "CREATED_AT");
        assert_eq!(field.ident, "created_at");
        assert_eq!(field.tags.persistence, r#"column(name = "created_at")"#);
        assert_eq!(field.tags.external, r#"serde(rename = "created_at")"#);
        assert_eq!(field.tags.form, r#"serde(alias = "createdAt")"#);
        assert_eq!(field.tags.default, None);
    }

    #[test]
    fn test_empty_default_is_kept() {
        let mut raw = column("note", "varchar");
        raw.default = Some(String::new());
        let field = Field::from_column("user", &raw).unwrap();
        assert_eq!(field.tags.default.as_deref(), Some(r#"column(default = "")"#));
    }

    #[test]
    fn test_unsupported_type() {
        let err = Field::from_column("shape", &column("area", "geometry")).unwrap_err();
        match err {
            SchemaError::UnsupportedColumnType {
                table,
                column,
                column_type,
            } => {
                assert_eq!(table, "shape");
                assert_eq!(column, "area");
                assert_eq!(column_type, "geometry");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
