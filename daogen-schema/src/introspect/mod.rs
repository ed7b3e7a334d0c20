//! Schema introspection
//!
//! A [`SchemaSource`] answers catalog questions for the active schema; the
//! [`Introspector`] turns its raw rows into ordered [`Field`] lists.

use crate::field::Field;
use crate::{NotFoundReason, Result, SchemaError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod mysql;

pub use mysql::MySqlSchemaSource;

/// One catalog row describing a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawColumn {
    pub name: String,
    /// Catalog type name, with ` unsigned` appended for unsigned integers
    pub data_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub default: Option<String>,
}

/// Catalog access for the active schema
#[async_trait]
pub trait SchemaSource: Send + Sync {
    async fn table_exists(&self, table: &str) -> Result<bool>;

    /// Column rows of `table`, primary-key columns first
    async fn columns(&self, table: &str) -> Result<Vec<RawColumn>>;
}

/// Introspected fields of one table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    pub table: String,
    pub fields: Vec<Field>,
    /// Primary-key fields in field order
    pub primary_key_fields: Vec<Field>,
}

pub struct Introspector<'a> {
    source: &'a dyn SchemaSource,
}

impl<'a> Introspector<'a> {
    pub fn new(source: &'a dyn SchemaSource) -> Self {
        Self { source }
    }

    pub async fn introspect(&self, table: &str) -> Result<TableSchema> {
        if !self.source.table_exists(table).await? {
            return Err(SchemaError::TableNotFound {
                table: table.to_string(),
                reason: NotFoundReason::Missing,
            });
        }

        let mut columns = self.source.columns(table).await?;
        if columns.is_empty() {
            return Err(SchemaError::TableNotFound {
                table: table.to_string(),
                reason: NotFoundReason::NoColumns,
            });
        }
        // Stable, so catalog order is kept within each group
        columns.sort_by_key(|c| !c.primary_key);

        let fields = columns
            .iter()
            .map(|c| Field::from_column(table, c))
            .collect::<Result<Vec<_>>>()?;
        let primary_key_fields = fields.iter().filter(|f| f.primary_key).cloned().collect();

        log::debug!("Introspected {} ({} columns)", table, fields.len());
        Ok(TableSchema {
            table: table.to_string(),
            fields,
            primary_key_fields,
        })
    }
}
