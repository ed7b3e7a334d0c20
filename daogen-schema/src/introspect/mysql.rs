//! MySQL catalog source

use super::{RawColumn, SchemaSource};
use crate::{Result, SchemaError};
use async_trait::async_trait;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySql, Pool, Row};

pub struct MySqlSchemaSource {
    pool: Pool<MySql>,
}

impl MySqlSchemaSource {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// Build a source whose connection opens on first query
    ///
    /// Connectivity problems then surface per table as `SchemaQueryFailed`.
    pub fn connect_lazy(dsn: &str) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_lazy(dsn)
            .map_err(|e| SchemaError::configuration(format!("Invalid DSN: {}", e)))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl SchemaSource for MySqlSchemaSource {
    async fn table_exists(&self, table: &str) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS table_count
            FROM information_schema.tables
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
            "#,
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.try_get("table_count")?;
        Ok(count > 0)
    }

    async fn columns(&self, table: &str) -> Result<Vec<RawColumn>> {
        let rows = sqlx::query(
            r#"
            SELECT
                CAST(COLUMN_NAME AS CHAR) AS column_name,
                CAST(DATA_TYPE AS CHAR) AS data_type,
                CAST(COLUMN_TYPE AS CHAR) AS column_type,
                CAST(IS_NULLABLE AS CHAR) AS is_nullable,
                CAST(COLUMN_KEY AS CHAR) AS column_key,
                CAST(COLUMN_COMMENT AS CHAR) AS column_comment,
                CAST(COLUMN_DEFAULT AS CHAR) AS column_default
            FROM information_schema.columns
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
            ORDER BY (COLUMN_KEY = 'PRI') DESC, ORDINAL_POSITION
            "#,
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let data_type: String = row.try_get("data_type")?;
            let column_type: String = row.try_get("column_type")?;
            let is_nullable: String = row.try_get("is_nullable")?;
            let column_key: String = row.try_get("column_key").unwrap_or_default();

            columns.push(RawColumn {
                name: row.try_get("column_name")?,
                data_type: catalog_type_name(&data_type, &column_type),
                nullable: is_nullable.eq_ignore_ascii_case("YES"),
                primary_key: column_key == "PRI",
                comment: row
                    .try_get::<Option<String>, _>("column_comment")?
                    .unwrap_or_default(),
                default: row.try_get("column_default")?,
            });
        }

        log::trace!("Catalog returned {} columns for {}", columns.len(), table);
        Ok(columns)
    }
}

/// `DATA_TYPE` with ` unsigned` appended when `COLUMN_TYPE` says so
fn catalog_type_name(data_type: &str, column_type: &str) -> String {
    let data_type = data_type.to_lowercase();
    if column_type.to_lowercase().contains("unsigned") {
        format!("{} unsigned", data_type)
    } else {
        data_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_type_name() {
        assert_eq!(catalog_type_name("int", "int(11)"), "int");
        assert_eq!(catalog_type_name("int", "int(10) unsigned"), "int unsigned");
        assert_eq!(catalog_type_name("BIGINT", "bigint unsigned zerofill"), "bigint unsigned");
    }
}
