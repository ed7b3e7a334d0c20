//! In-memory catalog shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use daogen_schema::{RawColumn, Result, SchemaError, SchemaSource};
use std::collections::HashMap;

#[derive(Default)]
pub struct FakeSource {
    tables: HashMap<String, Vec<RawColumn>>,
    broken: Vec<String>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, name: &str, columns: Vec<RawColumn>) -> Self {
        self.tables.insert(name.to_string(), columns);
        self
    }

    /// Catalog queries for `name` fail
    pub fn broken(mut self, name: &str) -> Self {
        self.broken.push(name.to_string());
        self
    }
}

#[async_trait]
impl SchemaSource for FakeSource {
    async fn table_exists(&self, table: &str) -> Result<bool> {
        if self.broken.iter().any(|t| t == table) {
            return Err(SchemaError::schema_query("connection refused"));
        }
        Ok(self.tables.contains_key(table))
    }

    async fn columns(&self, table: &str) -> Result<Vec<RawColumn>> {
        Ok(self.tables.get(table).cloned().unwrap_or_default())
    }
}

pub fn column(name: &str, data_type: &str) -> RawColumn {
    RawColumn {
        name: name.to_string(),
        data_type: data_type.to_string(),
        nullable: false,
        primary_key: false,
        comment: String::new(),
        default: None,
    }
}

pub fn key(name: &str, data_type: &str) -> RawColumn {
    RawColumn {
        primary_key: true,
        ..column(name, data_type)
    }
}

pub fn nullable(name: &str, data_type: &str) -> RawColumn {
    RawColumn {
        nullable: true,
        ..column(name, data_type)
    }
}

/// `user(id int pk, name varchar, created_at datetime null)`
pub fn user_columns() -> Vec<RawColumn> {
    vec![
        key("id", "int"),
        RawColumn {
            comment: "Display name".to_string(),
            ..column("name", "varchar")
        },
        nullable("created_at", "datetime"),
    ]
}
