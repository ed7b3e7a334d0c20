//! Statement text plus ordered parameters

use crate::error::Result;
use crate::types::SqlValue;

/// A SQL statement ready for execution
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Append a parameter, builder style
    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.params.push(value.into());
        self
    }
}

/// Query builder contract used by generated data-access code
///
/// Implementations turn their own criteria into statement text and the
/// parameter list bound to its placeholders.
pub trait StatementBuilder {
    fn build_select(&self) -> Result<Statement>;

    fn build_count(&self) -> Result<Statement>;

    fn build_insert(&self) -> Result<Statement>;

    fn build_update(&self) -> Result<Statement>;

    fn build_delete(&self) -> Result<Statement>;
}

/// `?` placeholders joined by commas, for `IN (...)` lists
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_appends_in_order() {
        let stmt = Statement::new("select * from `user` where `id` = ? and `name` = ?", vec![])
            .bind(7i32)
            .bind("ann");
        assert_eq!(stmt.params, vec![SqlValue::Int(7), SqlValue::String("ann".into())]);
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(3), "?,?,?");
        assert_eq!(placeholders(0), "");
    }
}
