//! Row cursor abstraction consumed by the materializer

use crate::error::{Error, Result};
use crate::types::SqlValue;

/// Forward-only view over a tabular result
///
/// `advance` moves to the next row and reports whether one exists; an error
/// from `advance` is an iteration failure and ends the scan. Column values of
/// the current row are read with `value` or consumed and dropped with
/// `discard`.
pub trait Cursor {
    /// Column names of the result, in result order
    fn columns(&self) -> &[String];

    fn advance(&mut self) -> Result<bool>;

    fn value(&mut self, index: usize) -> Result<SqlValue>;

    /// Consume a column nobody is bound to
    fn discard(&mut self, index: usize) -> Result<()> {
        self.value(index).map(drop)
    }
}

/// In-memory cursor over prepared rows
#[derive(Debug, Clone, Default)]
pub struct MemoryCursor {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
    position: Option<usize>,
    fail_at: Option<(usize, String)>,
}

impl MemoryCursor {
    pub fn new<I, S>(columns: I, rows: Vec<Vec<SqlValue>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows,
            position: None,
            fail_at: None,
        }
    }

    /// Make the cursor report an iteration error when reaching row `index`
    pub fn fail_at(mut self, index: usize, message: impl Into<String>) -> Self {
        self.fail_at = Some((index, message.into()));
        self
    }

    fn current(&self) -> Result<&Vec<SqlValue>> {
        self.position
            .and_then(|p| self.rows.get(p))
            .ok_or_else(|| Error::database_query("cursor is not positioned on a row"))
    }
}

impl Cursor for MemoryCursor {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn advance(&mut self) -> Result<bool> {
        let next = self.position.map_or(0, |p| p + 1);
        if let Some((index, message)) = &self.fail_at {
            if *index == next {
                return Err(Error::database_query(message.clone()));
            }
        }
        self.position = Some(next);
        Ok(next < self.rows.len())
    }

    fn value(&mut self, index: usize) -> Result<SqlValue> {
        let row = self.current()?;
        row.get(index).cloned().ok_or_else(|| {
            Error::database_query(format!("column index {} out of bounds", index))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_cursor_walks_rows() {
        let mut cursor = MemoryCursor::new(
            ["id"],
            vec![vec![SqlValue::Int(1)], vec![SqlValue::Int(2)]],
        );
        assert!(cursor.value(0).is_err());
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.value(0).unwrap(), SqlValue::Int(1));
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.value(0).unwrap(), SqlValue::Int(2));
        assert!(!cursor.advance().unwrap());
    }

    #[test]
    fn test_fail_at_reports_iteration_error() {
        let mut cursor = MemoryCursor::new(["id"], vec![vec![SqlValue::Int(1)]]).fail_at(1, "lost");
        assert!(cursor.advance().unwrap());
        assert!(cursor.advance().is_err());
    }
}
