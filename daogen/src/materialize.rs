//! Row materialization
//!
//! Every entry point resolves the cursor's columns against the destination
//! type's [`BindingMap`] once, then scans rows with that fixed plan. Columns
//! without a binding are read and dropped so that extra columns in a result
//! never fail a batch.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::record::{BindingMap, Record};
use crate::types::{FromSqlValue, SqlValue};

/// Per-column scan plan: the bound field path, if any
struct ColumnPlan<'m> {
    name: &'m str,
    path: Option<&'m [usize]>,
}

fn plan<'m>(map: &'m BindingMap, columns: &'m [String]) -> Vec<ColumnPlan<'m>> {
    columns
        .iter()
        .map(|name| ColumnPlan {
            name: name.as_str(),
            path: map.resolve(name),
        })
        .collect()
}

fn scan_row<T: Record, C: Cursor + ?Sized>(cursor: &mut C, plan: &[ColumnPlan<'_>]) -> Result<T> {
    let mut record = T::default();
    for (index, column) in plan.iter().enumerate() {
        match column.path {
            Some(path) => {
                let value = cursor.value(index).map_err(|e| e.at_column(column.name))?;
                record
                    .scan_field(path, &value)
                    .map_err(|e| e.at_column(column.name))?;
            }
            None => cursor.discard(index)?,
        }
    }
    Ok(record)
}

/// Scan every row of `cursor` into a new vector
pub fn materialize<T: Record, C: Cursor + ?Sized>(cursor: &mut C) -> Result<Vec<T>> {
    let map = BindingMap::for_type::<T>()?;
    let columns = cursor.columns().to_vec();
    let plan = plan(&map, &columns);

    let mut records = Vec::new();
    while cursor.advance()? {
        records.push(scan_row::<T, C>(cursor, &plan)?);
    }

    log::trace!("Materialized {} rows into {}", records.len(), map.type_name());
    Ok(records)
}

/// Scan every row into `out`, replacing its contents only on success
pub fn materialize_into<T: Record, C: Cursor + ?Sized>(
    cursor: &mut C,
    out: &mut Vec<T>,
) -> Result<()> {
    let records = materialize(cursor)?;
    *out = records;
    Ok(())
}

/// Scan the first row, if any; later rows are left unread
pub fn materialize_one<T: Record, C: Cursor + ?Sized>(cursor: &mut C) -> Result<Option<T>> {
    let map = BindingMap::for_type::<T>()?;
    let columns = cursor.columns().to_vec();
    let plan = plan(&map, &columns);

    if !cursor.advance()? {
        return Ok(None);
    }
    scan_row::<T, C>(cursor, &plan).map(Some)
}

fn single_column<C: Cursor + ?Sized>(cursor: &C) -> Result<String> {
    match cursor.columns() {
        [only] => Ok(only.clone()),
        columns => Err(Error::binding(format!(
            "scalar scan needs exactly one column, result has {}",
            columns.len()
        ))),
    }
}

/// Scan a single-column result into a flat vector of values
///
/// The column count is checked once the result turns out to have rows.
pub fn materialize_scalars<S: FromSqlValue, C: Cursor + ?Sized>(cursor: &mut C) -> Result<Vec<S>> {
    let mut values = Vec::new();
    if !cursor.advance()? {
        return Ok(values);
    }

    let column = single_column(&*cursor)?;
    loop {
        let value: SqlValue = cursor.value(0).map_err(|e| e.at_column(&column))?;
        let scalar = S::from_sql_value(&value)
            .map_err(|e| Error::scan(std::any::type_name::<S>(), e).at_column(&column))?;
        values.push(scalar);

        if !cursor.advance()? {
            break;
        }
    }
    Ok(values)
}

/// Scan the first value of a single-column result; an empty result is `NoRows`
pub fn materialize_scalar<S: FromSqlValue, C: Cursor + ?Sized>(cursor: &mut C) -> Result<S> {
    materialize_scalars(cursor)?
        .into_iter()
        .next()
        .ok_or(Error::NoRows)
}
