//! Destination record description and column binding
//!
//! A destination type describes its fields once through [`Record::fields`],
//! normally derived with `#[derive(Record)]`. The description is walked a
//! single time per type to build a [`BindingMap`] from lowercase column name
//! to field index path. Row scans then only do indexed writes through
//! [`Record::scan_field`].

use crate::error::{Error, Result};
use crate::types::SqlValue;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// Binding description of one struct field
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Rust identifier of the field, without any `r#` prefix
    pub ident: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Bound to a result column, by explicit name or by identifier
    Column {
        name: Option<&'static str>,
        default: Option<&'static str>,
    },
    /// Embedded record whose own fields bind through this one
    Embedded(fn() -> Vec<FieldDescriptor>),
    /// Never bound
    Excluded,
}

impl FieldDescriptor {
    pub const fn column(
        ident: &'static str,
        name: Option<&'static str>,
        default: Option<&'static str>,
    ) -> Self {
        Self {
            ident,
            kind: FieldKind::Column { name, default },
        }
    }

    pub const fn embedded(ident: &'static str, fields: fn() -> Vec<FieldDescriptor>) -> Self {
        Self {
            ident,
            kind: FieldKind::Embedded(fields),
        }
    }

    pub const fn excluded(ident: &'static str) -> Self {
        Self {
            ident,
            kind: FieldKind::Excluded,
        }
    }
}

/// A type that result rows can be materialized into
///
/// Use `#[derive(Record)]` rather than implementing this by hand. Field
/// positions in [`Record::fields`] are the indices used by
/// [`Record::scan_field`] paths.
pub trait Record: Default + 'static {
    /// Describe every field in declaration order
    fn fields() -> Vec<FieldDescriptor>;

    /// Write `value` into the field at `path`, descending into embedded records
    fn scan_field(&mut self, path: &[usize], value: &SqlValue) -> Result<()>;
}

/// Column binding of one column in a [`BindingMap`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub path: Vec<usize>,
    pub default: Option<&'static str>,
}

/// Map from lowercase column name to field path for one record type
#[derive(Debug, Clone)]
pub struct BindingMap {
    type_name: &'static str,
    columns: HashMap<String, Binding>,
}

static BINDING_CACHE: Lazy<DashMap<TypeId, Arc<BindingMap>>> = Lazy::new(DashMap::new);

impl BindingMap {
    /// Walk the field description of `T` and build its binding map
    pub fn build<T: Record>() -> Result<Self> {
        let type_name = std::any::type_name::<T>();
        let mut columns = HashMap::new();
        collect(&T::fields(), &[], &mut columns);

        if columns.is_empty() {
            return Err(Error::binding(format!(
                "{} has no bindable fields",
                type_name
            )));
        }

        log::trace!("Built binding map for {} ({} columns)", type_name, columns.len());
        Ok(Self { type_name, columns })
    }

    /// Cached binding map of `T`, built on first use
    ///
    /// Concurrent first requests for the same type race to the map entry;
    /// the first writer's map is the one every caller sees.
    pub fn for_type<T: Record>() -> Result<Arc<BindingMap>> {
        let key = TypeId::of::<T>();
        if let Some(existing) = BINDING_CACHE.get(&key) {
            return Ok(Arc::clone(existing.value()));
        }

        let built = Arc::new(Self::build::<T>()?);
        let entry = BINDING_CACHE.entry(key).or_insert(built);
        Ok(Arc::clone(entry.value()))
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Field path bound to `column`, compared case-insensitively
    pub fn resolve(&self, column: &str) -> Option<&[usize]> {
        self.lookup(column).map(|b| b.path.as_slice())
    }

    /// Declared default of the field bound to `column`
    pub fn default_value(&self, column: &str) -> Option<&'static str> {
        self.lookup(column).and_then(|b| b.default)
    }

    fn lookup(&self, column: &str) -> Option<&Binding> {
        match self.columns.get(column) {
            Some(binding) => Some(binding),
            None => self.columns.get(&column.to_lowercase()),
        }
    }
}

fn collect(fields: &[FieldDescriptor], prefix: &[usize], out: &mut HashMap<String, Binding>) {
    for (index, field) in fields.iter().enumerate() {
        let mut path = prefix.to_vec();
        path.push(index);

        match field.kind {
            FieldKind::Excluded => {}
            FieldKind::Embedded(nested) => collect(&nested(), &path, out),
            FieldKind::Column { name, default } => {
                let column = name.unwrap_or(field.ident).to_lowercase();
                out.insert(column, Binding { path, default });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Audit;

    impl Record for Audit {
        fn fields() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::column("created_by", None, None),
                FieldDescriptor::column("Id", Some("audit_id"), None),
            ]
        }

        fn scan_field(&mut self, _path: &[usize], _value: &SqlValue) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Order;

    impl Record for Order {
        fn fields() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::column("id", Some("ID"), None),
                FieldDescriptor::excluded("cache"),
                FieldDescriptor::embedded("audit", Audit::fields),
                FieldDescriptor::column("status", None, Some("new")),
                FieldDescriptor::column("created_by", Some("owner"), None),
            ]
        }

        fn scan_field(&mut self, _path: &[usize], _value: &SqlValue) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Nothing;

    impl Record for Nothing {
        fn fields() -> Vec<FieldDescriptor> {
            vec![FieldDescriptor::excluded("scratch")]
        }

        fn scan_field(&mut self, _path: &[usize], _value: &SqlValue) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_embedded_paths_are_prefixed() {
        let map = BindingMap::build::<Order>().unwrap();
        assert_eq!(map.resolve("id"), Some(&[0][..]));
        assert_eq!(map.resolve("created_by"), Some(&[2, 0][..]));
        assert_eq!(map.resolve("audit_id"), Some(&[2, 1][..]));
        assert_eq!(map.resolve("owner"), Some(&[4][..]));
        assert_eq!(map.resolve("cache"), None);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let map = BindingMap::build::<Order>().unwrap();
        assert_eq!(map.resolve("STATUS"), Some(&[3][..]));
        assert_eq!(map.resolve("Audit_Id"), Some(&[2, 1][..]));
        assert_eq!(map.default_value("status"), Some("new"));
        assert_eq!(map.default_value("id"), None);
    }

    #[test]
    fn test_no_bindable_fields_is_binding_error() {
        let err = BindingMap::build::<Nothing>().unwrap_err();
        assert_eq!(err.error_code(), "E_BINDING");
    }

    #[test]
    fn test_for_type_is_cached() {
        let first = BindingMap::for_type::<Order>().unwrap();
        let second = BindingMap::for_type::<Order>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[derive(Default)]
    struct Shipment;

    impl Record for Shipment {
        fn fields() -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::column("id", None, None),
                FieldDescriptor::column("carrier", None, Some("post")),
            ]
        }

        fn scan_field(&mut self, _path: &[usize], _value: &SqlValue) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_for_type_concurrent_first_use() {
        const THREADS: usize = 8;
        let barrier = Arc::new(std::sync::Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    BindingMap::for_type::<Shipment>().unwrap()
                })
            })
            .collect();
        let maps: Vec<Arc<BindingMap>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let first = &maps[0];
        assert_eq!(first.len(), 2);
        for map in &maps[1..] {
            assert!(Arc::ptr_eq(first, map));
        }
        assert!(Arc::ptr_eq(first, &BindingMap::for_type::<Shipment>().unwrap()));
    }
}
