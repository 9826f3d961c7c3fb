//! Column configuration.
//!
//! A column either reads a named field straight off the row through the
//! [`Record`] capability, or supplies its own accessor. Both are fallible so
//! that a broken accessor surfaces as a [`PipelineError`] attributed to the
//! column instead of a silently wrong value.

use super::error::{ColumnError, PipelineError};
use super::identifiers::{ColumnKey, RowId};
use super::value::CellValue;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Capability rows expose to the engine.
///
/// Both methods default to "nothing known", so rows accessed purely through
/// column accessors only need an empty impl.
pub trait Record {
    /// Direct field lookup by column key.
    fn field(&self, _key: &str) -> CellValue {
        CellValue::Null
    }

    /// The row's `id` field, used when no row key function is configured.
    fn id(&self) -> Option<RowId> {
        None
    }
}

/// Accessor extracting a cell value from a row.
pub type AccessorFn<T> = Arc<dyn Fn(&T) -> Result<CellValue, String> + Send + Sync>;

/// Custom comparator ordering two rows ascending.
pub type ComparatorFn<T> = Arc<dyn Fn(&T, &T) -> Result<Ordering, String> + Send + Sync>;

/// How a column obtains its value from a row.
pub enum ColumnAccess<T> {
    /// Look the column key up via [`Record::field`].
    DirectField,
    /// Call a column-specific accessor.
    Accessor(AccessorFn<T>),
}

impl<T> Clone for ColumnAccess<T> {
    fn clone(&self) -> Self {
        match self {
            Self::DirectField => Self::DirectField,
            Self::Accessor(f) => Self::Accessor(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for ColumnAccess<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectField => f.write_str("DirectField"),
            Self::Accessor(_) => f.write_str("Accessor(..)"),
        }
    }
}

/// A single column definition.
pub struct ColumnSpec<T> {
    key: String,
    /// Whether the column may be sorted.
    pub sortable: bool,
    /// Whether the column may be filtered.
    pub filterable: bool,
    access: ColumnAccess<T>,
    comparator: Option<ComparatorFn<T>>,
}

impl<T> ColumnSpec<T> {
    /// A column reading `key` directly off the row. Not sortable or
    /// filterable until enabled.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            sortable: false,
            filterable: false,
            access: ColumnAccess::DirectField,
            comparator: None,
        }
    }

    /// Enable sorting on this column.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Enable filtering on this column.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Use an infallible accessor instead of direct field access.
    pub fn accessor<F, V>(self, f: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<CellValue>,
    {
        self.try_accessor(move |row| Ok(f(row).into()))
    }

    /// Use a fallible accessor instead of direct field access.
    pub fn try_accessor<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Result<CellValue, String> + Send + Sync + 'static,
    {
        self.access = ColumnAccess::Accessor(Arc::new(f));
        self
    }

    /// Use an infallible custom comparator when sorting by this column.
    pub fn comparator<F>(self, f: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.try_comparator(move |a, b| Ok(f(a, b)))
    }

    /// Use a fallible custom comparator when sorting by this column.
    pub fn try_comparator<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &T) -> Result<Ordering, String> + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(f));
        self
    }

    /// The raw (unvalidated) key.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn access(&self) -> &ColumnAccess<T> {
        &self.access
    }

    pub fn custom_comparator(&self) -> Option<&ComparatorFn<T>> {
        self.comparator.as_ref()
    }
}

impl<T> Clone for ColumnSpec<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            sortable: self.sortable,
            filterable: self.filterable,
            access: self.access.clone(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("key", &self.key)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("access", &self.access)
            .field("comparator", &self.comparator.is_some())
            .finish()
    }
}

/// A column after validation.
pub struct Column<T> {
    key: ColumnKey,
    spec: ColumnSpec<T>,
}

impl<T: Record> Column<T> {
    pub fn key(&self) -> &ColumnKey {
        &self.key
    }

    pub fn is_sortable(&self) -> bool {
        self.spec.sortable
    }

    pub fn is_filterable(&self) -> bool {
        self.spec.filterable
    }

    pub fn comparator(&self) -> Option<&ComparatorFn<T>> {
        self.spec.custom_comparator()
    }

    /// Resolve this column's value for `row`.
    pub fn value(&self, row: &T) -> Result<CellValue, PipelineError> {
        match &self.spec.access {
            ColumnAccess::DirectField => Ok(row.field(self.key.as_str())),
            ColumnAccess::Accessor(f) => f(row).map_err(|reason| PipelineError::Accessor {
                column: self.key.clone(),
                reason,
            }),
        }
    }

    /// Run the custom comparator, if any, attributing failures to this column.
    pub fn compare_rows(&self, a: &T, b: &T) -> Option<Result<Ordering, PipelineError>> {
        self.spec.custom_comparator().map(|cmp| {
            cmp(a, b).map_err(|reason| PipelineError::Comparator {
                column: self.key.clone(),
                reason,
            })
        })
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.spec.fmt(f)
    }
}

/// An ordered, validated set of columns with unique non-empty keys.
pub struct ColumnSet<T> {
    columns: Vec<Column<T>>,
}

impl<T: Record> ColumnSet<T> {
    /// Validate `specs` into a column set.
    ///
    /// # Errors
    ///
    /// [`ColumnError::MissingKey`] for an empty key and
    /// [`ColumnError::DuplicateKey`] for a repeated one.
    pub fn new(specs: Vec<ColumnSpec<T>>) -> Result<Self, ColumnError> {
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(specs.len());

        for spec in specs {
            let key = ColumnKey::new(spec.key.clone()).map_err(|_| ColumnError::MissingKey)?;
            if !seen.insert(key.clone()) {
                return Err(ColumnError::DuplicateKey {
                    key: key.to_string(),
                });
            }
            columns.push(Column { key, spec });
        }

        Ok(Self { columns })
    }

    pub fn get(&self, key: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.key.as_str() == key)
    }

    /// Look up a column, failing with [`ColumnError::UnknownColumn`].
    pub fn require(&self, key: &str) -> Result<&Column<T>, ColumnError> {
        self.get(key).ok_or_else(|| ColumnError::UnknownColumn {
            key: key.to_string(),
        })
    }

    /// Resolve `key` for `row`: through the column when declared, otherwise
    /// by direct field lookup.
    pub fn value_of(&self, key: &ColumnKey, row: &T) -> Result<CellValue, PipelineError> {
        match self.get(key.as_str()) {
            Some(column) => column.value(row),
            None => Ok(row.field(key.as_str())),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column<T>> {
        self.columns.iter()
    }
}

impl<T> fmt::Debug for ColumnSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Person {
        name: &'static str,
        age: i64,
    }

    impl Record for Person {
        fn field(&self, key: &str) -> CellValue {
            match key {
                "name" => self.name.into(),
                "age" => self.age.into(),
                _ => CellValue::Null,
            }
        }
    }

    #[test]
    fn rejects_duplicate_keys() {
        let result = ColumnSet::<Person>::new(vec![ColumnSpec::new("name"), ColumnSpec::new("name")]);
        assert_eq!(
            result.err(),
            Some(ColumnError::DuplicateKey {
                key: "name".to_string()
            })
        );
    }

    #[test]
    fn rejects_empty_key() {
        let result = ColumnSet::<Person>::new(vec![ColumnSpec::new("")]);
        assert_eq!(result.err(), Some(ColumnError::MissingKey));
    }

    #[test]
    fn direct_field_reads_through_record() {
        let columns = ColumnSet::new(vec![ColumnSpec::<Person>::new("name")]).unwrap();
        let row = Person { name: "Ada", age: 36 };
        let value = columns.require("name").unwrap().value(&row).unwrap();
        assert_eq!(value, CellValue::text("Ada"));
    }

    #[test]
    fn accessor_overrides_field_lookup() {
        let columns = ColumnSet::new(vec![
            ColumnSpec::<Person>::new("decade").accessor(|p: &Person| p.age / 10)
        ])
        .unwrap();
        let row = Person { name: "Ada", age: 36 };
        let value = columns.require("decade").unwrap().value(&row).unwrap();
        assert_eq!(value, CellValue::Number(3.0));
    }

    #[test]
    fn failing_accessor_is_attributed_to_its_column() {
        let columns = ColumnSet::new(vec![
            ColumnSpec::<Person>::new("broken").try_accessor(|_| Err("no value".to_string()))
        ])
        .unwrap();
        let row = Person { name: "Ada", age: 36 };
        let err = columns.require("broken").unwrap().value(&row).unwrap_err();
        assert_eq!(
            err,
            PipelineError::Accessor {
                column: ColumnKey::new("broken").unwrap(),
                reason: "no value".to_string(),
            }
        );
    }

    #[test]
    fn undeclared_keys_fall_back_to_field_lookup() {
        let columns = ColumnSet::<Person>::new(vec![]).unwrap();
        let row = Person { name: "Ada", age: 36 };
        let key = ColumnKey::new("age").unwrap();
        assert_eq!(columns.value_of(&key, &row).unwrap(), CellValue::Number(36.0));
    }

    #[test]
    fn require_reports_unknown_columns() {
        let columns = ColumnSet::<Person>::new(vec![ColumnSpec::new("name")]).unwrap();
        assert_eq!(
            columns.require("missing").err(),
            Some(ColumnError::UnknownColumn {
                key: "missing".to_string()
            })
        );
    }
}
