//! Row filtering.

use super::IndexedRow;
use crate::model::{CellValue, ColumnKey, ColumnSet, PipelineError, Record};
use std::collections::BTreeMap;

/// Mapping from column key to the value that column is filtered by.
///
/// Entries whose value is null or the empty string are kept (so the UI can
/// echo what was typed) but have no effect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    entries: BTreeMap<ColumnKey, CellValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter value for `key`, replacing any previous one.
    pub fn set(&mut self, key: ColumnKey, value: impl Into<CellValue>) {
        self.entries.insert(key, value.into());
    }

    /// Builder form of [`FilterState::set`].
    pub fn with(mut self, key: ColumnKey, value: impl Into<CellValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove(&mut self, key: &ColumnKey) -> Option<CellValue> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, key: &ColumnKey) -> Option<&CellValue> {
        self.entries.get(key)
    }

    /// All entries, including blank ones.
    pub fn iter(&self) -> impl Iterator<Item = (&ColumnKey, &CellValue)> {
        self.entries.iter()
    }

    /// Entries that actually constrain rows.
    pub fn active(&self) -> impl Iterator<Item = (&ColumnKey, &CellValue)> {
        self.entries.iter().filter(|(_, v)| !v.is_blank())
    }

    /// True when at least one entry constrains rows.
    pub fn is_active(&self) -> bool {
        self.active().next().is_some()
    }
}

/// Whether a cell value satisfies a single filter value.
///
/// - text: case-insensitive substring of the stringified cell
/// - number: equality after numeric coercion of the cell
/// - bool: equality with a boolean cell
/// - anything else: exact equality of the stringified values
///
/// Blank filter values match everything.
pub fn matches(cell: &CellValue, filter: &CellValue) -> bool {
    match filter {
        CellValue::Null => true,
        CellValue::Text(needle) if needle.is_empty() => true,
        CellValue::Text(needle) => cell
            .to_string()
            .to_lowercase()
            .contains(&needle.to_lowercase()),
        CellValue::Number(n) => cell.as_number().is_some_and(|v| v == *n),
        CellValue::Bool(b) => matches!(cell, CellValue::Bool(v) if v == b),
        CellValue::Date(_) => cell.to_string() == filter.to_string(),
    }
}

/// Keep the rows that satisfy every active filter entry.
///
/// An inactive filter state returns `rows` untouched.
pub fn filter_rows<'a, T: Record>(
    rows: Vec<IndexedRow<'a, T>>,
    filters: &FilterState,
    columns: &ColumnSet<T>,
) -> Result<Vec<IndexedRow<'a, T>>, PipelineError> {
    let active: Vec<_> = filters.active().collect();
    if active.is_empty() {
        return Ok(rows);
    }

    let mut kept = Vec::with_capacity(rows.len());
    for row in rows {
        let mut retained = true;
        for (key, filter) in &active {
            let cell = columns.value_of(key, row.row)?;
            if !matches(&cell, filter) {
                retained = false;
                break;
            }
        }
        if retained {
            kept.push(row);
        }
    }

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn text_filter_is_case_insensitive_substring() {
        let cell = CellValue::text("Grace Hopper");
        assert!(matches(&cell, &CellValue::text("hop")));
        assert!(matches(&cell, &CellValue::text("GRACE")));
        assert!(!matches(&cell, &CellValue::text("ada")));
    }

    #[test]
    fn text_filter_matches_stringified_numbers() {
        assert!(matches(&CellValue::Number(1234.0), &CellValue::text("23")));
    }

    #[test]
    fn number_filter_uses_numeric_equality() {
        assert!(matches(&CellValue::Number(5.0), &CellValue::Number(5.0)));
        assert!(matches(&CellValue::text("5"), &CellValue::Number(5.0)));
        assert!(!matches(&CellValue::Number(50.0), &CellValue::Number(5.0)));
        assert!(!matches(&CellValue::Null, &CellValue::Number(0.0)));
    }

    #[test]
    fn bool_filter_requires_boolean_cell() {
        assert!(matches(&CellValue::Bool(true), &CellValue::Bool(true)));
        assert!(!matches(&CellValue::Bool(false), &CellValue::Bool(true)));
        assert!(!matches(&CellValue::text("true"), &CellValue::Bool(true)));
    }

    #[test]
    fn date_filter_compares_string_forms() {
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert!(matches(&CellValue::Date(date), &CellValue::Date(date)));
        assert!(matches(
            &CellValue::text("2024-05-01T00:00:00Z"),
            &CellValue::Date(date)
        ));
    }

    #[test]
    fn blank_filters_match_everything() {
        assert!(matches(&CellValue::Null, &CellValue::Null));
        assert!(matches(&CellValue::text("x"), &CellValue::text("")));
    }

    #[test]
    fn blank_entries_do_not_make_state_active() {
        let key = ColumnKey::new("name").unwrap();
        let state = FilterState::new()
            .with(key.clone(), "")
            .with(ColumnKey::new("age").unwrap(), CellValue::Null);
        assert!(!state.is_active());
        assert_eq!(state.get(&key), Some(&CellValue::text("")));
    }
}
