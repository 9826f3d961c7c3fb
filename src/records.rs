//! JSON rows.
//!
//! Lets the engine run over `serde_json::Value` objects, so data loaded from
//! a file or stdin can be sorted, filtered and paged without a bespoke row
//! type.

use crate::model::{CellValue, ColumnError, ColumnSet, ColumnSpec, GridError, Record, RowId};
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde_json::Value;
use std::io::Read;
use tracing::debug;

/// Field consulted by [`Record::id`] for JSON rows.
pub const ID_FIELD: &str = "id";

impl Record for Value {
    fn field(&self, key: &str) -> CellValue {
        self.get(key).map(cell_from_json).unwrap_or_default()
    }

    fn id(&self) -> Option<RowId> {
        match self.get(ID_FIELD)? {
            Value::Number(n) => Some(match n.as_i64() {
                Some(n) => RowId::Number(n),
                None => RowId::Text(n.to_string()),
            }),
            Value::String(s) => Some(RowId::Text(s.clone())),
            _ => None,
        }
    }
}

/// Convert one JSON value to a cell.
///
/// Strings holding an RFC 3339 timestamp become dates; arrays and objects
/// become their compact JSON text.
pub fn cell_from_json(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Null,
        Value::Bool(b) => CellValue::Bool(*b),
        Value::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(n.to_string())),
        Value::String(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(date) => CellValue::Date(date.with_timezone(&Utc)),
            Err(_) => CellValue::Text(s.clone()),
        },
        Value::Array(_) | Value::Object(_) => CellValue::Text(value.to_string()),
    }
}

/// Parse a JSON array of objects.
///
/// # Errors
///
/// [`GridError::Data`] for malformed JSON, a non-array document, or an
/// element that is not an object.
pub fn parse_rows(input: &str) -> Result<Vec<Value>, GridError> {
    let document: Value = serde_json::from_str(input)?;
    into_rows(document)
}

/// Read and parse a JSON array of objects.
pub fn read_rows(reader: impl Read) -> Result<Vec<Value>, GridError> {
    let document: Value = serde_json::from_reader(reader)?;
    into_rows(document)
}

fn into_rows(document: Value) -> Result<Vec<Value>, GridError> {
    let Value::Array(rows) = document else {
        return Err(serde_json::Error::custom("expected a JSON array of objects").into());
    };
    if let Some(position) = rows.iter().position(|row| !row.is_object()) {
        return Err(
            serde_json::Error::custom(format!("row {} is not a JSON object", position)).into(),
        );
    }
    debug!(rows = rows.len(), "Loaded JSON rows");
    Ok(rows)
}

/// One sortable, filterable column per key of the first row.
///
/// Keys come out in `serde_json`'s map order (alphabetical). An empty
/// collection yields an empty column set.
pub fn infer_columns(rows: &[Value]) -> Result<ColumnSet<Value>, ColumnError> {
    let specs = rows
        .first()
        .and_then(Value::as_object)
        .map(|object| {
            object
                .keys()
                .map(|key| ColumnSpec::new(key.clone()).sortable().filterable())
                .collect()
        })
        .unwrap_or_default();
    ColumnSet::new(specs)
}
