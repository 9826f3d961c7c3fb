//! Core identifier newtypes with smart constructors.
//!
//! Column keys validate non-empty strings at construction time.
//! Row identifiers are either textual or numeric, mirroring the shapes an
//! `id` field usually takes.

use std::fmt;

/// Key naming a column. Unique within a [`ColumnSet`](super::column::ColumnSet).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey(String);

/// Error returned when a column key is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("column key must not be empty")]
pub struct InvalidColumnKey;

impl ColumnKey {
    /// Smart constructor: validates a non-empty key.
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidColumnKey> {
        let raw = raw.into();
        if raw.is_empty() {
            Err(InvalidColumnKey)
        } else {
            Ok(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ColumnKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stable key tracking a logical row independent of its position.
///
/// Selection is keyed by `RowId`, so it survives re-sorting and re-filtering
/// as long as the row's identity does not change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowId {
    /// Numeric identifier (also used for the positional fallback).
    Number(i64),
    /// Textual identifier.
    Text(String),
}

impl RowId {
    /// Positional fallback identifier for a source index.
    pub fn positional(index: usize) -> Self {
        Self::Number(index as i64)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RowId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RowId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl std::str::FromStr for RowId {
    type Err = std::convert::Infallible;

    /// Integers parse as [`RowId::Number`], everything else as text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(Self::Number)
            .unwrap_or_else(|_| Self::Text(s.to_string())))
    }
}
