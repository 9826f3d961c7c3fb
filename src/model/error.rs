//! Error types for the grid engine.
//!
//! This module defines a hierarchical error taxonomy using `thiserror`. Errors
//! compose via `?` and `From` conversions into [`GridError`].
//!
//! # Error Hierarchy
//!
//! - [`GridError`] - Top-level error wrapping every failure the engine reports
//!   - [`ColumnError`] - Configuration mistakes (bad column set, sorting or
//!     filtering a column that does not allow it, zero page size)
//!   - [`PipelineError`] - A column accessor or comparator failed while
//!     deriving the view
//!   - [`ActionError`] - A bulk action collaborator failed
//!
//! # Recovery Strategy
//!
//! - **Configuration errors** are raised immediately at setup or when the
//!   offending operation is requested; state is left unchanged.
//! - **Pipeline errors** propagate uncaught to the caller. A broken
//!   comparator silently corrupts ordering otherwise, so nothing is coerced.
//! - **Bound errors** (navigation or windowing outside `[0, count-1]`) are
//!   clamped and never reported.
//! - **Action errors** are caught at the table boundary, logged, and returned;
//!   selection and focus are untouched.

use super::identifiers::ColumnKey;
use thiserror::Error;

/// Top-level error encompassing all failure modes of the engine.
#[derive(Debug, Error)]
pub enum GridError {
    /// Column or table configuration is invalid.
    #[error("Configuration error: {0}")]
    Column(#[from] ColumnError),

    /// Deriving the view failed inside a column accessor or comparator.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// A bulk action over the selection failed.
    #[error("Bulk action error: {0}")]
    Action(#[from] ActionError),

    /// Reading row data failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Row data was not a JSON array of objects.
    #[error("Invalid row data: {0}")]
    Data(#[from] serde_json::Error),
}

/// Configuration errors, surfaced at setup time.
///
/// # Examples
///
/// ```
/// use gridline::model::error::ColumnError;
///
/// let err = ColumnError::DuplicateKey { key: "name".to_string() };
/// assert!(err.to_string().contains("name"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
    /// A column was declared with an empty key.
    #[error("Column key must not be empty")]
    MissingKey,

    /// Two columns in the same set share a key.
    #[error("Duplicate column key: {key}")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    /// An operation named a column that is not in the column set.
    #[error("Unknown column: {key}")]
    UnknownColumn {
        /// The key that was not found.
        key: String,
    },

    /// Sorting was requested on a column that is not sortable.
    #[error("Column {key} is not sortable")]
    NotSortable {
        /// The offending column.
        key: ColumnKey,
    },

    /// Filtering was requested on a column that is not filterable.
    #[error("Column {key} is not filterable")]
    NotFilterable {
        /// The offending column.
        key: ColumnKey,
    },

    /// Pagination was configured with a page size of zero.
    #[error("Page size must be at least 1")]
    ZeroPageSize,
}

/// Failures raised by user-supplied column functions during derivation.
///
/// Both variants are attributed to the column whose function failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A column accessor failed to produce a value.
    #[error("Accessor for column {column} failed: {reason}")]
    Accessor {
        /// Column whose accessor failed.
        column: ColumnKey,
        /// Message reported by the accessor.
        reason: String,
    },

    /// A custom sort comparator failed.
    #[error("Comparator for column {column} failed: {reason}")]
    Comparator {
        /// Column whose comparator failed.
        column: ColumnKey,
        /// Message reported by the comparator.
        reason: String,
    },
}

/// Failures of bulk actions run over the selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The action ran and reported a failure.
    #[error("Action {action} failed: {reason}")]
    Failed {
        /// Label of the failed action.
        action: String,
        /// Message reported by the action.
        reason: String,
    },

    /// Another action is still executing.
    #[error("Action {action} is already executing")]
    AlreadyExecuting {
        /// Label of the action currently executing.
        action: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_error_converts_into_grid_error() {
        fn fails() -> Result<(), GridError> {
            Err(ColumnError::ZeroPageSize)?;
            Ok(())
        }

        let err = fails().unwrap_err();
        assert!(matches!(err, GridError::Column(ColumnError::ZeroPageSize)));
        assert!(err.to_string().contains("Page size"));
    }

    #[test]
    fn pipeline_error_names_the_column() {
        let err = PipelineError::Comparator {
            column: ColumnKey::new("price").unwrap(),
            reason: "boom".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("price"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn action_error_names_the_action() {
        let err = ActionError::Failed {
            action: "archive".to_string(),
            reason: "offline".to_string(),
        };
        assert_eq!(err.to_string(), "Action archive failed: offline");
    }
}
