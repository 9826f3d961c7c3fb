//! Domain model types (pure).
//!
//! Cell values, column configuration, identifiers, user actions and the
//! error taxonomy shared by every other module.

pub mod column;
pub mod error;
pub mod identifiers;
pub mod key_action;
pub mod value;

// Re-export for convenience
pub use column::{AccessorFn, Column, ColumnAccess, ColumnSet, ColumnSpec, ComparatorFn, Record};
pub use error::{ActionError, ColumnError, GridError, PipelineError};
pub use identifiers::{ColumnKey, InvalidColumnKey, RowId};
pub use key_action::GridAction;
pub use value::{collate, CellValue};
