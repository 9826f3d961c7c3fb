//! Grid state (pure).
//!
//! Selection, keyboard focus and bulk actions, plus the [`Table`] that
//! composes them with the query pipeline and the virtual window. No state
//! here touches a UI toolkit; side effects go through
//! [`Viewport`](crate::viewport::Viewport).

pub mod bulk_action;
pub mod focus;
pub mod selection;
pub mod table;

// Re-export for convenience
pub use bulk_action::{ActionTicket, BulkAction, BulkActionState, FnAction};
pub use focus::{FocusNavigator, FocusPosition, NavEvent, DEFAULT_PAGE_JUMP};
pub use selection::{SelectionAction, SelectionState, SelectionSummary};
pub use table::{
    resolve_row_id, DisplayRow, RowKeyFn, Table, TableOptions, DEFAULT_CONTAINER_EXTENT,
    DEFAULT_ESTIMATE_ROW_SIZE, DEFAULT_OVERSCAN, DEFAULT_PAGE_SIZE,
};
