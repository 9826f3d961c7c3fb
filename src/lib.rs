//! gridline
//!
//! Headless engine behind an interactive data grid: filters, sorts and pages
//! an in-memory row collection, tracks selection, computes the virtual
//! window of rows to render, and drives keyboard focus across cells.
//!
//! Everything here is pure state plus a [`viewport::Viewport`] capability
//! for the side effects a host UI must perform. Rendering is left to the
//! host.
//!
//! Keyboard input enters through [`config::KeyBindings`]: the host resolves
//! each terminal key event to a [`GridAction`] and passes it to
//! [`Table::on_key`] along with its viewport.

pub mod config;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod records;
pub mod state;
pub mod view_state;
pub mod viewport;

pub use model::{CellValue, ColumnSet, ColumnSpec, GridAction, GridError, Record, RowId};
pub use state::{Table, TableOptions};
