//! View-state layer - virtual windowing over the displayed rows
//!
//! Computes which display rows must be materialized for a given scroll
//! offset and per-row size model, and where to scroll to reveal a row.
//!
//! # Module Structure
//!
//! - `types`: VirtualItem, Window, Align, ScrollEvent
//! - `size_index`: SizeIndex - O(log n) prefix sums via Fenwick tree
//! - `virtualizer`: compute_window, scroll_target, and the stateful Virtualizer

pub mod size_index;
pub mod types;
pub mod virtualizer;

pub use size_index::SizeIndex;
pub use types::{Align, ScrollEvent, VirtualItem, Window};
pub use virtualizer::{
    compute_window, scroll_target, window_from_index, SizeCache, Virtualizer, VirtualizerOptions,
};
