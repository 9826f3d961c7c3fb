//! Query pipeline: filter → sort → paginate.
//!
//! Pure functions over an immutable row slice. Nothing here mutates rows or
//! keeps state between runs; the [`Table`](crate::state::Table) re-runs the
//! whole pipeline whenever one of its inputs changes.

pub mod filter;
pub mod paginate;
pub mod sort;

pub use filter::{filter_rows, matches, FilterState};
pub use paginate::{page_range, paginate, total_pages, PaginationState};
pub use sort::{sort_rows, SortDirection, SortState};

use crate::model::{ColumnSet, PipelineError, Record};
use tracing::debug;

/// A borrowed row together with its position in the source collection.
#[derive(Debug)]
pub struct IndexedRow<'a, T> {
    /// Index of the row in the input slice.
    pub index: usize,
    pub row: &'a T,
}

impl<T> Clone for IndexedRow<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for IndexedRow<'_, T> {}

impl<'a, T> IndexedRow<'a, T> {
    /// Pair every row of `rows` with its index.
    pub fn enumerate(rows: &'a [T]) -> Vec<Self> {
        rows.iter()
            .enumerate()
            .map(|(index, row)| Self { index, row })
            .collect()
    }
}

/// Result of a pipeline run.
#[derive(Debug)]
pub struct QueryOutput<'a, T> {
    /// Rows to display: the current page, or every filtered row when
    /// pagination is off.
    pub rows: Vec<IndexedRow<'a, T>>,
    /// Number of rows after filtering.
    pub total_items: usize,
    /// Page count; 1 for a non-empty unpaginated view.
    pub total_pages: usize,
    /// The pagination state clamped against `total_items`.
    pub pagination: Option<PaginationState>,
}

/// Filter, sort and paginate `rows`.
///
/// # Errors
///
/// Propagates the first accessor or comparator failure.
pub fn process<'a, T: Record>(
    rows: &'a [T],
    filters: &FilterState,
    sort: &SortState,
    columns: &ColumnSet<T>,
    page: Option<&PaginationState>,
) -> Result<QueryOutput<'a, T>, PipelineError> {
    let mut view = filter_rows(IndexedRow::enumerate(rows), filters, columns)?;
    sort_rows(&mut view, sort, columns)?;

    let total_items = view.len();
    let (rows_out, total_pages, pagination) = match page {
        Some(page) => {
            let mut page = *page;
            page.set_total_items(total_items);
            let slice = paginate(&view, page.page(), page.page_size()).to_vec();
            (slice, page.total_pages(), Some(page))
        }
        None => (view, usize::from(total_items > 0), None),
    };

    debug!(
        input = rows.len(),
        filtered = total_items,
        displayed = rows_out.len(),
        total_pages,
        "Pipeline derived view"
    );

    Ok(QueryOutput {
        rows: rows_out,
        total_items,
        total_pages,
        pagination,
    })
}
