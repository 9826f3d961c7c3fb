//! Page slicing and pagination state.

use crate::model::ColumnError;
use std::ops::Range;

/// Current page and the totals it was clamped against.
///
/// # Invariants
/// - `page_size >= 1`
/// - `total_pages == ceil(total_items / page_size)`
/// - `page <= max(total_pages, 1) - 1`, re-established whenever
///   `total_items` or `page_size` changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    page: usize,
    page_size: usize,
    total_items: usize,
    total_pages: usize,
}

impl PaginationState {
    /// First page of an empty collection.
    ///
    /// # Errors
    ///
    /// [`ColumnError::ZeroPageSize`] when `page_size` is zero.
    pub fn new(page_size: usize) -> Result<Self, ColumnError> {
        if page_size == 0 {
            return Err(ColumnError::ZeroPageSize);
        }
        Ok(Self {
            page: 0,
            page_size,
            total_items: 0,
            total_pages: 0,
        })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Move to `page`, clamped to the last page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.clamp();
    }

    /// Advance one page; stays put on the last page.
    pub fn next_page(&mut self) {
        self.set_page(self.page.saturating_add(1));
    }

    /// Go back one page; stays put on the first page.
    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    /// Change the page size, re-clamping the current page.
    ///
    /// # Errors
    ///
    /// [`ColumnError::ZeroPageSize`] when `page_size` is zero; the state is
    /// left unchanged.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), ColumnError> {
        if page_size == 0 {
            return Err(ColumnError::ZeroPageSize);
        }
        self.page_size = page_size;
        self.clamp();
        Ok(())
    }

    /// Record the number of items being paged, re-clamping the current page.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.clamp();
    }

    /// Index range of the current page within the paged items.
    pub fn range(&self) -> Range<usize> {
        page_range(self.total_items, self.page, self.page_size)
    }

    fn clamp(&mut self) {
        self.total_pages = total_pages(self.total_items, self.page_size);
        self.page = self.page.min(self.total_pages.saturating_sub(1));
    }
}

/// `ceil(total_items / page_size)`.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1))
}

/// Index range of `page` over `len` items, clamped to `len`.
pub fn page_range(len: usize, page: usize, page_size: usize) -> Range<usize> {
    let start = page.saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}

/// Slice of `items` shown on `page`.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    &items[page_range(items.len(), page, page_size)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_page_size_is_rejected() {
        assert_eq!(PaginationState::new(0), Err(ColumnError::ZeroPageSize));

        let mut state = PaginationState::new(10).unwrap();
        assert_eq!(state.set_page_size(0), Err(ColumnError::ZeroPageSize));
        assert_eq!(state.page_size(), 10);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(1, 10), 1);
    }

    #[test]
    fn page_clamps_when_total_shrinks() {
        let mut state = PaginationState::new(10).unwrap();
        state.set_total_items(95);
        state.set_page(9);
        assert_eq!(state.page(), 9);

        state.set_total_items(25);
        assert_eq!(state.total_pages(), 3);
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn page_clamps_when_page_size_grows() {
        let mut state = PaginationState::new(10).unwrap();
        state.set_total_items(50);
        state.set_page(4);

        state.set_page_size(25).unwrap();
        assert_eq!(state.total_pages(), 2);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn empty_collection_stays_on_page_zero() {
        let mut state = PaginationState::new(10).unwrap();
        state.set_page(3);
        assert_eq!(state.page(), 0);
        assert_eq!(state.total_pages(), 0);
        assert_eq!(state.range(), 0..0);
    }

    #[test]
    fn next_and_prev_stop_at_bounds() {
        let mut state = PaginationState::new(2).unwrap();
        state.set_total_items(5);

        state.prev_page();
        assert_eq!(state.page(), 0);

        state.next_page();
        state.next_page();
        state.next_page();
        assert_eq!(state.page(), 2);
        assert!(!state.has_next());
        assert!(state.has_prev());
    }

    #[test]
    fn last_page_is_partial() {
        let items: Vec<u32> = (0..7).collect();
        assert_eq!(paginate(&items, 0, 3), &[0, 1, 2]);
        assert_eq!(paginate(&items, 2, 3), &[6]);
        assert!(paginate(&items, 5, 3).is_empty());
    }
}
