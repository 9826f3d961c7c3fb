//! Core virtualization types

/// One materialized item of the virtual window.
///
/// `end == start + size`, and the `start` of item `i + 1` equals the `end` of
/// item `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualItem {
    /// Logical index of the item (display row).
    pub index: usize,
    /// Offset of the item's leading edge from the top of the content.
    pub start: usize,
    /// Item extent along the scroll axis.
    pub size: usize,
    /// `start + size`.
    pub end: usize,
}

impl VirtualItem {
    pub fn new(index: usize, start: usize, size: usize) -> Self {
        Self {
            index,
            start,
            size,
            end: start + size,
        }
    }
}

/// The items that must be materialized plus the full content extent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Window {
    /// Visible items expanded by overscan, in index order.
    pub items: Vec<VirtualItem>,
    /// Sum of every item's size, visible or not.
    pub total_size: usize,
}

impl Window {
    /// Index range covered by the window, as `first..=last`.
    pub fn index_range(&self) -> Option<(usize, usize)> {
        Some((self.items.first()?.index, self.items.last()?.index))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Where a scrolled-to item should land in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Item's start at the viewport's start.
    Start,
    /// Item centered in the viewport.
    Center,
    /// Item's end at the viewport's end.
    End,
    /// Scroll the minimal distance, or not at all if already fully visible.
    #[default]
    Auto,
}

/// A scroll offset delivered by the UI layer.
///
/// `seq` increases with every delivery; an event older than the last one
/// applied is stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent {
    pub seq: u64,
    pub offset: usize,
}

impl ScrollEvent {
    pub fn new(seq: u64, offset: usize) -> Self {
        Self { seq, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_item_end_is_start_plus_size() {
        let item = VirtualItem::new(3, 60, 20);
        assert_eq!(item.end, 80);
    }

    #[test]
    fn index_range_of_empty_window_is_none() {
        assert_eq!(Window::default().index_range(), None);
    }

    #[test]
    fn index_range_spans_first_to_last() {
        let window = Window {
            items: vec![VirtualItem::new(4, 0, 10), VirtualItem::new(5, 10, 10)],
            total_size: 100,
        };
        assert_eq!(window.index_range(), Some((4, 5)));
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn default_align_is_auto() {
        assert_eq!(Align::default(), Align::Auto);
    }
}
