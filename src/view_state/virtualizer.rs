//! Virtual window calculation.
//!
//! Only the items overlapping the viewport (plus overscan) are materialized,
//! so render cost is O(window) rather than O(count). Item sizes start as an
//! estimate and are replaced by measurements as the UI reports them.

use super::size_index::SizeIndex;
use super::types::{Align, ScrollEvent, VirtualItem, Window};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Authoritative sizes measured by the UI, keyed by item index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeCache {
    measured: HashMap<usize, usize>,
}

impl SizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<usize> {
        self.measured.get(&index).copied()
    }

    /// Record a measurement, returning the previous one.
    pub fn insert(&mut self, index: usize, size: usize) -> Option<usize> {
        self.measured.insert(index, size)
    }

    /// Forget measurements at or past `count`.
    pub fn truncate(&mut self, count: usize) {
        self.measured.retain(|&index, _| index < count);
    }

    pub fn clear(&mut self) {
        self.measured.clear();
    }

    pub fn len(&self) -> usize {
        self.measured.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measured.is_empty()
    }

    /// Size of every item in `0..count`, measured or estimated.
    fn sizes(&self, count: usize, estimate_size: usize) -> Vec<usize> {
        (0..count)
            .map(|index| self.get(index).unwrap_or(estimate_size))
            .collect()
    }
}

/// Compute the virtual window from scratch.
///
/// Item `i` has size `cache.get(i)` or `estimate_size`. The visible span is
/// every item with `start < scroll_offset + container_extent` and
/// `end > scroll_offset`, widened by `overscan` on each side and clamped to
/// `[0, count - 1]`.
///
/// # Examples
///
/// ```
/// # use gridline::view_state::virtualizer::{compute_window, SizeCache};
/// let window = compute_window(100, 20, 100, 205, 2, &SizeCache::new());
/// assert_eq!(window.total_size, 2000);
/// assert_eq!(window.index_range(), Some((8, 17)));
/// ```
pub fn compute_window(
    count: usize,
    estimate_size: usize,
    container_extent: usize,
    scroll_offset: usize,
    overscan: usize,
    cache: &SizeCache,
) -> Window {
    let index = SizeIndex::from_sizes(cache.sizes(count, estimate_size));
    window_from_index(&index, container_extent, scroll_offset, overscan)
}

/// Window over an existing size index.
///
/// `scroll_offset` is first clamped to `[0, max(0, total - container_extent)]`
/// so over-scrolling still shows the last items.
pub fn window_from_index(
    index: &SizeIndex,
    container_extent: usize,
    scroll_offset: usize,
    overscan: usize,
) -> Window {
    let total_size = index.total();
    let count = index.len();
    if count == 0 {
        return Window {
            items: Vec::new(),
            total_size,
        };
    }

    let last_index = count - 1;
    let offset = scroll_offset.min(total_size.saturating_sub(container_extent));
    let viewport_end = offset + container_extent;

    let first = index.lower_bound(offset).unwrap_or(last_index);
    let last = if container_extent == 0 {
        first
    } else {
        // First item reaching the viewport end is the last one starting before it.
        index
            .lower_bound(viewport_end - 1)
            .unwrap_or(last_index)
            .max(first)
    };

    let start = first.saturating_sub(overscan);
    let end = last.saturating_add(overscan).min(last_index);

    let items = (start..=end)
        .map(|i| VirtualItem::new(i, index.start_of(i), index.size_of(i)))
        .collect();

    Window { items, total_size }
}

/// Scroll offset that brings item `index` into view with `align`.
///
/// Out-of-range indices clamp to the last item. Returns `None` for an empty
/// index, or for [`Align::Auto`] when the item is already fully visible.
/// Results never go below zero.
pub fn scroll_target(
    sizes: &SizeIndex,
    index: usize,
    align: Align,
    container_extent: usize,
    current_offset: usize,
) -> Option<usize> {
    if sizes.is_empty() {
        return None;
    }
    let index = index.min(sizes.len() - 1);

    let start = sizes.start_of(index) as i64;
    let size = sizes.size_of(index) as i64;
    let extent = container_extent as i64;
    let current = current_offset as i64;

    let target = match align {
        Align::Start => start,
        Align::End => start - (extent - size),
        Align::Center => start - (extent - size) / 2,
        Align::Auto => {
            if start >= current && start + size <= current + extent {
                return None;
            }
            if start < current {
                start
            } else {
                start + size - extent
            }
        }
    };

    Some(target.max(0) as usize)
}

/// Geometry inputs of a [`Virtualizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualizerOptions {
    /// Number of logical items.
    pub count: usize,
    /// Size assumed for items that have not been measured.
    pub estimate_size: usize,
    /// Viewport extent along the scroll axis.
    pub container_extent: usize,
    /// Extra items materialized on each side of the visible span.
    pub overscan: usize,
}

impl Default for VirtualizerOptions {
    fn default() -> Self {
        Self {
            count: 0,
            estimate_size: 1,
            container_extent: 0,
            overscan: 5,
        }
    }
}

/// Stateful windower: owns the measurement cache and the scroll offset.
///
/// The cache is the only writer-owned state here; the size index is kept in
/// step with it and rebuilt whenever `count` or the estimate changes.
#[derive(Debug, Clone)]
pub struct Virtualizer {
    options: VirtualizerOptions,
    cache: SizeCache,
    sizes: SizeIndex,
    scroll_offset: usize,
    last_scroll_seq: Option<u64>,
}

impl Virtualizer {
    pub fn new(options: VirtualizerOptions) -> Self {
        let cache = SizeCache::new();
        let sizes = SizeIndex::from_sizes(cache.sizes(options.count, options.estimate_size));
        Self {
            options,
            cache,
            sizes,
            scroll_offset: 0,
            last_scroll_seq: None,
        }
    }

    pub fn options(&self) -> &VirtualizerOptions {
        &self.options
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn total_size(&self) -> usize {
        self.sizes.total()
    }

    pub fn cache(&self) -> &SizeCache {
        &self.cache
    }

    /// Change the number of items, dropping measurements past the new end.
    pub fn set_count(&mut self, count: usize) {
        if count == self.options.count {
            return;
        }
        self.options.count = count;
        self.cache.truncate(count);
        self.rebuild();
    }

    pub fn set_estimate_size(&mut self, estimate_size: usize) {
        if estimate_size == self.options.estimate_size {
            return;
        }
        self.options.estimate_size = estimate_size;
        self.rebuild();
    }

    pub fn set_container_extent(&mut self, container_extent: usize) {
        self.options.container_extent = container_extent;
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
    }

    /// Forget all measurements (e.g. after the rows behind the indices change).
    pub fn reset_measurements(&mut self) {
        self.cache.clear();
        self.rebuild();
    }

    /// Record the measured size of item `index`.
    ///
    /// Every later window reflects the measurement. Returns `false` when the
    /// index is out of range (ignored) or the size did not change.
    pub fn measure(&mut self, index: usize, size: usize) -> bool {
        if index >= self.options.count {
            warn!(index, count = self.options.count, "Ignoring measurement past item count");
            return false;
        }
        self.cache.insert(index, size);
        self.sizes.set(index, size)
    }

    /// Apply a scroll offset delivered by the UI.
    ///
    /// Events older than the last applied one are dropped so the latest
    /// delivered offset always wins. Returns whether the event was applied.
    pub fn on_scroll(&mut self, event: ScrollEvent) -> bool {
        if self.last_scroll_seq.is_some_and(|seq| event.seq < seq) {
            debug!(seq = event.seq, offset = event.offset, "Dropping stale scroll event");
            return false;
        }
        self.last_scroll_seq = Some(event.seq);
        self.scroll_offset = event.offset;
        true
    }

    /// Scroll so item `index` lands per `align`.
    ///
    /// Returns the new offset, or `None` when nothing moved.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> Option<usize> {
        let target = scroll_target(
            &self.sizes,
            index,
            align,
            self.options.container_extent,
            self.scroll_offset,
        )?;
        if target == self.scroll_offset {
            return None;
        }
        self.scroll_offset = target;
        Some(target)
    }

    /// Items to materialize at the current scroll offset.
    pub fn window(&self) -> Window {
        window_from_index(
            &self.sizes,
            self.options.container_extent,
            self.scroll_offset,
            self.options.overscan,
        )
    }

    /// Layout of a single item, if in range.
    pub fn item(&self, index: usize) -> Option<VirtualItem> {
        (index < self.sizes.len())
            .then(|| VirtualItem::new(index, self.sizes.start_of(index), self.sizes.size_of(index)))
    }

    fn rebuild(&mut self) {
        self.sizes = SizeIndex::from_sizes(
            self.cache
                .sizes(self.options.count, self.options.estimate_size),
        );
    }
}

#[cfg(test)]
#[path = "virtualizer_tests.rs"]
mod tests;
