//! SizeIndex - O(log n) prefix sums over item sizes via Fenwick tree
//!
//! Backs the virtual window: item start offsets, total content size, and
//! offset → index lookup.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `end_of` / `start_of`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `size_of`: O(1)
//! - `total`: O(log n)
//! - construction: O(n log n)

/// Item sizes plus a Fenwick tree of their prefix sums.
///
/// The tree is always allocated to exactly `len` slots, so every node
/// covers a range that exists.
#[derive(Debug, Clone, Default)]
pub struct SizeIndex {
    /// Fenwick tree backing storage (0-indexed API over the `fenwick` crate).
    tree: Vec<isize>,
    /// Current size of each item, for O(1) lookups and delta computation.
    sizes: Vec<usize>,
}

impl SizeIndex {
    /// Build an index from explicit sizes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gridline::view_state::size_index::SizeIndex;
    /// let index = SizeIndex::from_sizes(vec![10, 20, 15]);
    /// assert_eq!(index.len(), 3);
    /// assert_eq!(index.total(), 45);
    /// ```
    pub fn from_sizes(sizes: Vec<usize>) -> Self {
        let mut tree = vec![0; sizes.len()];
        for (i, &size) in sizes.iter().enumerate() {
            if size != 0 {
                fenwick::array::update(&mut tree, i, size as isize);
            }
        }
        Self { tree, sizes }
    }

    /// `len` items of the same size.
    pub fn uniform(len: usize, size: usize) -> Self {
        Self::from_sizes(vec![size; len])
    }

    /// Sets the size at the given index.
    ///
    /// Returns `true` when the size changed.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gridline::view_state::size_index::SizeIndex;
    /// let mut index = SizeIndex::uniform(3, 5);
    /// index.set(0, 10);
    /// assert_eq!(index.end_of(0), 10);
    /// assert_eq!(index.start_of(1), 10);
    /// ```
    pub fn set(&mut self, index: usize, size: usize) -> bool {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let delta = size as isize - self.sizes[index] as isize;
        if delta == 0 {
            return false;
        }
        self.sizes[index] = size;
        fenwick::array::update(&mut self.tree, index, delta);
        true
    }

    /// Size of the item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn size_of(&self, index: usize) -> usize {
        self.sizes[index]
    }

    /// Cumulative size up to and including `index`, i.e. the item's end.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn end_of(&self, index: usize) -> usize {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        fenwick::array::prefix_sum(&self.tree, index).max(0) as usize
    }

    /// Offset of the item's leading edge.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn start_of(&self, index: usize) -> usize {
        self.end_of(index) - self.sizes[index]
    }

    /// Binary search for the first index whose end lies past `offset`.
    ///
    /// That is the item containing `offset`, with item `i` covering
    /// `[start_of(i), end_of(i))`.
    ///
    /// # Returns
    ///
    /// - `Some(index)` if there exists an index where `end_of(index) > offset`
    /// - `None` if `offset >= total()` or the index is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use gridline::view_state::size_index::SizeIndex;
    /// let index = SizeIndex::from_sizes(vec![10, 20, 15]);
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(45), None);
    /// ```
    pub fn lower_bound(&self, offset: usize) -> Option<usize> {
        let mut left = 0;
        let mut right = self.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.end_of(mid) > offset {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    /// Total size of all items.
    pub fn total(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.end_of(self.len() - 1)
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_index() {
        let index = SizeIndex::default();
        assert_eq!(index.len(), 0);
        assert_eq!(index.total(), 0);
        assert_eq!(index.lower_bound(0), None);
    }

    #[test]
    fn uniform_sizes_have_linear_offsets() {
        let index = SizeIndex::uniform(100, 20);
        assert_eq!(index.start_of(10), 200);
        assert_eq!(index.end_of(10), 220);
        assert_eq!(index.total(), 2000);
    }

    #[test]
    fn set_shifts_later_offsets_only() {
        let mut index = SizeIndex::uniform(5, 10);
        assert!(index.set(2, 25));

        assert_eq!(index.start_of(1), 10);
        assert_eq!(index.start_of(2), 20);
        assert_eq!(index.start_of(3), 45);
        assert_eq!(index.start_of(4), 55);
        assert_eq!(index.total(), 65);
    }

    #[test]
    fn set_to_same_size_reports_unchanged() {
        let mut index = SizeIndex::uniform(3, 10);
        assert!(!index.set(1, 10));
    }

    #[test]
    fn lower_bound_edges() {
        let index = SizeIndex::uniform(3, 5);
        assert_eq!(index.lower_bound(0), Some(0));
        assert_eq!(index.lower_bound(4), Some(0));
        assert_eq!(index.lower_bound(5), Some(1));
        assert_eq!(index.lower_bound(14), Some(2));
        assert_eq!(index.lower_bound(15), None);
    }

    #[test]
    #[should_panic]
    fn set_out_of_bounds_panics() {
        let mut index = SizeIndex::uniform(3, 5);
        index.set(3, 1);
    }

    proptest! {
        /// end_of(i) == sum(sizes[0..=i])
        #[test]
        fn prop_end_is_cumulative(sizes in prop::collection::vec(0usize..=100, 1..60)) {
            let index = SizeIndex::from_sizes(sizes.clone());
            let mut expected = 0;
            for (i, &size) in sizes.iter().enumerate() {
                expected += size;
                prop_assert_eq!(index.end_of(i), expected);
            }
        }

        /// Items are contiguous: start_of(i + 1) == end_of(i).
        #[test]
        fn prop_items_are_contiguous(sizes in prop::collection::vec(1usize..=100, 2..60)) {
            let index = SizeIndex::from_sizes(sizes);
            for i in 0..index.len() - 1 {
                prop_assert_eq!(index.start_of(i + 1), index.end_of(i));
            }
        }

        /// After set(i, s), size_of(i) == s and total moves by the delta.
        #[test]
        fn prop_set_updates_size_and_total(
            sizes in prop::collection::vec(1usize..=100, 1..60),
            at in 0usize..60,
            new_size in 0usize..=200,
        ) {
            let mut index = SizeIndex::from_sizes(sizes.clone());
            if at < index.len() {
                let before = index.total();
                index.set(at, new_size);
                prop_assert_eq!(index.size_of(at), new_size);
                prop_assert_eq!(index.end_of(at) - index.start_of(at), new_size);
                prop_assert_eq!(index.total() + sizes[at], before + new_size);
            }
        }

        /// lower_bound(offset) is the item whose span contains offset.
        #[test]
        fn prop_lower_bound_contains_offset(
            sizes in prop::collection::vec(1usize..=50, 1..60),
            offset in 0usize..3000,
        ) {
            let index = SizeIndex::from_sizes(sizes);
            match index.lower_bound(offset) {
                Some(i) => {
                    prop_assert!(index.start_of(i) <= offset);
                    prop_assert!(offset < index.end_of(i));
                }
                None => prop_assert!(offset >= index.total()),
            }
        }
    }
}
