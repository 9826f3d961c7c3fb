//! Stable row sorting and the sort state machine.

use super::IndexedRow;
use crate::model::{CellValue, ColumnKey, ColumnSet, PipelineError, Record};
use std::cmp::Ordering;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Orient an ascending ordering for this direction.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Current sort column and direction.
///
/// Both `None` is the unsorted state, which passes rows through in input
/// order. Toggling one column cycles `none → asc → desc → none`; toggling a
/// different column starts over at `asc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    column: Option<ColumnKey>,
    direction: Option<SortDirection>,
}

impl SortState {
    /// The unsorted state.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ascending(column: ColumnKey) -> Self {
        Self {
            column: Some(column),
            direction: Some(SortDirection::Asc),
        }
    }

    pub fn descending(column: ColumnKey) -> Self {
        Self {
            column: Some(column),
            direction: Some(SortDirection::Desc),
        }
    }

    pub fn column(&self) -> Option<&ColumnKey> {
        self.column.as_ref()
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.direction
    }

    /// True when rows are actually reordered.
    pub fn is_active(&self) -> bool {
        self.column.is_some() && self.direction.is_some()
    }

    /// Direction shown on the header of `key`, if it is the sort column.
    pub fn direction_for(&self, key: &ColumnKey) -> Option<SortDirection> {
        match &self.column {
            Some(column) if column == key => self.direction,
            _ => None,
        }
    }

    /// Advance the sort cycle for `key`.
    pub fn toggle(&mut self, key: ColumnKey) {
        *self = match (self.column.take(), self.direction) {
            (Some(current), direction) if current == key => match direction {
                None => Self::ascending(key),
                Some(SortDirection::Asc) => Self::descending(key),
                Some(SortDirection::Desc) => Self::none(),
            },
            _ => Self::ascending(key),
        };
    }
}

/// Order two resolved values for `direction`, keeping nulls last.
fn compare_values(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => direction.apply(a.compare(b)),
    }
}

/// True when the non-null `values` span more than one variant.
fn has_mixed_types<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> bool {
    let mut kinds = values
        .into_iter()
        .filter(|value| !value.is_null())
        .map(std::mem::discriminant);
    match kinds.next() {
        Some(first) => kinds.any(|kind| kind != first),
        None => false,
    }
}

/// Sort `rows` in place according to `sort`.
///
/// The sort is stable: rows comparing equal keep their relative order from
/// the input. A column comparator takes precedence over value comparison.
/// A column whose values span several types is collated as text.
///
/// # Errors
///
/// The first accessor or comparator failure aborts the sort.
pub fn sort_rows<T: Record>(
    rows: &mut Vec<IndexedRow<'_, T>>,
    sort: &SortState,
    columns: &ColumnSet<T>,
) -> Result<(), PipelineError> {
    let (Some(key), Some(direction)) = (sort.column(), sort.direction()) else {
        return Ok(());
    };

    if let Some(column) = columns.get(key.as_str()).filter(|c| c.comparator().is_some()) {
        return try_sort_by(rows, |a, b| match column.compare_rows(a.row, b.row) {
            Some(result) => result.map(|ordering| direction.apply(ordering)),
            None => Ok(Ordering::Equal),
        });
    }

    // Decorate once so accessors run n times, not n log n.
    let mut decorated = rows
        .iter()
        .map(|row| columns.value_of(key, row.row).map(|value| (value, *row)))
        .collect::<Result<Vec<_>, PipelineError>>()?;
    if has_mixed_types(decorated.iter().map(|(value, _)| value)) {
        // Collate the whole column as text; a per-pair fallback is not transitive.
        for (value, _) in &mut decorated {
            if !value.is_null() {
                *value = CellValue::Text(value.to_string());
            }
        }
    }
    decorated.sort_by(|(a, _), (b, _)| compare_values(a, b, direction));
    for (slot, (_, row)) in rows.iter_mut().zip(decorated) {
        *slot = row;
    }

    Ok(())
}

/// Stable bottom-up merge sort over a fallible comparator.
///
/// The first error aborts the sort and leaves `items` untouched. An
/// inconsistent comparator yields some permutation of `items`.
fn try_sort_by<T: Copy, E>(
    items: &mut [T],
    mut compare: impl FnMut(&T, &T) -> Result<Ordering, E>,
) -> Result<(), E> {
    let len = items.len();
    let mut src = items.to_vec();
    let mut dst = Vec::with_capacity(len);
    let mut width = 1;

    while width < len {
        dst.clear();
        for lo in (0..len).step_by(2 * width) {
            let mid = (lo + width).min(len);
            let hi = (lo + 2 * width).min(len);
            let (mut i, mut j) = (lo, mid);
            while i < mid && j < hi {
                // Ties take from the left run.
                if compare(&src[j], &src[i])? == Ordering::Less {
                    dst.push(src[j]);
                    j += 1;
                } else {
                    dst.push(src[i]);
                    i += 1;
                }
            }
            dst.extend_from_slice(&src[i..mid]);
            dst.extend_from_slice(&src[j..hi]);
        }
        std::mem::swap(&mut src, &mut dst);
        width *= 2;
    }

    items.copy_from_slice(&src);
    Ok(())
}

#[cfg(test)]
#[path = "sort_tests.rs"]
mod tests;
