//! Tests for sorting and the sort cycle.

use super::*;
use crate::model::{collate, ColumnSpec};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

// ===== Test Helpers =====

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: i64,
    name: Option<&'static str>,
}

impl Record for Item {
    fn field(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "name" => self.name.into(),
            _ => CellValue::Null,
        }
    }
}

fn item(id: i64, name: &'static str) -> Item {
    Item {
        id,
        name: Some(name),
    }
}

fn key(s: &str) -> ColumnKey {
    ColumnKey::new(s).expect("valid key")
}

fn columns() -> ColumnSet<Item> {
    ColumnSet::new(vec![
        ColumnSpec::new("id").sortable(),
        ColumnSpec::new("name").sortable(),
    ])
    .expect("valid columns")
}

fn sorted_ids(data: &[Item], sort: &SortState, columns: &ColumnSet<Item>) -> Vec<i64> {
    let mut rows = IndexedRow::enumerate(data);
    sort_rows(&mut rows, sort, columns).expect("sort succeeds");
    rows.iter().map(|r| r.row.id).collect()
}

// ===== SortState cycle =====

#[test]
fn toggle_cycles_none_asc_desc_none() {
    let mut state = SortState::none();

    state.toggle(key("name"));
    assert_eq!(state, SortState::ascending(key("name")));

    state.toggle(key("name"));
    assert_eq!(state, SortState::descending(key("name")));

    state.toggle(key("name"));
    assert_eq!(state, SortState::none());
    assert!(!state.is_active());
}

#[test]
fn toggle_other_column_resets_to_ascending() {
    let mut state = SortState::descending(key("name"));
    state.toggle(key("id"));
    assert_eq!(state, SortState::ascending(key("id")));
}

#[test]
fn direction_for_only_reports_sort_column() {
    let state = SortState::descending(key("name"));
    assert_eq!(state.direction_for(&key("name")), Some(SortDirection::Desc));
    assert_eq!(state.direction_for(&key("id")), None);
}

// ===== sort_rows =====

#[test]
fn unsorted_state_is_identity() {
    let data = vec![item(3, "c"), item(1, "a"), item(2, "b")];
    assert_eq!(sorted_ids(&data, &SortState::none(), &columns()), vec![3, 1, 2]);
}

#[test]
fn ascending_sort_is_stable_among_ties() {
    let data = vec![item(1, "b"), item(2, "a"), item(3, "a")];
    let ids = sorted_ids(&data, &SortState::ascending(key("name")), &columns());
    assert_eq!(ids, vec![2, 3, 1]);
}

#[test]
fn descending_sort_keeps_tie_order() {
    let data = vec![item(1, "a"), item(2, "b"), item(3, "a")];
    let ids = sorted_ids(&data, &SortState::descending(key("name")), &columns());
    assert_eq!(ids, vec![2, 1, 3]);
}

#[test]
fn numbers_sort_numerically() {
    let data = vec![item(10, "x"), item(9, "y"), item(100, "z")];
    let ids = sorted_ids(&data, &SortState::ascending(key("id")), &columns());
    assert_eq!(ids, vec![9, 10, 100]);
}

#[test]
fn nulls_sort_last_in_both_directions() {
    let data = vec![
        Item { id: 1, name: None },
        item(2, "b"),
        item(3, "a"),
    ];

    let asc = sorted_ids(&data, &SortState::ascending(key("name")), &columns());
    assert_eq!(asc, vec![3, 2, 1]);

    let desc = sorted_ids(&data, &SortState::descending(key("name")), &columns());
    assert_eq!(desc, vec![2, 3, 1]);
}

#[test]
fn text_sort_is_case_insensitive() {
    let data = vec![item(1, "banana"), item(2, "Apple"), item(3, "cherry")];
    let ids = sorted_ids(&data, &SortState::ascending(key("name")), &columns());
    assert_eq!(ids, vec![2, 1, 3]);
}

#[test]
fn custom_comparator_takes_precedence_and_is_reversed_for_desc() {
    // Sort by name length, ignoring the value comparison entirely.
    let columns = ColumnSet::new(vec![ColumnSpec::<Item>::new("name")
        .sortable()
        .comparator(|a, b| a.name.unwrap_or("").len().cmp(&b.name.unwrap_or("").len()))])
    .unwrap();
    let data = vec![item(1, "ccc"), item(2, "a"), item(3, "bb")];

    assert_eq!(
        sorted_ids(&data, &SortState::ascending(key("name")), &columns),
        vec![2, 3, 1]
    );
    assert_eq!(
        sorted_ids(&data, &SortState::descending(key("name")), &columns),
        vec![1, 3, 2]
    );
}

#[test]
fn failing_comparator_propagates_with_column() {
    let columns = ColumnSet::new(vec![ColumnSpec::<Item>::new("name")
        .sortable()
        .try_comparator(|_, _| Err("cannot compare".to_string()))])
    .unwrap();
    let data = vec![item(1, "a"), item(2, "b")];
    let mut rows = IndexedRow::enumerate(&data);

    let err = sort_rows(&mut rows, &SortState::ascending(key("name")), &columns).unwrap_err();
    assert_eq!(
        err,
        PipelineError::Comparator {
            column: key("name"),
            reason: "cannot compare".to_string(),
        }
    );
}

#[test]
fn failing_accessor_propagates_from_sort() {
    let columns = ColumnSet::new(vec![ColumnSpec::<Item>::new("name")
        .sortable()
        .try_accessor(|row| {
            if row.id == 2 {
                Err("bad row".to_string())
            } else {
                Ok(CellValue::Null)
            }
        })])
    .unwrap();
    let data = vec![item(1, "a"), item(2, "b")];
    let mut rows = IndexedRow::enumerate(&data);

    let err = sort_rows(&mut rows, &SortState::ascending(key("name")), &columns).unwrap_err();
    assert!(matches!(err, PipelineError::Accessor { .. }));
    assert_eq!(rows.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 1]);
}

#[test]
fn comparator_failing_midway_leaves_rows_in_input_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let columns = ColumnSet::new(vec![ColumnSpec::<Item>::new("id")
        .sortable()
        .try_comparator(move |a, b| {
            if counter.fetch_add(1, AtomicOrdering::SeqCst) == 700 {
                return Err("lost connection".to_string());
            }
            Ok(b.id.cmp(&a.id))
        })])
    .unwrap();
    let data: Vec<Item> = (0..500).map(|id| item(id, "x")).collect();
    let mut rows = IndexedRow::enumerate(&data);

    let err = sort_rows(&mut rows, &SortState::ascending(key("id")), &columns).unwrap_err();
    assert_eq!(
        err,
        PipelineError::Comparator {
            column: key("id"),
            reason: "lost connection".to_string(),
        }
    );
    assert_eq!(calls.load(AtomicOrdering::SeqCst), 701);
    assert_eq!(rows.iter().map(|r| r.index).collect::<Vec<_>>(), (0..500).collect::<Vec<_>>());
}

#[test]
fn inconsistent_comparator_still_yields_every_row() {
    let columns = ColumnSet::new(vec![ColumnSpec::<Item>::new("id")
        .sortable()
        .comparator(|a, b| ((a.id * 7 + b.id * 3) % 3).cmp(&1))])
    .unwrap();
    let data: Vec<Item> = (0..300).map(|id| item(id, "x")).collect();

    let mut ids = sorted_ids(&data, &SortState::ascending(key("id")), &columns);
    ids.sort_unstable();
    assert_eq!(ids, (0..300).collect::<Vec<_>>());
}

#[test]
fn large_comparator_sort_is_stable() {
    let columns = ColumnSet::new(vec![ColumnSpec::<Item>::new("id")
        .sortable()
        .comparator(|a, b| (a.id % 10).cmp(&(b.id % 10)))])
    .unwrap();
    let data: Vec<Item> = (0..1000).rev().map(|id| item(id, "x")).collect();

    let ids = sorted_ids(&data, &SortState::descending(key("id")), &columns);
    let mut expected: Vec<i64> = (0..1000).rev().collect();
    expected.sort_by_key(|id| std::cmp::Reverse(id % 10));
    assert_eq!(ids, expected);
}

// ===== Mixed-type columns =====

#[derive(Debug)]
struct Cell(CellValue);

impl Record for Cell {
    fn field(&self, _key: &str) -> CellValue {
        self.0.clone()
    }
}

#[test]
fn mixed_number_and_numeric_text_column_collates_as_text() {
    let data: Vec<Cell> = (0..600i64)
        .map(|i| {
            let n = (i * 7919) % 97;
            match i % 4 {
                0 => Cell(CellValue::from(n)),
                1 => Cell(CellValue::text(format!("{}a", n))),
                2 => Cell(CellValue::text(n.to_string())),
                _ => Cell(CellValue::Null),
            }
        })
        .collect();
    let columns = ColumnSet::new(vec![ColumnSpec::<Cell>::new("value").sortable()]).unwrap();

    for sort in [SortState::ascending(key("value")), SortState::descending(key("value"))] {
        let mut rows = IndexedRow::enumerate(&data);
        sort_rows(&mut rows, &sort, &columns).unwrap();
        assert_eq!(rows.len(), 600);

        let (values, nulls) = rows.split_at(450);
        assert!(nulls.iter().all(|r| r.row.0.is_null()));
        for pair in values.windows(2) {
            let ordering = sort
                .direction()
                .unwrap()
                .apply(collate(&pair[0].row.0.to_string(), &pair[1].row.0.to_string()));
            assert_ne!(ordering, Ordering::Greater, "{:?} then {:?}", pair[0].row, pair[1].row);
            if ordering == Ordering::Equal {
                assert!(pair[0].index < pair[1].index, "tie reordered");
            }
        }
    }
}

#[test]
fn mixed_column_orders_10_before_10a_before_9() {
    let data = vec![
        Cell(CellValue::from(9)),
        Cell(CellValue::text("10a")),
        Cell(CellValue::from(10)),
    ];
    let columns = ColumnSet::new(vec![ColumnSpec::<Cell>::new("value").sortable()]).unwrap();
    let mut rows = IndexedRow::enumerate(&data);
    sort_rows(&mut rows, &SortState::ascending(key("value")), &columns).unwrap();
    assert_eq!(rows.iter().map(|r| r.index).collect::<Vec<_>>(), vec![2, 1, 0]);
}

#[test]
fn single_type_column_keeps_typed_comparison() {
    assert!(!has_mixed_types(&[CellValue::from(9), CellValue::Null, CellValue::from(10)]));
    assert!(has_mixed_types(&[CellValue::from(9), CellValue::text("9")]));
    let empty: [CellValue; 0] = [];
    assert!(!has_mixed_types(&empty));
}
