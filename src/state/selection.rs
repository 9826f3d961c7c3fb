//! Row selection keyed by [`RowId`].
//!
//! The selected set is the only selection state that persists across view
//! derivations. It is mutated exclusively through [`SelectionState::apply`];
//! everything else (all-selected, indeterminate) is derived against the
//! visible key list on demand.

use crate::model::RowId;
use std::collections::BTreeSet;

/// Messages accepted by the selection reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    /// Flip membership of one row.
    Toggle(RowId),
    /// Select-all checkbox: see [`SelectionState::apply`].
    ToggleAll,
    Select(RowId),
    Deselect(RowId),
    /// Replace the whole selection.
    Replace(BTreeSet<RowId>),
    Clear,
}

/// Derived view of the selection relative to the visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionSummary {
    /// Every visible row is selected and at least one row is visible.
    pub is_all_selected: bool,
    /// Some, but not all, visible rows are selected.
    pub is_indeterminate: bool,
    /// Selected rows among the visible ones.
    pub selected_visible: usize,
    /// Selected rows overall, visible or not.
    pub selected_total: usize,
}

/// Set of selected row identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<RowId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &BTreeSet<RowId> {
        &self.selected
    }

    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Apply a selection message against the current visible keys.
    ///
    /// `ToggleAll` is literal: when every visible key is already selected the
    /// result is the empty set, including rows selected on other pages or
    /// under other filters. Otherwise the result is exactly the visible set
    /// and prior off-screen selections are dropped.
    pub fn apply(&mut self, action: SelectionAction, visible: &[RowId]) {
        match action {
            SelectionAction::Toggle(id) => {
                if !self.selected.remove(&id) {
                    self.selected.insert(id);
                }
            }
            SelectionAction::ToggleAll => {
                if self.all_selected(visible) {
                    self.selected.clear();
                } else {
                    self.selected = visible.iter().cloned().collect();
                }
            }
            SelectionAction::Select(id) => {
                self.selected.insert(id);
            }
            SelectionAction::Deselect(id) => {
                self.selected.remove(&id);
            }
            SelectionAction::Replace(set) => self.selected = set,
            SelectionAction::Clear => self.selected.clear(),
        }
    }

    /// Summarize the selection against `visible`.
    pub fn summary(&self, visible: &[RowId]) -> SelectionSummary {
        let selected_visible = visible
            .iter()
            .filter(|id| self.selected.contains(*id))
            .count();

        SelectionSummary {
            is_all_selected: self.all_selected(visible),
            is_indeterminate: selected_visible > 0 && selected_visible < visible.len(),
            selected_visible,
            selected_total: self.selected.len(),
        }
    }

    fn all_selected(&self, visible: &[RowId]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.selected.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<RowId> {
        raw.iter().map(|s| RowId::from(*s)).collect()
    }

    fn set(raw: &[&str]) -> BTreeSet<RowId> {
        ids(raw).into_iter().collect()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::Toggle("a".into()), &[]);
        assert!(state.is_selected(&"a".into()));

        state.apply(SelectionAction::Toggle("a".into()), &[]);
        assert!(state.is_empty());
    }

    #[test]
    fn toggle_all_selects_exactly_the_visible_set() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::Select("z".into()), &[]);

        state.apply(SelectionAction::ToggleAll, &ids(&["a", "b"]));
        assert_eq!(state.selected(), &set(&["a", "b"]));
    }

    #[test]
    fn toggle_all_off_discards_off_screen_selection() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::Replace(set(&["a", "b", "c"])), &[]);

        state.apply(SelectionAction::ToggleAll, &ids(&["a", "b"]));
        assert!(state.is_empty(), "select-all off clears everything, not just visible rows");
    }

    #[test]
    fn toggle_all_on_empty_visible_set_clears_selection() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::Select("a".into()), &[]);

        state.apply(SelectionAction::ToggleAll, &[]);
        assert!(state.is_empty());
    }

    #[test]
    fn summary_reports_all_selected() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::Replace(set(&["a", "b", "x"])), &[]);

        let summary = state.summary(&ids(&["a", "b"]));
        assert!(summary.is_all_selected);
        assert!(!summary.is_indeterminate);
        assert_eq!(summary.selected_visible, 2);
        assert_eq!(summary.selected_total, 3);
    }

    #[test]
    fn summary_reports_indeterminate() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::Select("a".into()), &[]);

        let summary = state.summary(&ids(&["a", "b"]));
        assert!(!summary.is_all_selected);
        assert!(summary.is_indeterminate);
    }

    #[test]
    fn summary_of_empty_visible_set_is_neither() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::Select("a".into()), &[]);

        let summary = state.summary(&[]);
        assert!(!summary.is_all_selected);
        assert!(!summary.is_indeterminate);
    }

    #[test]
    fn deselect_and_clear() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::Replace(set(&["a", "b"])), &[]);

        state.apply(SelectionAction::Deselect("a".into()), &[]);
        assert_eq!(state.selected(), &set(&["b"]));

        state.apply(SelectionAction::Clear, &[]);
        assert!(state.is_empty());
    }
}
