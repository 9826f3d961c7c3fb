//! Keyboard focus state machine over a `rows × cols` grid.
//!
//! Pure: the navigator never touches a UI toolkit. Each handled action
//! returns at most one [`NavEvent`] which the caller forwards to its
//! [`Viewport`](crate::viewport::Viewport).
//!
//! # State Machine
//!
//! - `Unfocused` → `Focused(0, 0)` on any movement action
//! - `Focused(r, c)` → `Focused(r', c')` on movement, clamped to the grid
//! - any state → `Unfocused` on Escape
//!
//! While disabled (empty grid, loading) everything but Escape is ignored.

use crate::model::GridAction;
use tracing::trace;

/// Rows moved by PageUp/PageDown unless configured otherwise.
pub const DEFAULT_PAGE_JUMP: usize = 10;

/// Focused cell, or none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPosition {
    #[default]
    Unfocused,
    Focused { row: usize, col: usize },
}

impl FocusPosition {
    /// `(row, col)` with `-1` standing for "no focus".
    pub fn as_sentinel(&self) -> (i64, i64) {
        match self {
            Self::Unfocused => (-1, -1),
            Self::Focused { row, col } => (*row as i64, *col as i64),
        }
    }

    pub fn is_focused(&self) -> bool {
        matches!(self, Self::Focused { .. })
    }

    pub fn row(&self) -> Option<usize> {
        match self {
            Self::Unfocused => None,
            Self::Focused { row, .. } => Some(*row),
        }
    }
}

/// Notification produced by a handled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// Focus moved to a new cell.
    CellFocused { row: usize, col: usize },
    /// The user asked to toggle selection of `row`.
    RowSelectRequested { row: usize },
    /// The user asked to toggle selection of every visible row.
    SelectAllRequested,
    /// Focus left the grid.
    Blurred,
}

/// Cell-level keyboard navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusNavigator {
    position: FocusPosition,
    row_count: usize,
    col_count: usize,
    disabled: bool,
    page_jump: usize,
}

impl FocusNavigator {
    /// An unfocused navigator over a `row_count × col_count` grid.
    ///
    /// Empty grids start disabled.
    pub fn new(row_count: usize, col_count: usize) -> Self {
        Self {
            position: FocusPosition::Unfocused,
            row_count,
            col_count,
            disabled: row_count == 0 || col_count == 0,
            page_jump: DEFAULT_PAGE_JUMP,
        }
    }

    /// Override the PageUp/PageDown distance (at least one row).
    pub fn with_page_jump(mut self, page_jump: usize) -> Self {
        self.page_jump = page_jump.max(1);
        self
    }

    pub fn position(&self) -> FocusPosition {
        self.position
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn col_count(&self) -> usize {
        self.col_count
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Enable or disable navigation (e.g. while loading).
    ///
    /// An empty grid stays disabled regardless.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled || self.is_empty();
    }

    /// Resize the grid, clamping the current focus into it.
    ///
    /// Returns the focus event when clamping moved the focus. A grid that
    /// becomes empty drops focus and disables navigation.
    pub fn set_dimensions(&mut self, row_count: usize, col_count: usize) -> Option<NavEvent> {
        self.row_count = row_count;
        self.col_count = col_count;

        if self.is_empty() {
            self.disabled = true;
            if self.position.is_focused() {
                self.position = FocusPosition::Unfocused;
                return Some(NavEvent::Blurred);
            }
            return None;
        }
        self.disabled = false;

        match self.position {
            FocusPosition::Unfocused => None,
            FocusPosition::Focused { row, col } => self.move_to(row, col),
        }
    }

    /// Focus a specific cell (pointer click, tab entry), clamped to the grid.
    pub fn focus_cell(&mut self, row: usize, col: usize) -> Option<NavEvent> {
        if self.disabled {
            return None;
        }
        self.move_to(row, col)
    }

    /// Roving tab index for a cell: `0` for the focused cell (or the first
    /// cell while unfocused), `-1` otherwise.
    pub fn tab_index(&self, row: usize, col: usize) -> i32 {
        let (focus_row, focus_col) = match self.position {
            FocusPosition::Focused { row, col } => (row, col),
            FocusPosition::Unfocused => (0, 0),
        };
        if (row, col) == (focus_row, focus_col) {
            0
        } else {
            -1
        }
    }

    pub fn is_cell_focused(&self, row: usize, col: usize) -> bool {
        self.position == FocusPosition::Focused { row, col }
    }

    /// Handle one action, returning the resulting notification if any.
    pub fn handle(&mut self, action: GridAction) -> Option<NavEvent> {
        if action == GridAction::Escape {
            self.position = FocusPosition::Unfocused;
            return Some(NavEvent::Blurred);
        }
        if self.disabled {
            trace!(?action, "Navigator disabled, ignoring action");
            return None;
        }

        let (row, col) = match self.position {
            FocusPosition::Focused { row, col } => (row, col),
            FocusPosition::Unfocused => {
                return match action {
                    GridAction::ToggleRowSelection => None,
                    GridAction::SelectAll => Some(NavEvent::SelectAllRequested),
                    _ => self.move_to(0, 0),
                };
            }
        };

        let last_row = self.row_count - 1;
        let last_col = self.col_count - 1;

        match action {
            GridAction::MoveUp => self.move_to(row.saturating_sub(1), col),
            GridAction::MoveDown => self.move_to(row + 1, col),
            GridAction::MoveLeft => self.move_to(row, col.saturating_sub(1)),
            GridAction::MoveRight => self.move_to(row, col + 1),
            GridAction::RowStart => self.move_to(row, 0),
            GridAction::RowEnd => self.move_to(row, last_col),
            GridAction::FirstCell => self.move_to(0, 0),
            GridAction::LastCell => self.move_to(last_row, last_col),
            GridAction::PageUp => self.move_to(row.saturating_sub(self.page_jump), col),
            GridAction::PageDown => self.move_to(row.saturating_add(self.page_jump), col),
            GridAction::ToggleRowSelection => Some(NavEvent::RowSelectRequested { row }),
            GridAction::SelectAll => Some(NavEvent::SelectAllRequested),
            GridAction::Escape => None,
        }
    }

    fn is_empty(&self) -> bool {
        self.row_count == 0 || self.col_count == 0
    }

    /// Clamp and move; emits only when the position actually changed.
    fn move_to(&mut self, row: usize, col: usize) -> Option<NavEvent> {
        let row = row.min(self.row_count.saturating_sub(1));
        let col = col.min(self.col_count.saturating_sub(1));
        let next = FocusPosition::Focused { row, col };

        if next == self.position {
            return None;
        }
        self.position = next;
        Some(NavEvent::CellFocused { row, col })
    }
}

#[cfg(test)]
#[path = "focus_tests.rs"]
mod tests;
