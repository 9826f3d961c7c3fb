//! Domain-level grid actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `GridAction` is handled by
/// [`KeyBindings`](crate::config::KeyBindings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridAction {
    // Cell navigation
    /// Move focus one row up. Default: ↑/k
    MoveUp,
    /// Move focus one row down. Default: ↓/j
    MoveDown,
    /// Move focus one column left. Default: ←/h
    MoveLeft,
    /// Move focus one column right. Default: →/l
    MoveRight,
    /// Jump to the first column of the current row. Default: Home
    RowStart,
    /// Jump to the last column of the current row. Default: End
    RowEnd,
    /// Jump to the top-left cell. Default: Ctrl+Home
    FirstCell,
    /// Jump to the bottom-right cell. Default: Ctrl+End
    LastCell,
    /// Move focus up by a page of rows. Default: Page Up
    PageUp,
    /// Move focus down by a page of rows. Default: Page Down
    PageDown,

    // Selection
    /// Toggle selection of the focused row. Default: Space
    ToggleRowSelection,
    /// Toggle selection of every visible row. Default: Ctrl+a
    SelectAll,

    /// Leave the grid, releasing focus. Default: Esc
    Escape,
}

impl GridAction {
    /// True for actions that only move focus.
    pub fn is_movement(&self) -> bool {
        !matches!(
            self,
            Self::ToggleRowSelection | Self::SelectAll | Self::Escape
        )
    }
}
