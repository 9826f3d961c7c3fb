//! Keyboard bindings configuration.

use crate::model::GridAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to grid actions.
///
/// Defaults follow the usual data-grid conventions plus vim-style
/// `h`/`j`/`k`/`l`; individual keys can be rebound with [`KeyBindings::bind`].
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, GridAction>,
}

impl KeyBindings {
    /// An empty binding table.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Look up the action for a key event.
    ///
    /// Key releases never map to an action.
    pub fn get(&self, key: KeyEvent) -> Option<GridAction> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let key = KeyEvent::new(key.code, key.modifiers);
        self.bindings.get(&key).copied()
    }

    /// Bind `code` with `modifiers` to `action`, replacing any previous binding.
    pub fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: GridAction) {
        self.bindings.insert(KeyEvent::new(code, modifiers), action);
    }

    pub fn unbind(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Option<GridAction> {
        self.bindings.remove(&KeyEvent::new(code, modifiers))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        let none = KeyModifiers::NONE;

        // Arrow keys
        bindings.bind(KeyCode::Up, none, GridAction::MoveUp);
        bindings.bind(KeyCode::Down, none, GridAction::MoveDown);
        bindings.bind(KeyCode::Left, none, GridAction::MoveLeft);
        bindings.bind(KeyCode::Right, none, GridAction::MoveRight);

        // Vim-style movement
        bindings.bind(KeyCode::Char('k'), none, GridAction::MoveUp);
        bindings.bind(KeyCode::Char('j'), none, GridAction::MoveDown);
        bindings.bind(KeyCode::Char('h'), none, GridAction::MoveLeft);
        bindings.bind(KeyCode::Char('l'), none, GridAction::MoveRight);

        // Row and grid edges
        bindings.bind(KeyCode::Home, none, GridAction::RowStart);
        bindings.bind(KeyCode::End, none, GridAction::RowEnd);
        bindings.bind(KeyCode::Home, KeyModifiers::CONTROL, GridAction::FirstCell);
        bindings.bind(KeyCode::End, KeyModifiers::CONTROL, GridAction::LastCell);

        // Paging
        bindings.bind(KeyCode::PageUp, none, GridAction::PageUp);
        bindings.bind(KeyCode::PageDown, none, GridAction::PageDown);

        // Selection
        bindings.bind(KeyCode::Char(' '), none, GridAction::ToggleRowSelection);
        bindings.bind(KeyCode::Char('a'), KeyModifiers::CONTROL, GridAction::SelectAll);

        bindings.bind(KeyCode::Esc, none, GridAction::Escape);

        bindings
    }
}
