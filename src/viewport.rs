//! Toolkit-agnostic viewport capability.
//!
//! The table drives whatever UI hosts it only through this trait, so the
//! navigator and windower run headlessly in tests.

/// Side effects the table asks of the hosting UI.
pub trait Viewport {
    /// Move UI focus to the element rendering cell `(row, col)`.
    ///
    /// `row` is a display row index (position within the current page).
    fn focus_element_at(&mut self, row: usize, col: usize);

    /// Release UI focus from the grid.
    fn release_focus(&mut self) {}

    /// Scroll the container to `offset`.
    fn scroll_to(&mut self, _offset: usize) {}
}

/// A viewport that ignores every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullViewport;

impl Viewport for NullViewport {
    fn focus_element_at(&mut self, _row: usize, _col: usize) {}
}

/// Call recorded by [`RecordingViewport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportCall {
    Focus { row: usize, col: usize },
    Release,
    ScrollTo(usize),
}

/// A viewport that records every request, for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingViewport {
    pub calls: Vec<ViewportCall>,
}

impl RecordingViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the recorded calls.
    pub fn take(&mut self) -> Vec<ViewportCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Viewport for RecordingViewport {
    fn focus_element_at(&mut self, row: usize, col: usize) {
        self.calls.push(ViewportCall::Focus { row, col });
    }

    fn release_focus(&mut self) {
        self.calls.push(ViewportCall::Release);
    }

    fn scroll_to(&mut self, offset: usize) {
        self.calls.push(ViewportCall::ScrollTo(offset));
    }
}
