//! Bulk actions over the selected rows.
//!
//! Actions are external collaborators: the table hands them the selected rows
//! and tracks which action is executing. A failing action is logged and
//! reported, and never leaves the executing marker set or touches selection.

use crate::model::ActionError;
use tracing::{error, info};

/// An operation applied to every selected row at once.
pub trait BulkAction<T> {
    /// Name shown while executing and used in error reports.
    fn label(&self) -> &str;

    /// Run over `rows`. Errors are reported as plain messages.
    fn execute(&mut self, rows: &[&T]) -> Result<(), String>;
}

/// A [`BulkAction`] backed by a closure.
pub struct FnAction<F> {
    label: String,
    run: F,
}

impl<F> FnAction<F> {
    pub fn new(label: impl Into<String>, run: F) -> Self {
        Self {
            label: label.into(),
            run,
        }
    }
}

impl<T, F> BulkAction<T> for FnAction<F>
where
    F: FnMut(&[&T]) -> Result<(), String>,
{
    fn label(&self) -> &str {
        &self.label
    }

    fn execute(&mut self, rows: &[&T]) -> Result<(), String> {
        (self.run)(rows)
    }
}

/// Proof that an action was started; consumed by [`BulkActionState::finish`].
#[derive(Debug)]
#[must_use = "an unfinished action keeps the table marked as executing"]
pub struct ActionTicket {
    label: String,
}

impl ActionTicket {
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Tracks the action currently executing, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkActionState {
    executing: Option<String>,
}

impl BulkActionState {
    pub fn executing(&self) -> Option<&str> {
        self.executing.as_deref()
    }

    /// Mark `label` as executing.
    ///
    /// # Errors
    ///
    /// [`ActionError::AlreadyExecuting`] while another action is running.
    pub fn begin(&mut self, label: &str) -> Result<ActionTicket, ActionError> {
        if let Some(current) = &self.executing {
            return Err(ActionError::AlreadyExecuting {
                action: current.clone(),
            });
        }
        info!(action = label, "Bulk action started");
        self.executing = Some(label.to_string());
        Ok(ActionTicket {
            label: label.to_string(),
        })
    }

    /// Clear the executing marker and translate the outcome.
    pub fn finish<R>(
        &mut self,
        ticket: ActionTicket,
        outcome: Result<R, String>,
    ) -> Result<R, ActionError> {
        self.executing = None;
        match outcome {
            Ok(value) => {
                info!(action = %ticket.label, "Bulk action finished");
                Ok(value)
            }
            Err(reason) => {
                error!(action = %ticket.label, %reason, "Bulk action failed");
                Err(ActionError::Failed {
                    action: ticket.label,
                    reason,
                })
            }
        }
    }
}
