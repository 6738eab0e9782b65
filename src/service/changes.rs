//! Unsaved-change tracker.
//!
//! A short queue of human-readable descriptions of every audited mutation
//! since the last persisted save, used to render a pre-save confirmation
//! summary. The queue carries no authority over what gets persisted; the
//! saved payload is always the full serialized document.

use serde::Serialize;

use crate::domain::{LogAction, LogTarget};

/// One pending change description.
#[derive(Debug, Clone, Serialize)]
pub struct UnsavedChange {
    /// What happened.
    pub action: LogAction,
    /// What kind of entity it happened to.
    pub target: LogTarget,
    /// Human-readable one-liner (the activity summary).
    pub description: String,
}

/// Append-only queue of pending change descriptions, drained atomically
/// on manual save, successful auto-save, or server resync.
#[derive(Debug, Default)]
pub struct UnsavedChanges {
    queue: Vec<UnsavedChange>,
}

impl UnsavedChanges {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a change description.
    pub fn push(&mut self, action: LogAction, target: LogTarget, description: String) {
        self.queue.push(UnsavedChange {
            action,
            target,
            description,
        });
    }

    /// Pending changes in arrival order.
    #[must_use]
    pub fn pending(&self) -> &[UnsavedChange] {
        &self.queue
    }

    /// Takes every pending change, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<UnsavedChange> {
        std::mem::take(&mut self.queue)
    }

    /// Number of pending changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether anything is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn drain_takes_everything_in_order() {
        let mut changes = UnsavedChanges::new();
        changes.push(LogAction::Created, LogTarget::ShopItem, "a".to_string());
        changes.push(LogAction::Deleted, LogTarget::MenuButton, "b".to_string());

        let drained = changes.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained.first().map(|c| c.description.as_str()), Some("a"));
        assert!(changes.is_empty());
    }

    #[test]
    fn drain_on_empty_queue_yields_nothing() {
        let mut changes = UnsavedChanges::new();
        assert!(changes.drain().is_empty());
    }
}
