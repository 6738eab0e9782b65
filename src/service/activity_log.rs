//! Bounded in-memory activity log.
//!
//! Entries prepend at the head (newest first) and the log truncates to
//! the 100 most recent, dropping the oldest. Recording never fails.
//! Entries are immutable once recorded; the only whole-log mutation is
//! clearing. Rollback does not touch existing entries, it records new
//! forward entries through the same path.

use crate::domain::ActivityLogEntry;

/// Maximum number of entries the log retains.
pub const ACTIVITY_LOG_CAPACITY: usize = 100;

/// Append-only (at the head) audit log, bounded to the 100 most recent
/// entries.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: Vec<ActivityLogEntry>,
}

impl ActivityLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a log from persisted entries (newest first), truncating
    /// to capacity in case the store held more.
    #[must_use]
    pub fn from_entries(mut entries: Vec<ActivityLogEntry>) -> Self {
        entries.truncate(ACTIVITY_LOG_CAPACITY);
        Self { entries }
    }

    /// Prepends an entry and truncates to capacity. Always succeeds.
    pub fn record(&mut self, entry: ActivityLogEntry) {
        self.entries.insert(0, entry);
        self.entries.truncate(ACTIVITY_LOG_CAPACITY);
    }

    /// All entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[ActivityLogEntry] {
        &self.entries
    }

    /// Looks up an entry by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ActivityLogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{LogAction, LogTarget};

    fn entry(details: &str) -> ActivityLogEntry {
        ActivityLogEntry::new(
            "admin",
            LogAction::Updated,
            LogTarget::ShopItem,
            None,
            None,
            details.to_string(),
        )
    }

    #[test]
    fn newest_entry_sits_at_the_head() {
        let mut log = ActivityLog::new();
        log.record(entry("first"));
        log.record(entry("second"));

        assert_eq!(log.entries().first().map(|e| e.details.as_str()), Some("second"));
        assert_eq!(log.entries().last().map(|e| e.details.as_str()), Some("first"));
    }

    #[test]
    fn truncates_to_the_hundred_most_recent() {
        let mut log = ActivityLog::new();
        for i in 0..150 {
            log.record(entry(&i.to_string()));
        }

        assert_eq!(log.len(), ACTIVITY_LOG_CAPACITY);
        assert_eq!(log.entries().first().map(|e| e.details.as_str()), Some("149"));
        assert_eq!(log.entries().last().map(|e| e.details.as_str()), Some("50"));
    }

    #[test]
    fn find_locates_by_id() {
        let mut log = ActivityLog::new();
        let e = entry("findme");
        let id = e.id.clone();
        log.record(e);
        log.record(entry("other"));

        assert_eq!(log.find(&id).map(|e| e.details.as_str()), Some("findme"));
        assert!(log.find("missing").is_none());
    }

    #[test]
    fn from_entries_enforces_capacity() {
        let entries: Vec<ActivityLogEntry> =
            (0..120).map(|i| entry(&i.to_string())).collect();
        let log = ActivityLog::from_entries(entries);
        assert_eq!(log.len(), ACTIVITY_LOG_CAPACITY);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = ActivityLog::new();
        log.record(entry("x"));
        log.clear();
        assert!(log.is_empty());
    }
}
