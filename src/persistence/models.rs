//! Row model for the stored activity log.

use chrono::{DateTime, Utc};

use crate::domain::{ActivityLogEntry, LogAction, LogTarget, Snapshot};

/// One row of the `activity_log` table.
///
/// `position` preserves the in-memory order (0 = newest); snapshots are
/// stored as JSON text.
#[derive(Debug, Clone)]
pub struct StoredActivityRow {
    /// Order within the bounded log, 0 = newest.
    pub position: i64,
    /// Entry id (`<unix-millis>-<random suffix>`).
    pub id: String,
    /// When the mutation was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Who performed the mutation.
    pub username: String,
    /// Action discriminator string.
    pub action: String,
    /// Target discriminator string.
    pub target: String,
    /// JSON-serialized before snapshot, when present.
    pub before_json: Option<String>,
    /// JSON-serialized after snapshot, when present.
    pub after_json: Option<String>,
    /// Free-form context.
    pub details: String,
}

impl StoredActivityRow {
    /// Builds a row from a live entry at the given log position.
    #[must_use]
    pub fn from_entry(position: i64, entry: &ActivityLogEntry) -> Self {
        Self {
            position,
            id: entry.id.clone(),
            recorded_at: entry.timestamp,
            username: entry.username.clone(),
            action: entry.action.as_str().to_string(),
            target: entry.target.as_str().to_string(),
            before_json: entry
                .before
                .as_ref()
                .and_then(|s| serde_json::to_string(s).ok()),
            after_json: entry
                .after
                .as_ref()
                .and_then(|s| serde_json::to_string(s).ok()),
            details: entry.details.clone(),
        }
    }

    /// Converts back into a live entry.
    ///
    /// Returns `None` when the action or target discriminator is unknown
    /// (a corrupt or future-format row); callers skip such rows instead
    /// of failing the whole restore.
    #[must_use]
    pub fn into_entry(self) -> Option<ActivityLogEntry> {
        let action = LogAction::parse(&self.action)?;
        let target = LogTarget::parse(&self.target)?;
        let before = self
            .before_json
            .as_deref()
            .and_then(|json| serde_json::from_str::<Snapshot>(json).ok());
        let after = self
            .after_json
            .as_deref()
            .and_then(|json| serde_json::from_str::<Snapshot>(json).ok());
        Some(ActivityLogEntry {
            id: self.id,
            timestamp: self.recorded_at,
            username: self.username,
            action,
            target,
            before,
            after,
            details: self.details,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ShopItem;

    #[test]
    fn entry_round_trips_through_row() {
        let entry = ActivityLogEntry::new(
            "admin",
            LogAction::Updated,
            LogTarget::ShopItem,
            Some(Snapshot::Item(ShopItem {
                name: "&bGem".to_string(),
                price: 100.0,
                ..ShopItem::default()
            })),
            Some(Snapshot::Item(ShopItem {
                name: "&bGem".to_string(),
                price: 80.0,
                ..ShopItem::default()
            })),
            "blocks.yml".to_string(),
        );

        let row = StoredActivityRow::from_entry(0, &entry);
        let Some(restored) = row.into_entry() else {
            panic!("row conversion failed");
        };
        assert_eq!(restored, entry);
    }

    #[test]
    fn unknown_discriminators_yield_none() {
        let row = StoredActivityRow {
            position: 0,
            id: "x".to_string(),
            recorded_at: Utc::now(),
            username: "admin".to_string(),
            action: "exploded".to_string(),
            target: "shop-item".to_string(),
            before_json: None,
            after_json: None,
            details: String::new(),
        };
        assert!(row.into_entry().is_none());
    }
}
