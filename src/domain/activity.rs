//! Audit vocabulary: log actions, targets, snapshots, and diffing.
//!
//! Every audited mutation produces an [`ActivityLogEntry`] carrying deep
//! structural clones of the entity before and after the change. Snapshots
//! never alias live workspace state; the workspace may mutate again before
//! an entry is inspected.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::menu::MainMenuButton;
use super::shop::{ItemLoreSettings, ShopItem};
use super::transaction::{TransactionKind, TransactionMenuSettings};

/// What a mutation did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    /// A new entity was created.
    Created,
    /// An existing entity was modified.
    Updated,
    /// An entity was removed.
    Deleted,
}

impl LogAction {
    /// Stable string form used by the persistence layer.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }

    /// Parses the stable string form. Returns `None` on unknown input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "created" => Some(Self::Created),
            "updated" => Some(Self::Updated),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// Entity kind a log entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogTarget {
    /// An item inside the current shop document.
    ShopItem,
    /// A whole shop file.
    ShopFile,
    /// The per-shop settings block (gui-name, rows, times, item-lore).
    ShopSettings,
    /// A main-menu button.
    MenuButton,
    /// The main-menu title/rows settings.
    MenuSettings,
    /// A purchase or sell menu settings instance.
    TransactionSettings,
}

impl LogTarget {
    /// Stable string form used by the persistence layer.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ShopItem => "shop-item",
            Self::ShopFile => "shop-file",
            Self::ShopSettings => "shop-settings",
            Self::MenuButton => "menu-button",
            Self::MenuSettings => "menu-settings",
            Self::TransactionSettings => "transaction-settings",
        }
    }

    /// Parses the stable string form. Returns `None` on unknown input.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "shop-item" => Some(Self::ShopItem),
            "shop-file" => Some(Self::ShopFile),
            "shop-settings" => Some(Self::ShopSettings),
            "menu-button" => Some(Self::MenuButton),
            "menu-settings" => Some(Self::MenuSettings),
            "transaction-settings" => Some(Self::TransactionSettings),
            _ => None,
        }
    }
}

/// Snapshot of the per-shop settings block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopSettingsSnapshot {
    /// Shop GUI title.
    pub gui_name: String,
    /// Grid rows.
    pub rows: u8,
    /// Permission node.
    pub permission: String,
    /// Opening-time ranges.
    pub available_times: Vec<String>,
    /// Item-lore display settings.
    pub item_lore: ItemLoreSettings,
}

/// Snapshot of the main-menu title/rows settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSettingsSnapshot {
    /// Menu title.
    pub title: String,
    /// Grid rows.
    pub rows: u8,
}

/// Lightweight snapshot of a shop file for create/delete entries.
///
/// Deliberately not a full document: shop-file deletion is not
/// rollback-capable, so the log only keeps enough for a human summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopFileSnapshot {
    /// File stem (filename without `.yml`).
    pub stem: String,
    /// Shop GUI title at snapshot time.
    pub gui_name: String,
    /// Number of items the document held.
    pub item_count: usize,
}

/// Deep structural clone of an entity at a point in time.
///
/// An explicit clone over the data model rather than a
/// serialize-roundtrip copy, so fields that would not survive a text
/// format (non-finite numbers, for one) are preserved exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Snapshot {
    /// A shop item.
    Item(ShopItem),
    /// A main-menu button.
    Button(MainMenuButton),
    /// Per-shop settings.
    ShopSettings(ShopSettingsSnapshot),
    /// Main-menu settings.
    MenuSettings(MenuSettingsSnapshot),
    /// A full transaction-menu settings instance.
    Transaction(TransactionMenuSettings),
    /// A shop file.
    ShopFile(ShopFileSnapshot),
}

impl Snapshot {
    /// Human label used in one-line summaries.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Item(item) => {
                if item.name.is_empty() {
                    item.material.clone()
                } else {
                    item.name.clone()
                }
            }
            Self::Button(button) => button.key.clone(),
            Self::ShopSettings(s) => s.gui_name.clone(),
            Self::MenuSettings(_) => "main menu".to_string(),
            Self::Transaction(t) => t.kind.to_string(),
            Self::ShopFile(f) => f.stem.clone(),
        }
    }

    /// The transaction-menu kind, when this snapshot holds one.
    #[must_use]
    pub const fn transaction_kind(&self) -> Option<TransactionKind> {
        match self {
            Self::Transaction(t) => Some(t.kind),
            _ => None,
        }
    }

    /// Projects the snapshot's payload onto a JSON object for diffing.
    ///
    /// serde_json's default map is ordered, so the projection (and every
    /// stringification derived from it) is canonical.
    #[must_use]
    pub fn to_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        let value = match self {
            Self::Item(v) => serde_json::to_value(v),
            Self::Button(v) => serde_json::to_value(v),
            Self::ShopSettings(v) => serde_json::to_value(v),
            Self::MenuSettings(v) => serde_json::to_value(v),
            Self::Transaction(v) => serde_json::to_value(v),
            Self::ShopFile(v) => serde_json::to_value(v),
        };
        match value {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}

/// One changed field in a before/after pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Field name from the snapshot projection.
    pub field: String,
    /// Value before the change; `None` when the field was absent.
    pub before: Option<serde_json::Value>,
    /// Value after the change; `None` when the field was absent.
    pub after: Option<serde_json::Value>,
}

/// Immutable audit record of one create/update/delete mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    /// Unique entry id: `<unix-millis>-<random suffix>`.
    pub id: String,
    /// When the mutation was recorded.
    pub timestamp: DateTime<Utc>,
    /// Who performed the mutation.
    pub username: String,
    /// What happened.
    pub action: LogAction,
    /// What kind of entity it happened to.
    pub target: LogTarget,
    /// Deep snapshot before the mutation; `None` for creations.
    pub before: Option<Snapshot>,
    /// Deep snapshot after the mutation; `None` for deletions.
    pub after: Option<Snapshot>,
    /// Free-form context, e.g. which shop file was affected.
    pub details: String,
}

impl ActivityLogEntry {
    /// Creates a new entry, minting its id and timestamp.
    #[must_use]
    pub fn new(
        username: &str,
        action: LogAction,
        target: LogTarget,
        before: Option<Snapshot>,
        after: Option<Snapshot>,
        details: String,
    ) -> Self {
        let now = Utc::now();
        let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(8).collect();
        Self {
            id: format!("{}-{suffix}", now.timestamp_millis()),
            timestamp: now,
            username: username.to_string(),
            action,
            target,
            before,
            after,
            details,
        }
    }

    /// The snapshot best describing the entry's subject: `after` when
    /// present, otherwise `before`.
    #[must_use]
    pub const fn subject(&self) -> Option<&Snapshot> {
        match (&self.after, &self.before) {
            (Some(s), _) | (None, Some(s)) => Some(s),
            (None, None) => None,
        }
    }
}

/// Computes the per-field difference between two snapshots.
///
/// Takes the key union over both JSON projections; a field counts as
/// changed when its stable stringification differs (absent fields
/// stringify as nothing and so differ from any present value).
#[must_use]
pub fn diff(before: Option<&Snapshot>, after: Option<&Snapshot>) -> Vec<FieldChange> {
    let before_fields = before.map(Snapshot::to_fields).unwrap_or_default();
    let after_fields = after.map(Snapshot::to_fields).unwrap_or_default();

    let keys: BTreeSet<&String> = before_fields.keys().chain(after_fields.keys()).collect();

    let mut changes = Vec::new();
    for key in keys {
        let b = before_fields.get(key);
        let a = after_fields.get(key);
        let b_str = b.map(stable_stringify).unwrap_or_default();
        let a_str = a.map(stable_stringify).unwrap_or_default();
        if b_str != a_str {
            changes.push(FieldChange {
                field: key.clone(),
                before: b.cloned(),
                after: a.cloned(),
            });
        }
    }
    changes
}

fn stable_stringify(value: &serde_json::Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Renders an entry as a one-line human description.
///
/// Dispatches on (action, target); unrecognized combinations fall back to
/// a generic string rather than erroring.
#[must_use]
pub fn summarize(entry: &ActivityLogEntry) -> String {
    let label = entry.subject().map(Snapshot::label).unwrap_or_default();
    let base = match (entry.action, entry.target) {
        (LogAction::Created, LogTarget::ShopItem) => format!("Created item '{label}'"),
        (LogAction::Updated, LogTarget::ShopItem) => format!("Updated item '{label}'"),
        (LogAction::Deleted, LogTarget::ShopItem) => format!("Deleted item '{label}'"),
        (LogAction::Created, LogTarget::ShopFile) => format!("Created shop file '{label}'"),
        (LogAction::Deleted, LogTarget::ShopFile) => format!("Deleted shop file '{label}'"),
        (LogAction::Updated, LogTarget::ShopSettings) => "Updated shop settings".to_string(),
        (LogAction::Created, LogTarget::MenuButton) => format!("Created menu button '{label}'"),
        (LogAction::Updated, LogTarget::MenuButton) => format!("Updated menu button '{label}'"),
        (LogAction::Deleted, LogTarget::MenuButton) => format!("Deleted menu button '{label}'"),
        (LogAction::Updated, LogTarget::MenuSettings) => {
            "Updated main menu settings".to_string()
        }
        (LogAction::Updated, LogTarget::TransactionSettings) => {
            let kind = entry
                .subject()
                .and_then(Snapshot::transaction_kind)
                .map_or_else(|| "transaction".to_string(), |k| k.to_string());
            format!("Updated {kind} menu settings")
        }
        _ => "Made changes".to_string(),
    };
    if entry.details.is_empty() {
        base
    } else {
        format!("{base} ({})", entry.details)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn item(name: &str, price: f64) -> ShopItem {
        ShopItem {
            name: name.to_string(),
            material: "DIAMOND".to_string(),
            price,
            ..ShopItem::default()
        }
    }

    #[test]
    fn entry_ids_are_unique() {
        let a = ActivityLogEntry::new("admin", LogAction::Created, LogTarget::ShopItem, None, None, String::new());
        let b = ActivityLogEntry::new("admin", LogAction::Created, LogTarget::ShopItem, None, None, String::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn diff_reports_changed_fields_only() {
        let before = Snapshot::Item(item("&bGem", 100.0));
        let after = Snapshot::Item(item("&bGem", 80.0));

        let changes = diff(Some(&before), Some(&after));
        assert_eq!(changes.len(), 1);
        let Some(change) = changes.first() else {
            panic!("expected one change");
        };
        assert_eq!(change.field, "price");
        assert_eq!(change.before, Some(serde_json::json!(100.0)));
        assert_eq!(change.after, Some(serde_json::json!(80.0)));
    }

    #[test]
    fn diff_against_nothing_lists_every_field() {
        let after = Snapshot::Item(item("&bGem", 100.0));
        let changes = diff(None, Some(&after));
        assert!(changes.iter().any(|c| c.field == "material"));
        assert!(changes.iter().all(|c| c.before.is_none()));
    }

    #[test]
    fn summarize_dispatches_on_action_and_target() {
        let entry = ActivityLogEntry::new(
            "admin",
            LogAction::Created,
            LogTarget::ShopItem,
            None,
            Some(Snapshot::Item(item("&bGem", 100.0))),
            "blocks".to_string(),
        );
        assert_eq!(summarize(&entry), "Created item '&bGem' (blocks)");
    }

    #[test]
    fn summarize_falls_back_for_unrecognized_pairs() {
        let entry = ActivityLogEntry::new(
            "admin",
            LogAction::Deleted,
            LogTarget::MenuSettings,
            None,
            None,
            String::new(),
        );
        assert_eq!(summarize(&entry), "Made changes");
    }

    #[test]
    fn item_label_falls_back_to_material() {
        let snap = Snapshot::Item(item("", 0.0));
        assert_eq!(snap.label(), "DIAMOND");
    }
}
