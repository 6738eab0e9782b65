//! Activity log and unsaved-change response DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ActivityLogEntry, diff, summarize};
use crate::service::UnsavedChange;

/// One changed field rendered for the detail view.
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldChangeDto {
    /// Field name.
    pub field: String,
    /// Value before the change, when present.
    pub before: Option<serde_json::Value>,
    /// Value after the change, when present.
    pub after: Option<serde_json::Value>,
}

/// One activity log entry with its summary and field diff.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityEntryResponse {
    /// Entry id.
    pub id: String,
    /// When the mutation was recorded.
    pub timestamp: DateTime<Utc>,
    /// Who performed the mutation.
    pub username: String,
    /// Action discriminator.
    pub action: String,
    /// Target discriminator.
    pub target: String,
    /// One-line human description.
    pub summary: String,
    /// Free-form context.
    pub details: String,
    /// Per-field before/after differences.
    pub changes: Vec<FieldChangeDto>,
}

impl From<&ActivityLogEntry> for ActivityEntryResponse {
    fn from(entry: &ActivityLogEntry) -> Self {
        let changes = diff(entry.before.as_ref(), entry.after.as_ref())
            .into_iter()
            .map(|c| FieldChangeDto {
                field: c.field,
                before: c.before,
                after: c.after,
            })
            .collect();
        Self {
            id: entry.id.clone(),
            timestamp: entry.timestamp,
            username: entry.username.clone(),
            action: entry.action.as_str().to_string(),
            target: entry.target.as_str().to_string(),
            summary: summarize(entry),
            details: entry.details.clone(),
            changes,
        }
    }
}

/// One pending unsaved change.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnsavedChangeDto {
    /// Action discriminator.
    pub action: String,
    /// Target discriminator.
    pub target: String,
    /// Human-readable description.
    pub description: String,
}

impl From<&UnsavedChange> for UnsavedChangeDto {
    fn from(change: &UnsavedChange) -> Self {
        Self {
            action: change.action.as_str().to_string(),
            target: change.target.as_str().to_string(),
            description: change.description.clone(),
        }
    }
}

/// `GET /changes` and save/resync response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChangesResponse {
    /// The affected change descriptions.
    pub changes: Vec<UnsavedChangeDto>,
}
