//! SQLite implementation of the activity log store.
//!
//! The log is small (bounded to 100 entries) and rewritten wholesale on
//! every record, so the store favors a simple transactional replace over
//! incremental appends.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use super::models::StoredActivityRow;
use crate::domain::ActivityLogEntry;
use crate::error::EditorError;

/// SQLite-backed persistence for the activity log.
#[derive(Debug, Clone)]
pub struct ActivityStore {
    pool: SqlitePool,
}

impl ActivityStore {
    /// Connects to the given SQLite URL and bootstraps the schema.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PersistenceError`] on connection or schema
    /// failure.
    pub async fn connect(url: &str) -> Result<Self, EditorError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(|e| EditorError::PersistenceError(e.to_string()))?;
        let store = Self { pool };
        store.init_schema().await?;
        tracing::info!(url, "activity store ready");
        Ok(store)
    }

    /// Creates the `activity_log` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PersistenceError`] on database failure.
    pub async fn init_schema(&self) -> Result<(), EditorError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS activity_log (
                position INTEGER PRIMARY KEY,
                id TEXT NOT NULL,
                recorded_at TEXT NOT NULL,
                username TEXT NOT NULL,
                action TEXT NOT NULL,
                target TEXT NOT NULL,
                before_json TEXT,
                after_json TEXT,
                details TEXT NOT NULL DEFAULT ''
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| EditorError::PersistenceError(e.to_string()))?;
        Ok(())
    }

    /// Rewrites the whole stored log in one transaction.
    ///
    /// `entries` arrive newest first, matching the in-memory order.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PersistenceError`] on database failure.
    pub async fn replace_all(&self, entries: &[ActivityLogEntry]) -> Result<(), EditorError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| EditorError::PersistenceError(e.to_string()))?;

        sqlx::query("DELETE FROM activity_log")
            .execute(&mut *tx)
            .await
            .map_err(|e| EditorError::PersistenceError(e.to_string()))?;

        for (position, entry) in entries.iter().enumerate() {
            let row = StoredActivityRow::from_entry(position as i64, entry);
            sqlx::query(
                "INSERT INTO activity_log \
                 (position, id, recorded_at, username, action, target, before_json, after_json, details) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(row.position)
            .bind(&row.id)
            .bind(row.recorded_at)
            .bind(&row.username)
            .bind(&row.action)
            .bind(&row.target)
            .bind(&row.before_json)
            .bind(&row.after_json)
            .bind(&row.details)
            .execute(&mut *tx)
            .await
            .map_err(|e| EditorError::PersistenceError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| EditorError::PersistenceError(e.to_string()))?;
        Ok(())
    }

    /// Loads the stored log, newest first. Corrupt rows are skipped with
    /// a warning.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PersistenceError`] on database failure.
    pub async fn load_all(&self) -> Result<Vec<ActivityLogEntry>, EditorError> {
        let rows = sqlx::query_as::<
            _,
            (
                i64,
                String,
                DateTime<Utc>,
                String,
                String,
                String,
                Option<String>,
                Option<String>,
                String,
            ),
        >(
            "SELECT position, id, recorded_at, username, action, target, before_json, after_json, details \
             FROM activity_log ORDER BY position ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| EditorError::PersistenceError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(
                |(
                    position,
                    id,
                    recorded_at,
                    username,
                    action,
                    target,
                    before_json,
                    after_json,
                    details,
                )| {
                    let row = StoredActivityRow {
                        position,
                        id,
                        recorded_at,
                        username,
                        action,
                        target,
                        before_json,
                        after_json,
                        details,
                    };
                    let entry = row.into_entry();
                    if entry.is_none() {
                        tracing::warn!(position, "skipping unreadable activity row");
                    }
                    entry
                },
            )
            .collect())
    }

    /// Empties the stored log.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PersistenceError`] on database failure.
    pub async fn clear(&self) -> Result<(), EditorError> {
        sqlx::query("DELETE FROM activity_log")
            .execute(&self.pool)
            .await
            .map_err(|e| EditorError::PersistenceError(e.to_string()))?;
        Ok(())
    }
}
