//! Editor service: orchestrates document mutations, audit logging, and
//! the save pipeline.
//!
//! Every mutation method follows the same pattern: lock the state, apply
//! the workspace mutation (which validates invariants and yields deep
//! before/after snapshots), record the activity entry, persist the log,
//! queue the unsaved-change description, then re-arm the debounced
//! auto-save. The core state lives behind a single async lock: there is
//! one active editing session, and saves, loads and mutations all
//! serialize through it, so a load can never observe a half-applied edit.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::domain::{
    ActionButton, ActionButtonKind, ActivityLogEntry, AmountButton, AmountGroupKind, LogAction,
    LogTarget, MainMenuButton, MainMenuState, MenuSource, MutationRecord, ShopDocument,
    ShopFileSnapshot, ShopItem, ShopSettingsSnapshot, Slot, Snapshot, TransactionKind,
    TransactionMenuSettings, TransactionScalars, EditorWorkspace, summarize,
};
use crate::error::EditorError;
use crate::persistence::files::{
    LEGACY_GUI_FILE, MAIN_MENU_FILE, PURCHASE_MENU_FILE, SELL_MENU_FILE,
};
use crate::persistence::{ActivityStore, ConfigFileStore};
use crate::service::activity_log::ActivityLog;
use crate::service::autosave::{AutosaveTimer, SaveCoordinator};
use crate::service::changes::{UnsavedChange, UnsavedChanges};
use crate::yaml;

/// Mutable session state guarded by the service lock.
#[derive(Debug)]
struct EditorState {
    workspace: EditorWorkspace,
    activity: ActivityLog,
    changes: UnsavedChanges,
}

/// Orchestration layer for the whole editing session.
#[derive(Debug)]
pub struct EditorService {
    state: Mutex<EditorState>,
    files: Arc<ConfigFileStore>,
    saver: SaveCoordinator,
    autosave: AutosaveTimer,
    activity_store: Option<ActivityStore>,
    username: String,
}

impl EditorService {
    /// Creates a service over the given stores.
    ///
    /// `activity_store` is optional so tests (and installs with
    /// persistence disabled) can run fully in memory.
    #[must_use]
    pub fn new(
        files: Arc<ConfigFileStore>,
        activity_store: Option<ActivityStore>,
        username: String,
        autosave_debounce: Duration,
    ) -> Self {
        Self {
            state: Mutex::new(EditorState {
                workspace: EditorWorkspace::new(),
                activity: ActivityLog::new(),
                changes: UnsavedChanges::new(),
            }),
            saver: SaveCoordinator::new(Arc::clone(&files)),
            files,
            autosave: AutosaveTimer::new(autosave_debounce),
            activity_store,
            username,
        }
    }

    // ── Loading ────────────────────────────────────────────────────────

    /// Performs the initial load: configuration files from disk and the
    /// persisted activity log. Enables auto-save once complete.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PersistenceError`] on store failures.
    pub async fn load_all(&self) -> Result<(), EditorError> {
        let mut state = self.state.lock().await;
        self.reload_workspace(&mut state).await?;
        if let Some(store) = &self.activity_store {
            state.activity = ActivityLog::from_entries(store.load_all().await?);
        }
        drop(state);
        self.autosave.mark_ready();
        Ok(())
    }

    /// Re-reads everything from disk, discarding in-memory edits.
    ///
    /// Waits out any in-flight saves first so the load cannot race a
    /// write, then drains the unsaved-change queue (the disk is now the
    /// truth). The activity log is left intact.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PersistenceError`] on store failures.
    pub async fn resync(&self) -> Result<Vec<UnsavedChange>, EditorError> {
        self.saver.flush_all().await;
        let mut state = self.state.lock().await;
        self.reload_workspace(&mut state).await?;
        Ok(state.changes.drain())
    }

    async fn reload_workspace(&self, state: &mut EditorState) -> Result<(), EditorError> {
        let loaded = self.files.load_all().await?;

        let mut workspace = EditorWorkspace::new();
        workspace.shop_files = loaded.shops;

        // The split files win; the combined gui.yml is a deprecated
        // fallback kept alive for not-yet-migrated installs.
        if loaded.main_menu.is_some()
            || loaded.purchase_menu.is_some()
            || loaded.sell_menu.is_some()
            || loaded.legacy_gui.is_none()
        {
            workspace.menu_source = MenuSource::SplitFiles;
            if let Some(text) = &loaded.main_menu {
                workspace.main_menu = yaml::parse_main_menu(text);
                workspace
                    .menu_baselines
                    .insert(MAIN_MENU_FILE.to_string(), text.clone());
            }
            if let Some(text) = &loaded.purchase_menu {
                workspace.purchase_menu =
                    yaml::parse_transaction_menu(text, TransactionKind::Purchase);
                workspace
                    .menu_baselines
                    .insert(PURCHASE_MENU_FILE.to_string(), text.clone());
            }
            if let Some(text) = &loaded.sell_menu {
                workspace.sell_menu = yaml::parse_transaction_menu(text, TransactionKind::Sell);
                workspace
                    .menu_baselines
                    .insert(SELL_MENU_FILE.to_string(), text.clone());
            }
        } else if let Some(text) = &loaded.legacy_gui {
            let menus = yaml::parse_legacy_gui(text);
            workspace.menu_source = MenuSource::LegacyGui;
            workspace.main_menu = menus.main;
            workspace.purchase_menu = menus.purchase;
            workspace.sell_menu = menus.sell;
            workspace
                .menu_baselines
                .insert(LEGACY_GUI_FILE.to_string(), text.clone());
        }

        state.workspace = workspace;
        Ok(())
    }

    // ── Views ──────────────────────────────────────────────────────────

    /// Sorted stems of every known shop file.
    pub async fn shop_stems(&self) -> Vec<String> {
        let state = self.state.lock().await;
        let mut stems: Vec<String> = state.workspace.shop_files.keys().cloned().collect();
        stems.sort();
        stems
    }

    /// The currently open shop, if any.
    pub async fn current_shop(&self) -> Option<(String, ShopDocument)> {
        let state = self.state.lock().await;
        state
            .workspace
            .current()
            .map(|c| (c.stem.clone(), c.document.clone()))
    }

    /// The main menu document.
    pub async fn main_menu(&self) -> MainMenuState {
        self.state.lock().await.workspace.main_menu.clone()
    }

    /// A transaction-menu settings instance.
    pub async fn transaction_menu(&self, kind: TransactionKind) -> TransactionMenuSettings {
        self.state.lock().await.workspace.transaction(kind).clone()
    }

    /// Activity log entries, newest first.
    pub async fn activity_entries(&self) -> Vec<ActivityLogEntry> {
        self.state.lock().await.activity.entries().to_vec()
    }

    /// Pending unsaved-change descriptions.
    pub async fn pending_changes(&self) -> Vec<UnsavedChange> {
        self.state.lock().await.changes.pending().to_vec()
    }

    // ── Shop files ─────────────────────────────────────────────────────

    /// Opens a shop file, making it the current document.
    ///
    /// Any pending edits (the previous shop included) are persisted first
    /// so at most one shop has unsaved state and saves never cross-write.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ShopNotFound`] for an unknown stem, or a
    /// persistence error from flushing the previous document.
    pub async fn open_shop(&self, stem: &str) -> Result<ShopDocument, EditorError> {
        let mut state = self.state.lock().await;
        if !state.workspace.shop_files.contains_key(stem) {
            return Err(EditorError::ShopNotFound(stem.to_string()));
        }
        self.flush_dirty(&mut state).await?;
        state.changes.drain();

        let text = state
            .workspace
            .shop_files
            .get(stem)
            .cloned()
            .unwrap_or_default();
        let document = yaml::parse_shop(&text);
        state.workspace.set_current_shop(stem, document);
        state
            .workspace
            .current()
            .map(|c| c.document.clone())
            .ok_or_else(|| EditorError::Internal("current shop vanished".to_string()))
    }

    /// Creates a new shop file with canonical defaults and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::DuplicateShopFile`] when the stem is taken,
    /// [`EditorError::InvalidRequest`] for a bad stem, or a persistence
    /// error from the initial write (local state is kept either way).
    pub async fn create_shop(self: &Arc<Self>, stem: &str) -> Result<(), EditorError> {
        let mut state = self.state.lock().await;
        state.workspace.create_shop_file(stem)?;

        let document = ShopDocument {
            gui_name: format!("&8{stem}"),
            ..ShopDocument::default()
        };
        let text = yaml::serialize_shop(&document);

        let record = MutationRecord {
            action: LogAction::Created,
            target: LogTarget::ShopFile,
            before: None,
            after: Some(Snapshot::ShopFile(ShopFileSnapshot {
                stem: stem.to_string(),
                gui_name: document.gui_name.clone(),
                item_count: 0,
            })),
            details: format!("{stem}.yml"),
        };
        self.record(&mut state, record).await;

        let outcome = self
            .saver
            .save(&ConfigFileStore::shop_path(stem), text.clone())
            .await;
        match outcome {
            Ok(_) => {
                state.workspace.shop_files.insert(stem.to_string(), text);
                Ok(())
            }
            // Optimistic: the in-memory file stays; a later save retries.
            Err(e) => Err(e),
        }
    }

    /// Deletes a shop file from disk and memory.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ShopNotFound`] for an unknown stem, or a
    /// persistence error from the delete (local state is already updated;
    /// a resync restores it if the delete failed).
    pub async fn delete_shop(self: &Arc<Self>, stem: &str) -> Result<(), EditorError> {
        let path = ConfigFileStore::shop_path(stem);
        self.saver.flush(&path).await;

        let mut state = self.state.lock().await;
        let text = state.workspace.remove_shop_file(stem)?;
        let parsed = yaml::parse_shop(&text);
        let record = MutationRecord {
            action: LogAction::Deleted,
            target: LogTarget::ShopFile,
            before: Some(Snapshot::ShopFile(ShopFileSnapshot {
                stem: stem.to_string(),
                gui_name: parsed.gui_name,
                item_count: parsed.items.len(),
            })),
            after: None,
            details: format!("{stem}.yml"),
        };
        self.record(&mut state, record).await;
        drop(state);

        self.files.delete(&path).await
    }

    // ── Audited mutations ──────────────────────────────────────────────

    /// Adds an item to the current shop. Returns the minted item id.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoShopOpen`] when no shop is open.
    pub async fn add_item(self: &Arc<Self>, fields: ShopItem) -> Result<u64, EditorError> {
        let mut state = self.state.lock().await;
        let (id, record) = state.workspace.add_item(fields)?;
        self.record(&mut state, record).await;
        drop(state);
        self.touch_autosave();
        Ok(id)
    }

    /// Overwrites an item's fields (id preserved).
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoShopOpen`] or [`EditorError::ItemNotFound`].
    pub async fn update_item(
        self: &Arc<Self>,
        id: u64,
        fields: ShopItem,
    ) -> Result<(), EditorError> {
        self.apply(move |ws| ws.update_item(id, fields)).await
    }

    /// Removes an item from the current shop.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoShopOpen`] or [`EditorError::ItemNotFound`].
    pub async fn remove_item(self: &Arc<Self>, id: u64) -> Result<(), EditorError> {
        self.apply(move |ws| ws.remove_item(id)).await
    }

    /// Overwrites the current shop's settings block.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoShopOpen`] or [`EditorError::InvalidRequest`].
    pub async fn update_shop_settings(
        self: &Arc<Self>,
        settings: ShopSettingsSnapshot,
    ) -> Result<(), EditorError> {
        self.apply(move |ws| ws.update_shop_settings(settings)).await
    }

    /// Inserts or replaces a main-menu button.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SlotConflict`] naming the occupant, or
    /// [`EditorError::InvalidRequest`] for a bad key.
    pub async fn upsert_menu_button(
        self: &Arc<Self>,
        button: MainMenuButton,
    ) -> Result<(), EditorError> {
        self.apply(move |ws| ws.upsert_button(button)).await
    }

    /// Removes a main-menu button.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ButtonNotFound`] for an unknown key.
    pub async fn remove_menu_button(self: &Arc<Self>, key: &str) -> Result<(), EditorError> {
        let key = key.to_string();
        self.apply(move |ws| ws.remove_button(&key)).await
    }

    /// Updates the main-menu title and rows.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidRequest`] when rows are out of range.
    pub async fn update_menu_settings(
        self: &Arc<Self>,
        title: String,
        rows: u8,
    ) -> Result<(), EditorError> {
        self.apply(move |ws| ws.update_menu_settings(title, rows)).await
    }

    /// Updates a transaction menu's scalar fields.
    ///
    /// # Errors
    ///
    /// Propagates workspace validation failures.
    pub async fn update_transaction_scalars(
        self: &Arc<Self>,
        kind: TransactionKind,
        scalars: TransactionScalars,
    ) -> Result<(), EditorError> {
        self.apply(move |ws| ws.update_transaction_scalars(kind, scalars))
            .await
    }

    /// Moves a transaction menu's display item.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SlotConflict`] naming the occupant.
    pub async fn set_transaction_display(
        self: &Arc<Self>,
        kind: TransactionKind,
        material: String,
        slot: Slot,
    ) -> Result<(), EditorError> {
        self.apply(move |ws| ws.set_transaction_display(kind, material, slot))
            .await
    }

    /// Replaces one of a transaction menu's fixed action buttons.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SlotConflict`] or
    /// [`EditorError::InvalidRequest`] for `sell-all` on the purchase menu.
    pub async fn set_action_button(
        self: &Arc<Self>,
        kind: TransactionKind,
        which: ActionButtonKind,
        button: ActionButton,
    ) -> Result<(), EditorError> {
        self.apply(move |ws| ws.set_action_button(kind, which, button))
            .await
    }

    /// Inserts or replaces an amount button.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SlotConflict`] naming the occupant.
    pub async fn upsert_amount_button(
        self: &Arc<Self>,
        kind: TransactionKind,
        group: AmountGroupKind,
        amount_key: &str,
        button: AmountButton,
    ) -> Result<(), EditorError> {
        let amount_key = amount_key.to_string();
        self.apply(move |ws| ws.upsert_amount_button(kind, group, &amount_key, button))
            .await
    }

    /// Removes an amount button.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ButtonNotFound`] for an unknown amount key.
    pub async fn remove_amount_button(
        self: &Arc<Self>,
        kind: TransactionKind,
        group: AmountGroupKind,
        amount_key: &str,
    ) -> Result<(), EditorError> {
        let amount_key = amount_key.to_string();
        self.apply(move |ws| ws.remove_amount_button(kind, group, &amount_key))
            .await
    }

    async fn apply<F>(self: &Arc<Self>, mutate: F) -> Result<(), EditorError>
    where
        F: FnOnce(&mut EditorWorkspace) -> Result<MutationRecord, EditorError>,
    {
        let mut state = self.state.lock().await;
        let record = mutate(&mut state.workspace)?;
        self.record(&mut state, record).await;
        drop(state);
        self.touch_autosave();
        Ok(())
    }

    /// Records a mutation: activity entry, persisted log, unsaved queue.
    /// Never fails; a store hiccup is logged and the entry stays in
    /// memory for the next successful persist.
    async fn record(&self, state: &mut EditorState, record: MutationRecord) -> ActivityLogEntry {
        let entry = ActivityLogEntry::new(
            &self.username,
            record.action,
            record.target,
            record.before,
            record.after,
            record.details,
        );
        let description = summarize(&entry);
        tracing::info!(
            action = entry.action.as_str(),
            target = entry.target.as_str(),
            %description,
            "mutation recorded"
        );
        state
            .changes
            .push(entry.action, entry.target, description);
        state.activity.record(entry.clone());

        if let Some(store) = &self.activity_store {
            if let Err(e) = store.replace_all(state.activity.entries()).await {
                tracing::warn!(error = %e, "activity log persist failed; will retry on next record");
            }
        }
        entry
    }

    // ── Rollback ───────────────────────────────────────────────────────

    /// Reverses a prior mutation, forward-logging the reversal as a new
    /// entry. The original entry is left intact.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::EntryNotFound`] for an unknown entry id,
    /// [`EditorError::RollbackTargetMissing`] when the live entity cannot
    /// be located anymore, [`EditorError::RollbackUnsupported`] for entry
    /// kinds with no reversal (creations, shop-file deletion), or a slot
    /// conflict when restoring a button whose slot has since been taken.
    pub async fn rollback(self: &Arc<Self>, entry_id: &str) -> Result<ActivityLogEntry, EditorError> {
        let mut state = self.state.lock().await;
        let entry = state
            .activity
            .find(entry_id)
            .cloned()
            .ok_or_else(|| EditorError::EntryNotFound(entry_id.to_string()))?;

        let record = match (entry.action, entry.target) {
            (LogAction::Deleted, LogTarget::ShopItem) => {
                let Some(Snapshot::Item(item)) = entry.before.clone() else {
                    return Err(EditorError::RollbackTargetMissing(
                        "deleted item snapshot is missing".to_string(),
                    ));
                };
                // Re-added with a freshly minted identity.
                let (_, record) = state
                    .workspace
                    .add_item(item)
                    .map_err(|_| EditorError::RollbackTargetMissing(
                        "no shop is open to restore the item into".to_string(),
                    ))?;
                record
            }
            (LogAction::Updated, LogTarget::ShopItem) => {
                let (Some(Snapshot::Item(before)), Some(Snapshot::Item(after))) =
                    (entry.before.clone(), entry.after.clone())
                else {
                    return Err(EditorError::RollbackTargetMissing(
                        "update snapshots are missing".to_string(),
                    ));
                };
                let Some(live) = state.workspace.find_item_by_id_or_name(after.id, &after.name)
                else {
                    return Err(EditorError::RollbackTargetMissing(format!(
                        "item '{}' no longer exists",
                        after.name
                    )));
                };
                live.apply_snapshot(&before);
                MutationRecord {
                    action: LogAction::Updated,
                    target: LogTarget::ShopItem,
                    before: Some(Snapshot::Item(after)),
                    after: Some(Snapshot::Item(before)),
                    details: entry.details.clone(),
                }
            }
            (LogAction::Deleted, LogTarget::MenuButton) => {
                let Some(Snapshot::Button(button)) = entry.before.clone() else {
                    return Err(EditorError::RollbackTargetMissing(
                        "deleted button snapshot is missing".to_string(),
                    ));
                };
                // Re-adding re-checks the slot invariant; a conflict is
                // reported to the caller and nothing is applied.
                state.workspace.upsert_button(button)?
            }
            (LogAction::Updated, LogTarget::MenuButton) => {
                let (Some(Snapshot::Button(before)), Some(Snapshot::Button(after))) =
                    (entry.before.clone(), entry.after.clone())
                else {
                    return Err(EditorError::RollbackTargetMissing(
                        "update snapshots are missing".to_string(),
                    ));
                };
                if state.workspace.main_menu.button(&after.key).is_none() {
                    return Err(EditorError::RollbackTargetMissing(format!(
                        "button '{}' no longer exists",
                        after.key
                    )));
                }
                state.workspace.upsert_button(before.clone())?;
                MutationRecord {
                    action: LogAction::Updated,
                    target: LogTarget::MenuButton,
                    before: Some(Snapshot::Button(after)),
                    after: Some(Snapshot::Button(before)),
                    details: entry.details.clone(),
                }
            }
            (LogAction::Updated, LogTarget::ShopSettings) => {
                let Some(Snapshot::ShopSettings(before)) = entry.before.clone() else {
                    return Err(EditorError::RollbackTargetMissing(
                        "settings snapshot is missing".to_string(),
                    ));
                };
                let record = state.workspace.update_shop_settings(before)?;
                MutationRecord {
                    before: entry.after.clone(),
                    after: entry.before.clone(),
                    ..record
                }
            }
            (LogAction::Updated, LogTarget::MenuSettings) => {
                let Some(Snapshot::MenuSettings(before)) = entry.before.clone() else {
                    return Err(EditorError::RollbackTargetMissing(
                        "settings snapshot is missing".to_string(),
                    ));
                };
                let record = state
                    .workspace
                    .update_menu_settings(before.title, before.rows)?;
                MutationRecord {
                    before: entry.after.clone(),
                    after: entry.before.clone(),
                    ..record
                }
            }
            (LogAction::Updated, LogTarget::TransactionSettings) => {
                let Some(Snapshot::Transaction(before)) = entry.before.clone() else {
                    return Err(EditorError::RollbackTargetMissing(
                        "settings snapshot is missing".to_string(),
                    ));
                };
                let details = entry.details.clone();
                state.workspace.restore_transaction(before);
                MutationRecord {
                    action: LogAction::Updated,
                    target: LogTarget::TransactionSettings,
                    before: entry.after.clone(),
                    after: entry.before.clone(),
                    details,
                }
            }
            (LogAction::Deleted, LogTarget::ShopFile) => {
                return Err(EditorError::RollbackUnsupported(
                    "shop file deletion cannot be rolled back".to_string(),
                ));
            }
            (LogAction::Created, _) => {
                return Err(EditorError::RollbackUnsupported(
                    "rolling back a creation is not supported; delete the entity instead"
                        .to_string(),
                ));
            }
            _ => {
                return Err(EditorError::RollbackUnsupported(format!(
                    "{} {} entries cannot be rolled back",
                    entry.action.as_str(),
                    entry.target.as_str()
                )));
            }
        };

        let forward = self.record(&mut state, record).await;
        drop(state);
        self.touch_autosave();
        Ok(forward)
    }

    // ── Activity views ─────────────────────────────────────────────────

    /// Clears the activity log, in memory and in the store.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PersistenceError`] when the store clear
    /// fails (the in-memory log is cleared regardless).
    pub async fn clear_activity(&self) -> Result<(), EditorError> {
        let mut state = self.state.lock().await;
        state.activity.clear();
        drop(state);
        if let Some(store) = &self.activity_store {
            store.clear().await?;
        }
        Ok(())
    }

    // ── Saving ─────────────────────────────────────────────────────────

    /// Manually saves every dirty document and drains the unsaved queue.
    ///
    /// Returns the drained change descriptions (what the save covered).
    ///
    /// # Errors
    ///
    /// Returns the first persistence error; the queue is kept so a retry
    /// resubmits the same content.
    pub async fn save_all(&self) -> Result<Vec<UnsavedChange>, EditorError> {
        let mut state = self.state.lock().await;
        self.flush_dirty(&mut state).await?;
        Ok(state.changes.drain())
    }

    /// Serializes every document and writes the ones whose text differs
    /// from its baseline. Baselines advance only on successful writes.
    async fn flush_dirty(&self, state: &mut EditorState) -> Result<(), EditorError> {
        let mut first_error: Option<EditorError> = None;

        // Current shop.
        let shop_write = state.workspace.current().map(|current| {
            (
                current.stem.clone(),
                yaml::serialize_shop(&current.document),
            )
        });
        if let Some((stem, text)) = shop_write {
            let unchanged = state
                .workspace
                .shop_files
                .get(&stem)
                .is_some_and(|baseline| *baseline == text);
            if !unchanged {
                match self
                    .saver
                    .save(&ConfigFileStore::shop_path(&stem), text.clone())
                    .await
                {
                    Ok(_) => {
                        state.workspace.shop_files.insert(stem, text);
                    }
                    Err(e) => first_error = first_error.or(Some(e)),
                }
            }
        }

        // Menus, per source format.
        match state.workspace.menu_source {
            MenuSource::SplitFiles => {
                let writes = [
                    (
                        MAIN_MENU_FILE,
                        yaml::serialize_main_menu(&state.workspace.main_menu),
                    ),
                    (
                        PURCHASE_MENU_FILE,
                        yaml::serialize_transaction_menu(&state.workspace.purchase_menu),
                    ),
                    (
                        SELL_MENU_FILE,
                        yaml::serialize_transaction_menu(&state.workspace.sell_menu),
                    ),
                ];
                for (rel_path, text) in writes {
                    let unchanged = state
                        .workspace
                        .menu_baselines
                        .get(rel_path)
                        .is_some_and(|baseline| *baseline == text);
                    if unchanged {
                        continue;
                    }
                    match self.saver.save(rel_path, text.clone()).await {
                        Ok(_) => {
                            state
                                .workspace
                                .menu_baselines
                                .insert(rel_path.to_string(), text);
                        }
                        Err(e) => first_error = first_error.or(Some(e)),
                    }
                }
            }
            MenuSource::LegacyGui => {
                let original = state
                    .workspace
                    .menu_baselines
                    .get(LEGACY_GUI_FILE)
                    .cloned()
                    .unwrap_or_default();
                let menus = yaml::LegacyMenus {
                    main: state.workspace.main_menu.clone(),
                    purchase: state.workspace.purchase_menu.clone(),
                    sell: state.workspace.sell_menu.clone(),
                };
                let text = yaml::splice_legacy_gui(&original, &menus);
                if text != original {
                    match self.saver.save(LEGACY_GUI_FILE, text.clone()).await {
                        Ok(_) => {
                            state
                                .workspace
                                .menu_baselines
                                .insert(LEGACY_GUI_FILE.to_string(), text);
                        }
                        Err(e) => first_error = first_error.or(Some(e)),
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Debounced auto-save trigger; called after every audited mutation.
    /// Does nothing until the initial load completes.
    fn touch_autosave(self: &Arc<Self>) {
        if !self.autosave.is_ready() {
            return;
        }
        let token = self.autosave.arm();
        let service = Arc::clone(self);
        tokio::spawn(async move {
            if service.autosave.wait(token).await {
                let mut state = service.state.lock().await;
                match service.flush_dirty(&mut state).await {
                    Ok(()) => {
                        // Successful auto-save drains the queue like a
                        // manual save would.
                        state.changes.drain();
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "auto-save failed; changes kept pending");
                    }
                }
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn service() -> (TempDir, Arc<EditorService>) {
        service_with_debounce(Duration::from_secs(3_600)).await
    }

    // A debounce far beyond test runtime keeps the background auto-save
    // out of every test that does not target it.
    async fn service_with_debounce(debounce: Duration) -> (TempDir, Arc<EditorService>) {
        let Ok(dir) = TempDir::new() else {
            panic!("tempdir creation failed");
        };
        let files = Arc::new(ConfigFileStore::new(dir.path()));
        let service = Arc::new(EditorService::new(
            files,
            None,
            "admin".to_string(),
            debounce,
        ));
        let Ok(()) = service.load_all().await else {
            panic!("initial load failed");
        };
        (dir, service)
    }

    async fn service_with_shop() -> (TempDir, Arc<EditorService>) {
        let (dir, service) = service().await;
        let Ok(()) = service.create_shop("blocks").await else {
            panic!("shop creation failed");
        };
        let Ok(_) = service.open_shop("blocks").await else {
            panic!("shop open failed");
        };
        (dir, service)
    }

    fn gem(price: f64) -> ShopItem {
        ShopItem {
            material: "DIAMOND".to_string(),
            name: "&bGem".to_string(),
            price,
            ..ShopItem::default()
        }
    }

    #[tokio::test]
    async fn mutations_record_activity_and_queue_changes() {
        let (_dir, service) = service_with_shop().await;
        let Ok(_) = service.add_item(gem(100.0)).await else {
            panic!("add failed");
        };

        let entries = service.activity_entries().await;
        // create_shop + add_item
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.first().map(|e| e.action), Some(LogAction::Created));
        assert_eq!(entries.first().map(|e| e.target), Some(LogTarget::ShopItem));

        let pending = service.pending_changes().await;
        assert!(
            pending
                .iter()
                .any(|c| c.description.contains("Created item '&bGem'"))
        );
    }

    #[tokio::test]
    async fn save_all_writes_files_and_drains_queue() {
        let (dir, service) = service_with_shop().await;
        let Ok(_) = service.add_item(gem(100.0)).await else {
            panic!("add failed");
        };

        let Ok(drained) = service.save_all().await else {
            panic!("save failed");
        };
        assert!(!drained.is_empty());
        assert!(service.pending_changes().await.is_empty());

        let Ok(text) = tokio::fs::read_to_string(dir.path().join("shops/blocks.yml")).await
        else {
            panic!("shop file missing");
        };
        assert!(text.contains("material: 'DIAMOND'"));
    }

    #[tokio::test]
    async fn unchanged_documents_are_not_rewritten() {
        let (dir, service) = service_with_shop().await;
        let Ok(_) = service.save_all().await else {
            panic!("save failed");
        };

        // Poison the on-disk file; an unchanged save must not touch it.
        let path = dir.path().join("shops/blocks.yml");
        let Ok(()) = tokio::fs::write(&path, "poisoned").await else {
            panic!("write failed");
        };
        let Ok(_) = service.save_all().await else {
            panic!("save failed");
        };
        let Ok(text) = tokio::fs::read_to_string(&path).await else {
            panic!("read failed");
        };
        assert_eq!(text, "poisoned");
    }

    #[tokio::test]
    async fn switching_shops_persists_the_previous_one() {
        let (dir, service) = service_with_shop().await;
        let Ok(_) = service.add_item(gem(100.0)).await else {
            panic!("add failed");
        };
        let Ok(()) = service.create_shop("food").await else {
            panic!("create failed");
        };
        let Ok(_) = service.open_shop("food").await else {
            panic!("open failed");
        };

        let Ok(text) = tokio::fs::read_to_string(dir.path().join("shops/blocks.yml")).await
        else {
            panic!("previous shop not persisted");
        };
        assert!(text.contains("material: 'DIAMOND'"));
        assert!(service.pending_changes().await.is_empty());
    }

    #[tokio::test]
    async fn duplicate_shop_stem_is_rejected() {
        let (_dir, service) = service_with_shop().await;
        assert!(matches!(
            service.create_shop("blocks").await,
            Err(EditorError::DuplicateShopFile(_))
        ));
    }

    #[tokio::test]
    async fn rollback_of_update_restores_before_and_logs_swapped_entry() {
        let (_dir, service) = service_with_shop().await;
        let Ok(id) = service.add_item(gem(100.0)).await else {
            panic!("add failed");
        };
        let Ok(()) = service.update_item(id, gem(80.0)).await else {
            panic!("update failed");
        };

        let entries = service.activity_entries().await;
        let Some(update_entry) = entries.iter().find(|e| {
            e.action == LogAction::Updated && e.target == LogTarget::ShopItem
        }) else {
            panic!("missing update entry");
        };
        let Ok(forward) = service.rollback(&update_entry.id).await else {
            panic!("rollback failed");
        };

        // The live item is back at the before state, id preserved.
        let Some((_, doc)) = service.current_shop().await else {
            panic!("no current shop");
        };
        let Some(item) = doc.item(id) else {
            panic!("item vanished");
        };
        assert_eq!(item.price, 100.0);

        // The forward entry swaps before and after.
        assert_eq!(forward.action, LogAction::Updated);
        let Some(Snapshot::Item(fb)) = &forward.before else {
            panic!("missing forward before");
        };
        let Some(Snapshot::Item(fa)) = &forward.after else {
            panic!("missing forward after");
        };
        assert_eq!(fb.price, 80.0);
        assert_eq!(fa.price, 100.0);

        // The original entry is untouched.
        let entries = service.activity_entries().await;
        assert!(entries.iter().any(|e| e.id == update_entry.id));
    }

    #[tokio::test]
    async fn rollback_of_deleted_item_remints_identity() {
        let (_dir, service) = service_with_shop().await;
        let Ok(id) = service.add_item(gem(100.0)).await else {
            panic!("add failed");
        };
        let Ok(()) = service.remove_item(id).await else {
            panic!("remove failed");
        };

        let entries = service.activity_entries().await;
        let Some(delete_entry) = entries
            .iter()
            .find(|e| e.action == LogAction::Deleted)
        else {
            panic!("missing delete entry");
        };
        let Ok(forward) = service.rollback(&delete_entry.id).await else {
            panic!("rollback failed");
        };
        assert_eq!(forward.action, LogAction::Created);

        let Some((_, doc)) = service.current_shop().await else {
            panic!("no current shop");
        };
        assert_eq!(doc.items.len(), 1);
        let Some(restored) = doc.items.first() else {
            panic!("item missing");
        };
        assert_eq!(restored.name, "&bGem");
        assert_ne!(restored.id, id);
    }

    #[tokio::test]
    async fn rollback_of_missing_target_reports_and_keeps_log() {
        let (_dir, service) = service_with_shop().await;
        let Ok(id) = service.add_item(gem(100.0)).await else {
            panic!("add failed");
        };
        let Ok(()) = service.update_item(id, gem(80.0)).await else {
            panic!("update failed");
        };
        let Ok(()) = service.remove_item(id).await else {
            panic!("remove failed");
        };

        let entries = service.activity_entries().await;
        let Some(update_entry) = entries
            .iter()
            .find(|e| e.action == LogAction::Updated)
        else {
            panic!("missing update entry");
        };
        let before_len = entries.len();

        let result = service.rollback(&update_entry.id).await;
        assert!(matches!(
            result,
            Err(EditorError::RollbackTargetMissing(_))
        ));
        assert_eq!(service.activity_entries().await.len(), before_len);
    }

    #[tokio::test]
    async fn rollback_of_shop_file_deletion_is_unsupported() {
        let (_dir, service) = service_with_shop().await;
        let Ok(()) = service.delete_shop("blocks").await else {
            panic!("delete failed");
        };

        let entries = service.activity_entries().await;
        let Some(delete_entry) = entries
            .iter()
            .find(|e| e.target == LogTarget::ShopFile && e.action == LogAction::Deleted)
        else {
            panic!("missing delete entry");
        };
        assert!(matches!(
            service.rollback(&delete_entry.id).await,
            Err(EditorError::RollbackUnsupported(_))
        ));
    }

    #[tokio::test]
    async fn rollback_of_creation_is_unsupported() {
        let (_dir, service) = service_with_shop().await;
        let Ok(_) = service.add_item(gem(100.0)).await else {
            panic!("add failed");
        };
        let entries = service.activity_entries().await;
        let Some(create_entry) = entries
            .iter()
            .find(|e| e.action == LogAction::Created && e.target == LogTarget::ShopItem)
        else {
            panic!("missing create entry");
        };
        assert!(matches!(
            service.rollback(&create_entry.id).await,
            Err(EditorError::RollbackUnsupported(_))
        ));
    }

    #[tokio::test]
    async fn slot_conflict_surfaces_through_the_service() {
        let (_dir, service) = service().await;
        let mut first = MainMenuButton::with_key("blocks");
        first.material = "STONE".to_string();
        first.slot = Slot::new(10).unwrap_or_default();
        let Ok(()) = service.upsert_menu_button(first).await else {
            panic!("first button failed");
        };

        let mut second = MainMenuButton::with_key("food");
        second.material = "BREAD".to_string();
        second.slot = Slot::new(10).unwrap_or_default();
        let Err(EditorError::SlotConflict { occupied_by, .. }) =
            service.upsert_menu_button(second).await
        else {
            panic!("expected slot conflict");
        };
        assert_eq!(occupied_by, "buttons.blocks");
    }

    #[tokio::test]
    async fn resync_discards_memory_and_drains_queue() {
        let (_dir, service) = service_with_shop().await;
        let Ok(_) = service.add_item(gem(100.0)).await else {
            panic!("add failed");
        };
        let Ok(()) = service
            .update_menu_settings("&8Shop".to_string(), 4)
            .await
        else {
            panic!("menu update failed");
        };
        assert!(!service.pending_changes().await.is_empty());

        let Ok(_) = service.resync().await else {
            panic!("resync failed");
        };
        assert!(service.pending_changes().await.is_empty());
        // The item was never saved, so the resynced state lost it.
        assert!(service.current_shop().await.is_none());
        assert_eq!(service.main_menu().await.rows, 3);
    }

    #[tokio::test]
    async fn legacy_gui_round_trips_through_splice_on_save() {
        let Ok(dir) = TempDir::new() else {
            panic!("tempdir creation failed");
        };
        let legacy = "# managed by hand\nmenus:\n  main:\n    title: '&8Old'\n    rows: 3\n  purchase:\n    title-prefix: '&8Buying'\n  sell:\n    title-prefix: '&8Selling'\n";
        let Ok(()) = std::fs::write(dir.path().join("gui.yml"), legacy) else {
            panic!("seed write failed");
        };

        let files = Arc::new(ConfigFileStore::new(dir.path()));
        let service = Arc::new(EditorService::new(
            files,
            None,
            "admin".to_string(),
            Duration::from_secs(3_600),
        ));
        let Ok(()) = service.load_all().await else {
            panic!("load failed");
        };
        assert_eq!(service.main_menu().await.title, "&8Old");

        let Ok(()) = service
            .update_menu_settings("&8New".to_string(), 4)
            .await
        else {
            panic!("menu update failed");
        };
        let Ok(_) = service.save_all().await else {
            panic!("save failed");
        };

        let Ok(text) = std::fs::read_to_string(dir.path().join("gui.yml")) else {
            panic!("gui.yml missing");
        };
        assert!(text.starts_with("# managed by hand\nmenus:\n"));
        assert!(text.contains("    title: '&8New'\n"));
        // No split files were created in legacy mode.
        assert!(!dir.path().join("menu.yml").exists());
    }

    #[tokio::test]
    async fn autosave_fires_after_the_debounce_window() {
        let (dir, service) = service_with_debounce(Duration::from_millis(50)).await;
        let Ok(()) = service.create_shop("blocks").await else {
            panic!("shop creation failed");
        };
        let Ok(_) = service.open_shop("blocks").await else {
            panic!("shop open failed");
        };
        let Ok(_) = service.add_item(gem(100.0)).await else {
            panic!("add failed");
        };

        // Wait out the debounce window and the background write.
        let shop_path = dir.path().join("shops/blocks.yml");
        let mut saved = false;
        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if let Ok(text) = tokio::fs::read_to_string(&shop_path).await {
                if text.contains("material: 'DIAMOND'") {
                    saved = true;
                    break;
                }
            }
        }
        assert!(saved, "autosave did not write the shop");
        // The queue drains right after the write lands.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(service.pending_changes().await.is_empty());
    }
}
