//! The editor state store: all loaded documents as one mutable source of truth.
//!
//! [`EditorWorkspace`] owns the current shop document, the raw-text cache
//! of every known shop file (the "did this actually change" baseline), the
//! main menu, and both transaction-menu settings instances. Every mutation
//! entry point validates structural invariants before applying anything;
//! on success it returns a [`MutationRecord`] with deep before/after
//! snapshots for the activity log. Conflicts leave state untouched.
//!
//! The workspace is fully synchronous and self-contained, so tests can
//! spin up independent instances without any ambient state.

use std::collections::HashMap;

use super::activity::{
    LogAction, LogTarget, MenuSettingsSnapshot, ShopSettingsSnapshot, Snapshot,
};
use super::menu::{MainMenuButton, MainMenuState};
use super::shop::{ShopDocument, ShopItem};
use super::slot::Slot;
use super::transaction::{
    ActionButton, ActionButtonKind, AmountButton, AmountGroupKind, TransactionKind,
    TransactionMenuSettings,
};
use crate::error::EditorError;

/// Where the menu documents were loaded from and where they save back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSource {
    /// The split-file format: `menu.yml`, `purchase.yml`, `sell.yml`.
    SplitFiles,
    /// The deprecated combined `gui.yml`, written back via splice.
    LegacyGui,
}

/// Everything the activity log needs to know about one applied mutation.
#[derive(Debug, Clone)]
pub struct MutationRecord {
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

/// The currently open shop document and its file stem.
#[derive(Debug, Clone)]
pub struct CurrentShop {
    /// File stem (filename without `.yml`).
    pub stem: String,
    /// The parsed document being edited.
    pub document: ShopDocument,
}

/// Scalar (non-slot) fields of a transaction menu, updated as one unit.
#[derive(Debug, Clone)]
pub struct TransactionScalars {
    /// Title prefix shown before the item name.
    pub title_prefix: String,
    /// Material of the central display item.
    pub display_material: String,
    /// Upper bound on the pending transaction amount.
    pub max_amount: u32,
    /// Material of the add-buttons group.
    pub add_material: String,
    /// Material of the remove-buttons group.
    pub remove_material: String,
    /// Material of the set-buttons group.
    pub set_material: String,
}

/// Mutable document store for one editing session.
#[derive(Debug)]
pub struct EditorWorkspace {
    /// Raw YAML text of every known shop file, keyed by stem. Doubles as
    /// the baseline for the skip-save-if-unchanged optimization.
    pub shop_files: HashMap<String, String>,
    /// Raw-text baselines of the menu files, keyed by relative path
    /// (`menu.yml`, `purchase.yml`, `sell.yml`, `gui.yml`).
    pub menu_baselines: HashMap<String, String>,
    /// Main menu document.
    pub main_menu: MainMenuState,
    /// Purchase menu settings.
    pub purchase_menu: TransactionMenuSettings,
    /// Sell menu settings.
    pub sell_menu: TransactionMenuSettings,
    /// Which on-disk format the menus round-trip through.
    pub menu_source: MenuSource,
    current: Option<CurrentShop>,
    next_item_id: u64,
}

impl Default for EditorWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorWorkspace {
    /// Creates an empty workspace with default menus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shop_files: HashMap::new(),
            menu_baselines: HashMap::new(),
            main_menu: MainMenuState::default(),
            purchase_menu: TransactionMenuSettings::defaults(TransactionKind::Purchase),
            sell_menu: TransactionMenuSettings::defaults(TransactionKind::Sell),
            menu_source: MenuSource::SplitFiles,
            current: None,
            next_item_id: 0,
        }
    }

    /// The currently open shop, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&CurrentShop> {
        self.current.as_ref()
    }

    /// The currently open shop, mutably.
    pub const fn current_mut(&mut self) -> Option<&mut CurrentShop> {
        self.current.as_mut()
    }

    /// Replaces the current shop with a freshly parsed document.
    ///
    /// Item ids reset to 0 and are re-minted in document order: ids are
    /// unique only within the currently loaded shop file.
    pub fn set_current_shop(&mut self, stem: &str, mut document: ShopDocument) {
        self.next_item_id = 0;
        for item in &mut document.items {
            item.id = self.mint_item_id();
        }
        self.current = Some(CurrentShop {
            stem: stem.to_string(),
            document,
        });
    }

    /// Clears the current shop (used when its file is deleted).
    pub fn clear_current_shop(&mut self) {
        self.current = None;
    }

    fn mint_item_id(&mut self) -> u64 {
        let id = self.next_item_id;
        self.next_item_id += 1;
        id
    }

    fn current_shop_mut(&mut self) -> Result<&mut CurrentShop, EditorError> {
        self.current.as_mut().ok_or(EditorError::NoShopOpen)
    }

    fn shop_details(stem: &str) -> String {
        format!("{stem}.yml")
    }

    // ── Shop items ─────────────────────────────────────────────────────

    /// Adds an item to the current shop, minting its id.
    ///
    /// The `id` field of `fields` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoShopOpen`] when no shop is open.
    pub fn add_item(&mut self, fields: ShopItem) -> Result<(u64, MutationRecord), EditorError> {
        self.current_shop_mut()?;
        let id = self.mint_item_id();
        let current = self.current_shop_mut()?;
        let mut item = fields;
        item.id = id;
        current.document.items.push(item.clone());
        let details = Self::shop_details(&current.stem);
        Ok((
            id,
            MutationRecord {
                action: LogAction::Created,
                target: LogTarget::ShopItem,
                before: None,
                after: Some(Snapshot::Item(item)),
                details,
            },
        ))
    }

    /// Overwrites every field of the item with the given id (id preserved).
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoShopOpen`] or [`EditorError::ItemNotFound`].
    pub fn update_item(
        &mut self,
        id: u64,
        fields: ShopItem,
    ) -> Result<MutationRecord, EditorError> {
        let current = self.current_shop_mut()?;
        let details = Self::shop_details(&current.stem);
        let item = current
            .document
            .item_mut(id)
            .ok_or(EditorError::ItemNotFound(id))?;
        let before = item.clone();
        item.apply_snapshot(&fields);
        let after = item.clone();
        Ok(MutationRecord {
            action: LogAction::Updated,
            target: LogTarget::ShopItem,
            before: Some(Snapshot::Item(before)),
            after: Some(Snapshot::Item(after)),
            details,
        })
    }

    /// Removes the item with the given id from the current shop.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoShopOpen`] or [`EditorError::ItemNotFound`].
    pub fn remove_item(&mut self, id: u64) -> Result<MutationRecord, EditorError> {
        let current = self.current_shop_mut()?;
        let position = current
            .document
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(EditorError::ItemNotFound(id))?;
        let removed = current.document.items.remove(position);
        let details = Self::shop_details(&current.stem);
        Ok(MutationRecord {
            action: LogAction::Deleted,
            target: LogTarget::ShopItem,
            before: Some(Snapshot::Item(removed)),
            after: None,
            details,
        })
    }

    /// Locates a live item by the best-effort id-or-name heuristic used by
    /// rollback: a single pass, first item whose id or name matches wins.
    ///
    /// Ambiguous when several items share a name; kept as-is deliberately.
    pub fn find_item_by_id_or_name(
        &mut self,
        id: u64,
        name: &str,
    ) -> Option<&mut ShopItem> {
        let current = self.current.as_mut()?;
        current
            .document
            .items
            .iter_mut()
            .find(|i| i.id == id || i.name == name)
    }

    /// Overwrites the current shop's settings block.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoShopOpen`], or
    /// [`EditorError::InvalidRequest`] when `rows` is outside 1–5.
    pub fn update_shop_settings(
        &mut self,
        settings: ShopSettingsSnapshot,
    ) -> Result<MutationRecord, EditorError> {
        if !(1..=5).contains(&settings.rows) {
            return Err(EditorError::InvalidRequest(format!(
                "shop rows must be 1-5, got {}",
                settings.rows
            )));
        }
        let current = self.current_shop_mut()?;
        let before = ShopSettingsSnapshot {
            gui_name: current.document.gui_name.clone(),
            rows: current.document.rows,
            permission: current.document.permission.clone(),
            available_times: current.document.available_times.clone(),
            item_lore: current.document.item_lore.clone(),
        };
        current.document.gui_name = settings.gui_name.clone();
        current.document.rows = settings.rows;
        current.document.permission = settings.permission.clone();
        current.document.available_times = settings.available_times.clone();
        current.document.item_lore = settings.item_lore.clone();
        let details = Self::shop_details(&current.stem);
        Ok(MutationRecord {
            action: LogAction::Updated,
            target: LogTarget::ShopSettings,
            before: Some(Snapshot::ShopSettings(before)),
            after: Some(Snapshot::ShopSettings(settings)),
            details,
        })
    }

    // ── Shop files ─────────────────────────────────────────────────────

    /// Registers a brand-new shop file.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::DuplicateShopFile`] when the stem is taken,
    /// or [`EditorError::InvalidRequest`] for a non-identifier stem.
    pub fn create_shop_file(&mut self, stem: &str) -> Result<(), EditorError> {
        if !is_identifier_safe(stem) {
            return Err(EditorError::InvalidRequest(format!(
                "shop file name must be alphanumeric/dash/underscore: {stem}"
            )));
        }
        if self.shop_files.contains_key(stem) {
            return Err(EditorError::DuplicateShopFile(stem.to_string()));
        }
        self.shop_files.insert(stem.to_string(), String::new());
        Ok(())
    }

    /// Forgets a shop file, clearing the current document if it was open.
    ///
    /// Returns the cached raw text.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ShopNotFound`] for an unknown stem.
    pub fn remove_shop_file(&mut self, stem: &str) -> Result<String, EditorError> {
        let text = self
            .shop_files
            .remove(stem)
            .ok_or_else(|| EditorError::ShopNotFound(stem.to_string()))?;
        if self.current.as_ref().is_some_and(|c| c.stem == stem) {
            self.current = None;
        }
        Ok(text)
    }

    // ── Main menu ──────────────────────────────────────────────────────

    /// Checks whether `slot` is used by a main-menu button other than
    /// `exclude_key`. Returns the occupant's location string on conflict.
    #[must_use]
    pub fn menu_slot_conflict(&self, slot: Slot, exclude_key: &str) -> Option<String> {
        self.main_menu
            .buttons
            .iter()
            .find(|b| b.slot == slot && b.key != exclude_key)
            .map(|b| format!("buttons.{}", b.key))
    }

    /// Inserts or replaces a main-menu button.
    ///
    /// Editing a button onto its own current slot succeeds; any other
    /// collision is rejected before state changes.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SlotConflict`] on a slot collision, or
    /// [`EditorError::InvalidRequest`] for a non-identifier key.
    pub fn upsert_button(
        &mut self,
        button: MainMenuButton,
    ) -> Result<MutationRecord, EditorError> {
        if !is_identifier_safe(&button.key) {
            return Err(EditorError::InvalidRequest(format!(
                "button key must be alphanumeric/dash/underscore: {}",
                button.key
            )));
        }
        if let Some(occupied_by) = self.menu_slot_conflict(button.slot, &button.key) {
            return Err(EditorError::SlotConflict {
                slot: button.slot,
                occupied_by,
            });
        }
        match self.main_menu.button_mut(&button.key) {
            Some(existing) => {
                let before = existing.clone();
                *existing = button.clone();
                Ok(MutationRecord {
                    action: LogAction::Updated,
                    target: LogTarget::MenuButton,
                    before: Some(Snapshot::Button(before)),
                    after: Some(Snapshot::Button(button)),
                    details: "main menu".to_string(),
                })
            }
            None => {
                self.main_menu.buttons.push(button.clone());
                Ok(MutationRecord {
                    action: LogAction::Created,
                    target: LogTarget::MenuButton,
                    before: None,
                    after: Some(Snapshot::Button(button)),
                    details: "main menu".to_string(),
                })
            }
        }
    }

    /// Removes a main-menu button by key.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ButtonNotFound`] for an unknown key.
    pub fn remove_button(&mut self, key: &str) -> Result<MutationRecord, EditorError> {
        let position = self
            .main_menu
            .buttons
            .iter()
            .position(|b| b.key == key)
            .ok_or_else(|| EditorError::ButtonNotFound(key.to_string()))?;
        let removed = self.main_menu.buttons.remove(position);
        Ok(MutationRecord {
            action: LogAction::Deleted,
            target: LogTarget::MenuButton,
            before: Some(Snapshot::Button(removed)),
            after: None,
            details: "main menu".to_string(),
        })
    }

    /// Updates the main-menu title and row count.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidRequest`] when `rows` is outside 1–6.
    pub fn update_menu_settings(
        &mut self,
        title: String,
        rows: u8,
    ) -> Result<MutationRecord, EditorError> {
        if !(1..=6).contains(&rows) {
            return Err(EditorError::InvalidRequest(format!(
                "menu rows must be 1-6, got {rows}"
            )));
        }
        let before = MenuSettingsSnapshot {
            title: self.main_menu.title.clone(),
            rows: self.main_menu.rows,
        };
        self.main_menu.title = title.clone();
        self.main_menu.rows = rows;
        Ok(MutationRecord {
            action: LogAction::Updated,
            target: LogTarget::MenuSettings,
            before: Some(Snapshot::MenuSettings(before)),
            after: Some(Snapshot::MenuSettings(MenuSettingsSnapshot { title, rows })),
            details: "main menu".to_string(),
        })
    }

    // ── Transaction menus ──────────────────────────────────────────────

    /// The settings instance for the given menu kind.
    #[must_use]
    pub const fn transaction(&self, kind: TransactionKind) -> &TransactionMenuSettings {
        match kind {
            TransactionKind::Purchase => &self.purchase_menu,
            TransactionKind::Sell => &self.sell_menu,
        }
    }

    const fn transaction_mut(&mut self, kind: TransactionKind) -> &mut TransactionMenuSettings {
        match kind {
            TransactionKind::Purchase => &mut self.purchase_menu,
            TransactionKind::Sell => &mut self.sell_menu,
        }
    }

    fn transaction_record(
        kind: TransactionKind,
        before: TransactionMenuSettings,
        after: TransactionMenuSettings,
    ) -> MutationRecord {
        MutationRecord {
            action: LogAction::Updated,
            target: LogTarget::TransactionSettings,
            before: Some(Snapshot::Transaction(before)),
            after: Some(Snapshot::Transaction(after)),
            details: format!("{kind} menu"),
        }
    }

    /// Updates the scalar (non-slot) fields of a transaction menu.
    ///
    /// # Errors
    ///
    /// Currently infallible but kept fallible for parity with the other
    /// mutation entry points.
    pub fn update_transaction_scalars(
        &mut self,
        kind: TransactionKind,
        scalars: TransactionScalars,
    ) -> Result<MutationRecord, EditorError> {
        let settings = self.transaction_mut(kind);
        let before = settings.clone();
        settings.title_prefix = scalars.title_prefix;
        settings.display_material = scalars.display_material;
        settings.max_amount = scalars.max_amount.max(1);
        settings.add_buttons.material = scalars.add_material;
        settings.remove_buttons.material = scalars.remove_material;
        settings.set_buttons.material = scalars.set_material;
        let after = settings.clone();
        Ok(Self::transaction_record(kind, before, after))
    }

    /// Moves the display item of a transaction menu.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SlotConflict`] when the slot is taken by
    /// another element of the same menu.
    pub fn set_transaction_display(
        &mut self,
        kind: TransactionKind,
        material: String,
        slot: Slot,
    ) -> Result<MutationRecord, EditorError> {
        let settings = self.transaction_mut(kind);
        if let Some(occupied_by) = settings.slot_conflict(slot, "display") {
            return Err(EditorError::SlotConflict { slot, occupied_by });
        }
        let before = settings.clone();
        settings.display_material = material;
        settings.display_slot = slot;
        let after = settings.clone();
        Ok(Self::transaction_record(kind, before, after))
    }

    /// Replaces one of the fixed action buttons of a transaction menu.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SlotConflict`] on a collision, or
    /// [`EditorError::InvalidRequest`] for `sell-all` on the purchase menu.
    pub fn set_action_button(
        &mut self,
        kind: TransactionKind,
        which: ActionButtonKind,
        button: ActionButton,
    ) -> Result<MutationRecord, EditorError> {
        if which == ActionButtonKind::SellAll && kind == TransactionKind::Purchase {
            return Err(EditorError::InvalidRequest(
                "the purchase menu has no sell-all button".to_string(),
            ));
        }
        let settings = self.transaction_mut(kind);
        let location = format!("buttons.{}", which.yaml_key());
        if let Some(occupied_by) = settings.slot_conflict(button.slot, &location) {
            return Err(EditorError::SlotConflict {
                slot: button.slot,
                occupied_by,
            });
        }
        let before = settings.clone();
        match which {
            ActionButtonKind::Confirm => settings.confirm = button,
            ActionButtonKind::Cancel => settings.cancel = button,
            ActionButtonKind::Back => settings.back = button,
            ActionButtonKind::SellAll => settings.sell_all = Some(button),
        }
        let after = settings.clone();
        Ok(Self::transaction_record(kind, before, after))
    }

    /// Inserts or replaces an amount button in the given group.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::SlotConflict`] on a collision naming the
    /// occupant's location string.
    pub fn upsert_amount_button(
        &mut self,
        kind: TransactionKind,
        group: AmountGroupKind,
        amount_key: &str,
        button: AmountButton,
    ) -> Result<MutationRecord, EditorError> {
        let settings = self.transaction_mut(kind);
        let location = format!("{}.amounts.{amount_key}", group.yaml_key());
        if let Some(occupied_by) = settings.slot_conflict(button.slot, &location) {
            return Err(EditorError::SlotConflict {
                slot: button.slot,
                occupied_by,
            });
        }
        let before = settings.clone();
        settings
            .group_mut(group)
            .amounts
            .insert(amount_key.to_string(), button);
        let after = settings.clone();
        Ok(Self::transaction_record(kind, before, after))
    }

    /// Removes an amount button from the given group.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ButtonNotFound`] for an unknown amount key.
    pub fn remove_amount_button(
        &mut self,
        kind: TransactionKind,
        group: AmountGroupKind,
        amount_key: &str,
    ) -> Result<MutationRecord, EditorError> {
        let settings = self.transaction_mut(kind);
        let before = settings.clone();
        if settings.group_mut(group).amounts.remove(amount_key).is_none() {
            return Err(EditorError::ButtonNotFound(format!(
                "{}.amounts.{amount_key}",
                group.yaml_key()
            )));
        }
        let after = settings.clone();
        Ok(Self::transaction_record(kind, before, after))
    }

    /// Replaces a whole transaction-settings instance (used by rollback).
    pub fn restore_transaction(&mut self, snapshot: TransactionMenuSettings) {
        match snapshot.kind {
            TransactionKind::Purchase => self.purchase_menu = snapshot,
            TransactionKind::Sell => self.sell_menu = snapshot,
        }
    }
}

/// Accepts stems and button keys made of ASCII alphanumerics, `-`, `_`.
fn is_identifier_safe(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn workspace_with_shop() -> EditorWorkspace {
        let mut ws = EditorWorkspace::new();
        ws.shop_files
            .insert("blocks".to_string(), String::new());
        ws.set_current_shop("blocks", ShopDocument::default());
        ws
    }

    fn button(key: &str, slot: u8) -> MainMenuButton {
        let mut b = MainMenuButton::with_key(key);
        b.slot = Slot::new(slot).unwrap_or_default();
        b.material = "STONE".to_string();
        b
    }

    #[test]
    fn add_item_mints_sequential_ids() {
        let mut ws = workspace_with_shop();
        let Ok((first, _)) = ws.add_item(ShopItem::default()) else {
            panic!("add failed");
        };
        let Ok((second, _)) = ws.add_item(ShopItem::default()) else {
            panic!("add failed");
        };
        assert_eq!(second, first + 1);
    }

    #[test]
    fn item_ids_reset_when_switching_shop() {
        let mut ws = workspace_with_shop();
        let _ = ws.add_item(ShopItem::default());
        let _ = ws.add_item(ShopItem::default());

        let mut doc = ShopDocument::default();
        doc.items.push(ShopItem::default());
        ws.set_current_shop("food", doc);

        let Some(current) = ws.current() else {
            panic!("no current shop");
        };
        assert_eq!(current.document.items.first().map(|i| i.id), Some(0));
    }

    #[test]
    fn add_item_without_open_shop_is_rejected() {
        let mut ws = EditorWorkspace::new();
        assert!(matches!(
            ws.add_item(ShopItem::default()),
            Err(EditorError::NoShopOpen)
        ));
    }

    #[test]
    fn update_item_snapshots_before_and_after() {
        let mut ws = workspace_with_shop();
        let Ok((id, _)) = ws.add_item(ShopItem {
            name: "&bGem".to_string(),
            price: 100.0,
            ..ShopItem::default()
        }) else {
            panic!("add failed");
        };

        let Ok(record) = ws.update_item(
            id,
            ShopItem {
                name: "&bGem".to_string(),
                price: 80.0,
                ..ShopItem::default()
            },
        ) else {
            panic!("update failed");
        };

        let Some(Snapshot::Item(before)) = record.before else {
            panic!("missing before snapshot");
        };
        let Some(Snapshot::Item(after)) = record.after else {
            panic!("missing after snapshot");
        };
        assert_eq!(before.price, 100.0);
        assert_eq!(after.price, 80.0);
        assert_eq!(after.id, id);
    }

    #[test]
    fn remove_item_unknown_id_is_rejected() {
        let mut ws = workspace_with_shop();
        assert!(matches!(
            ws.remove_item(99),
            Err(EditorError::ItemNotFound(99))
        ));
    }

    #[test]
    fn find_item_by_id_or_name_single_pass() {
        let mut ws = workspace_with_shop();
        let _ = ws.add_item(ShopItem {
            name: "Stone".to_string(),
            ..ShopItem::default()
        });
        let _ = ws.add_item(ShopItem {
            name: "Gem".to_string(),
            ..ShopItem::default()
        });

        // Name match on the first item wins over an id match further down.
        let Some(found) = ws.find_item_by_id_or_name(1, "Stone") else {
            panic!("expected a match");
        };
        assert_eq!(found.name, "Stone");
    }

    #[test]
    fn duplicate_shop_file_is_rejected() {
        let mut ws = workspace_with_shop();
        assert!(matches!(
            ws.create_shop_file("blocks"),
            Err(EditorError::DuplicateShopFile(_))
        ));
        assert!(ws.create_shop_file("food").is_ok());
    }

    #[test]
    fn deleting_open_shop_clears_current() {
        let mut ws = workspace_with_shop();
        let Ok(_) = ws.remove_shop_file("blocks") else {
            panic!("remove failed");
        };
        assert!(ws.current().is_none());
    }

    #[test]
    fn menu_slot_collision_rejected_and_state_unchanged() {
        let mut ws = EditorWorkspace::new();
        let Ok(_) = ws.upsert_button(button("blocks", 10)) else {
            panic!("first insert failed");
        };

        let err = ws.upsert_button(button("food", 10));
        let Err(EditorError::SlotConflict { occupied_by, .. }) = err else {
            panic!("expected slot conflict");
        };
        assert_eq!(occupied_by, "buttons.blocks");
        assert_eq!(ws.main_menu.buttons.len(), 1);
    }

    #[test]
    fn editing_button_onto_its_own_slot_succeeds() {
        let mut ws = EditorWorkspace::new();
        let _ = ws.upsert_button(button("blocks", 10));

        let mut edited = button("blocks", 10);
        edited.name = "&aBlocks".to_string();
        let Ok(record) = ws.upsert_button(edited) else {
            panic!("self-slot edit rejected");
        };
        assert_eq!(record.action, LogAction::Updated);
    }

    #[test]
    fn menu_rows_out_of_range_rejected() {
        let mut ws = EditorWorkspace::new();
        assert!(ws.update_menu_settings("&8Shop".to_string(), 7).is_err());
        assert!(ws.update_menu_settings("&8Shop".to_string(), 6).is_ok());
    }

    #[test]
    fn amount_button_slot_conflict_names_first_occupant() {
        let mut ws = EditorWorkspace::new();
        let Ok(slot) = Slot::new(22) else {
            panic!("valid slot");
        };
        // Move the display out of slot 22 first so the amount button can take it.
        let Ok(free) = Slot::new(4) else {
            panic!("valid slot");
        };
        let Ok(_) = ws.set_transaction_display(
            TransactionKind::Purchase,
            "CHEST".to_string(),
            free,
        ) else {
            panic!("display move failed");
        };

        let Ok(_) = ws.upsert_amount_button(
            TransactionKind::Purchase,
            AmountGroupKind::Add,
            "1",
            AmountButton {
                name: "&a+1".to_string(),
                slot,
            },
        ) else {
            panic!("first amount button failed");
        };

        let err = ws.upsert_amount_button(
            TransactionKind::Purchase,
            AmountGroupKind::Remove,
            "1",
            AmountButton {
                name: "&c-1".to_string(),
                slot,
            },
        );
        let Err(EditorError::SlotConflict { occupied_by, .. }) = err else {
            panic!("expected slot conflict");
        };
        assert_eq!(occupied_by, "add-buttons.amounts.1");
        assert!(
            ws.transaction(TransactionKind::Purchase)
                .remove_buttons
                .amounts
                .is_empty()
        );
    }

    #[test]
    fn sell_all_rejected_on_purchase_menu() {
        let mut ws = EditorWorkspace::new();
        let result = ws.set_action_button(
            TransactionKind::Purchase,
            ActionButtonKind::SellAll,
            ActionButton::default(),
        );
        assert!(matches!(result, Err(EditorError::InvalidRequest(_))));
    }

    #[test]
    fn display_slot_counts_toward_uniqueness() {
        let mut ws = EditorWorkspace::new();
        let display_slot = ws.transaction(TransactionKind::Sell).display_slot;
        let err = ws.upsert_amount_button(
            TransactionKind::Sell,
            AmountGroupKind::Set,
            "64",
            AmountButton {
                name: "&eSet to 64".to_string(),
                slot: display_slot,
            },
        );
        let Err(EditorError::SlotConflict { occupied_by, .. }) = err else {
            panic!("expected slot conflict");
        };
        assert_eq!(occupied_by, "display");
    }
}
