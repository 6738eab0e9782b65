//! Domain layer: document model, audit vocabulary, and the editor state store.
//!
//! This module contains the data model for every YAML-backed document the
//! editor manages (shop files, main menu, transaction menus), the slot
//! grid invariant, the activity log entry types with snapshot diffing, and
//! the [`EditorWorkspace`] that holds all loaded documents as the single
//! mutable source of truth.

pub mod activity;
pub mod menu;
pub mod shop;
pub mod slot;
pub mod transaction;
pub mod workspace;

pub use activity::{
    ActivityLogEntry, FieldChange, LogAction, LogTarget, MenuSettingsSnapshot, ShopFileSnapshot,
    ShopSettingsSnapshot, Snapshot, diff, summarize,
};
pub use menu::{MainMenuButton, MainMenuState};
pub use shop::{ItemLoreSettings, ShopDocument, ShopItem};
pub use slot::Slot;
pub use transaction::{
    ActionButton, ActionButtonKind, AmountButton, AmountButtonGroup, AmountGroupKind,
    TransactionKind, TransactionMenuSettings,
};
pub use workspace::{
    CurrentShop, EditorWorkspace, MenuSource, MutationRecord, TransactionScalars,
};
