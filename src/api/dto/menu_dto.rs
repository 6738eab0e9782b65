//! Main-menu and transaction-menu request DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{
    ActionButton, AmountButton, MainMenuButton, Slot, TransactionScalars,
};
use crate::error::EditorError;

fn slot(raw: u8) -> Result<Slot, EditorError> {
    Slot::new(raw)
}

/// `PUT /menu/settings` request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MenuSettingsRequest {
    /// Menu title.
    pub title: String,
    /// Grid rows, 1–6.
    pub rows: u8,
}

/// `PUT /menu/buttons/{key}` request; the key comes from the path.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MenuButtonRequest {
    /// Grid slot, 0–53.
    pub slot: u8,
    /// Material token.
    pub material: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Ordered lore lines.
    #[serde(default)]
    pub lore: Vec<String>,
    /// Shop file stem this button opens; empty = no action.
    #[serde(default)]
    pub shop: String,
    /// Permission node; empty = unrestricted.
    #[serde(default)]
    pub permission: String,
    /// Hide the attribute modifiers tooltip section.
    #[serde(default)]
    pub hide_attributes: bool,
    /// Hide the additional tooltip section.
    #[serde(default)]
    pub hide_additional: bool,
}

impl MenuButtonRequest {
    /// Converts into a domain button under the given key.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidSlot`] for an out-of-grid slot.
    pub fn into_button(self, key: &str) -> Result<MainMenuButton, EditorError> {
        Ok(MainMenuButton {
            key: key.to_string(),
            slot: slot(self.slot)?,
            material: self.material,
            name: self.name,
            lore: self.lore,
            shop: self.shop,
            permission: self.permission,
            hide_attributes: self.hide_attributes,
            hide_additional: self.hide_additional,
        })
    }
}

/// `PUT /transactions/{kind}/settings` request (non-slot fields).
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransactionScalarsRequest {
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

impl TransactionScalarsRequest {
    /// Converts into the workspace scalar set.
    #[must_use]
    pub fn into_scalars(self) -> TransactionScalars {
        TransactionScalars {
            title_prefix: self.title_prefix,
            display_material: self.display_material,
            max_amount: self.max_amount,
            add_material: self.add_material,
            remove_material: self.remove_material,
            set_material: self.set_material,
        }
    }
}

/// `PUT /transactions/{kind}/display` request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DisplayRequest {
    /// Material of the display item.
    pub material: String,
    /// Grid slot, 0–53.
    pub slot: u8,
}

impl DisplayRequest {
    /// Validates the slot.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidSlot`] for an out-of-grid slot.
    pub fn into_parts(self) -> Result<(String, Slot), EditorError> {
        Ok((self.material, slot(self.slot)?))
    }
}

/// `PUT /transactions/{kind}/buttons/{which}` request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ActionButtonRequest {
    /// Material token.
    pub material: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Grid slot, 0–53.
    pub slot: u8,
}

impl ActionButtonRequest {
    /// Converts into a domain action button.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidSlot`] for an out-of-grid slot.
    pub fn into_button(self) -> Result<ActionButton, EditorError> {
        Ok(ActionButton {
            material: self.material,
            name: self.name,
            slot: slot(self.slot)?,
        })
    }
}

/// `PUT /transactions/{kind}/amounts/{group}/{amount}` request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AmountButtonRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Grid slot, 0–53.
    pub slot: u8,
}

impl AmountButtonRequest {
    /// Converts into a domain amount button.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidSlot`] for an out-of-grid slot.
    pub fn into_button(self) -> Result<AmountButton, EditorError> {
        Ok(AmountButton {
            name: self.name,
            slot: slot(self.slot)?,
        })
    }
}
