//! Main-menu model: the top-level grid of buttons routing to shops.

use serde::{Deserialize, Serialize};

use super::Slot;

/// One button in the main menu.
///
/// `key` is the YAML map key (identifier-safe, unique within the menu);
/// `slot` must be unique across all buttons of the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainMenuButton {
    /// YAML map key identifying the button.
    pub key: String,
    /// Grid slot; unique per menu.
    pub slot: Slot,
    /// Material token rendered in the grid.
    pub material: String,
    /// Display name; may contain `&` color codes.
    pub name: String,
    /// Ordered lore lines.
    pub lore: Vec<String>,
    /// File stem of the shop this button opens; empty = no action.
    pub shop: String,
    /// Permission node gating the button; empty = unrestricted.
    pub permission: String,
    /// Hide the attribute modifiers tooltip section.
    pub hide_attributes: bool,
    /// Hide the additional tooltip section.
    pub hide_additional: bool,
}

impl MainMenuButton {
    /// Creates an empty button with the given key.
    #[must_use]
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            slot: Slot::default(),
            material: String::new(),
            name: String::new(),
            lore: Vec::new(),
            shop: String::new(),
            permission: String::new(),
            hide_attributes: false,
            hide_additional: false,
        }
    }
}

/// The main menu document: title, row count, and ordered button list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainMenuState {
    /// Menu title; may contain `&` color codes.
    pub title: String,
    /// Grid rows, 1–6. Unparsable values fall back to 3.
    pub rows: u8,
    /// Buttons in insertion order (serialization order).
    pub buttons: Vec<MainMenuButton>,
}

impl Default for MainMenuState {
    fn default() -> Self {
        Self {
            title: String::new(),
            rows: 3,
            buttons: Vec::new(),
        }
    }
}

impl MainMenuState {
    /// Returns the button with the given key, if present.
    #[must_use]
    pub fn button(&self, key: &str) -> Option<&MainMenuButton> {
        self.buttons.iter().find(|b| b.key == key)
    }

    /// Returns a mutable reference to the button with the given key.
    pub fn button_mut(&mut self, key: &str) -> Option<&mut MainMenuButton> {
        self.buttons.iter_mut().find(|b| b.key == key)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn with_key_starts_empty() {
        let button = MainMenuButton::with_key("blocks");
        assert_eq!(button.key, "blocks");
        assert_eq!(button.slot.get(), 0);
        assert!(button.shop.is_empty());
    }

    #[test]
    fn button_lookup_by_key() {
        let mut menu = MainMenuState::default();
        menu.buttons.push(MainMenuButton::with_key("blocks"));
        menu.buttons.push(MainMenuButton::with_key("food"));

        assert!(menu.button("food").is_some());
        assert!(menu.button("tools").is_none());
    }

    #[test]
    fn default_rows_is_three() {
        assert_eq!(MainMenuState::default().rows, 3);
    }
}
