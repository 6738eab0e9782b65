//! Transaction-menu model: purchase and sell confirmation grids.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Slot;

/// Which of the two transaction menus a settings instance configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// The purchase confirmation menu.
    Purchase,
    /// The sell confirmation menu.
    Sell,
}

impl TransactionKind {
    /// File stem of the split-format YAML file for this menu.
    #[must_use]
    pub const fn file_stem(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// One of the fixed named action buttons of a transaction menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionButtonKind {
    /// Confirms the transaction.
    Confirm,
    /// Cancels the transaction.
    Cancel,
    /// Returns to the previous menu.
    Back,
    /// Sells the entire inventory stock (sell menu only).
    SellAll,
}

impl ActionButtonKind {
    /// YAML key of the button under `buttons:`.
    #[must_use]
    pub const fn yaml_key(&self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::Back => "back",
            Self::SellAll => "sell-all",
        }
    }
}

/// One of the three open-ended amount-adjustment button groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AmountGroupKind {
    /// Buttons adding to the pending amount.
    Add,
    /// Buttons subtracting from the pending amount.
    Remove,
    /// Buttons setting the pending amount outright.
    Set,
}

impl AmountGroupKind {
    /// YAML key of the group's top-level block.
    #[must_use]
    pub const fn yaml_key(&self) -> &'static str {
        match self {
            Self::Add => "add-buttons",
            Self::Remove => "remove-buttons",
            Self::Set => "set-buttons",
        }
    }
}

/// A fixed action button: material, name, slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionButton {
    /// Material token rendered in the grid.
    pub material: String,
    /// Display name; may contain `&` color codes.
    pub name: String,
    /// Grid slot; counts toward the per-menu uniqueness invariant.
    pub slot: Slot,
}

impl ActionButton {
    fn new(material: &str, name: &str, slot: u8) -> Self {
        Self {
            material: material.to_string(),
            name: name.to_string(),
            slot: Slot::new(slot).unwrap_or_default(),
        }
    }
}

/// One amount-adjustment button inside a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmountButton {
    /// Display name; may contain `&` color codes.
    pub name: String,
    /// Grid slot; counts toward the per-menu uniqueness invariant.
    pub slot: Slot,
}

/// An open-ended group of amount buttons sharing one material.
///
/// The map key is the amount token as written in YAML (kept as a string:
/// the plugin treats it opaquely and the editor must not normalize it).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmountButtonGroup {
    /// Material token shared by every button of the group.
    pub material: String,
    /// Amount token → button. Sorted map keeps serialization deterministic.
    pub amounts: BTreeMap<String, AmountButton>,
}

/// Settings for one transaction menu (purchase or sell).
///
/// Invariant: no two buttons of the same instance may share a slot; the
/// display item occupies a slot and counts toward this constraint. The
/// invariant is checked by [`TransactionMenuSettings::slot_conflict`]
/// before any slot-touching mutation is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionMenuSettings {
    /// Which menu this instance configures.
    pub kind: TransactionKind,
    /// Title prefix shown before the item name.
    pub title_prefix: String,
    /// Material of the central display item.
    pub display_material: String,
    /// Slot of the central display item.
    pub display_slot: Slot,
    /// Upper bound on the pending transaction amount.
    pub max_amount: u32,
    /// Confirm button.
    pub confirm: ActionButton,
    /// Cancel button.
    pub cancel: ActionButton,
    /// Back button.
    pub back: ActionButton,
    /// Sell-all button; present on the sell menu only.
    pub sell_all: Option<ActionButton>,
    /// Amount-increment buttons.
    pub add_buttons: AmountButtonGroup,
    /// Amount-decrement buttons.
    pub remove_buttons: AmountButtonGroup,
    /// Amount-set buttons.
    pub set_buttons: AmountButtonGroup,
}

impl TransactionMenuSettings {
    /// Fallback `max-amount` when the YAML scalar is missing or unparsable.
    pub const DEFAULT_MAX_AMOUNT: u32 = 2_304;

    /// Fallback `display-slot` when the YAML scalar is missing or unparsable.
    pub const DEFAULT_DISPLAY_SLOT: u8 = 22;

    /// Canonical defaults for the given menu kind.
    #[must_use]
    pub fn defaults(kind: TransactionKind) -> Self {
        let sell_all = match kind {
            TransactionKind::Purchase => None,
            TransactionKind::Sell => Some(ActionButton::new("HOPPER", "&6Sell All", 40)),
        };
        let title_prefix = match kind {
            TransactionKind::Purchase => "&8Buying",
            TransactionKind::Sell => "&8Selling",
        };
        Self {
            kind,
            title_prefix: title_prefix.to_string(),
            display_material: "CHEST".to_string(),
            display_slot: Slot::new(Self::DEFAULT_DISPLAY_SLOT).unwrap_or_default(),
            max_amount: Self::DEFAULT_MAX_AMOUNT,
            confirm: ActionButton::new("LIME_STAINED_GLASS_PANE", "&aConfirm", 39),
            cancel: ActionButton::new("RED_STAINED_GLASS_PANE", "&cCancel", 41),
            back: ActionButton::new("ARROW", "&7Back", 49),
            sell_all,
            add_buttons: AmountButtonGroup {
                material: "LIME_STAINED_GLASS_PANE".to_string(),
                amounts: BTreeMap::new(),
            },
            remove_buttons: AmountButtonGroup {
                material: "RED_STAINED_GLASS_PANE".to_string(),
                amounts: BTreeMap::new(),
            },
            set_buttons: AmountButtonGroup {
                material: "YELLOW_STAINED_GLASS_PANE".to_string(),
                amounts: BTreeMap::new(),
            },
        }
    }

    /// Returns a reference to the named action button, if the menu has it.
    #[must_use]
    pub fn action_button(&self, kind: ActionButtonKind) -> Option<&ActionButton> {
        match kind {
            ActionButtonKind::Confirm => Some(&self.confirm),
            ActionButtonKind::Cancel => Some(&self.cancel),
            ActionButtonKind::Back => Some(&self.back),
            ActionButtonKind::SellAll => self.sell_all.as_ref(),
        }
    }

    /// Returns the named amount-button group.
    #[must_use]
    pub const fn group(&self, kind: AmountGroupKind) -> &AmountButtonGroup {
        match kind {
            AmountGroupKind::Add => &self.add_buttons,
            AmountGroupKind::Remove => &self.remove_buttons,
            AmountGroupKind::Set => &self.set_buttons,
        }
    }

    /// Returns the named amount-button group mutably.
    pub const fn group_mut(&mut self, kind: AmountGroupKind) -> &mut AmountButtonGroup {
        match kind {
            AmountGroupKind::Add => &mut self.add_buttons,
            AmountGroupKind::Remove => &mut self.remove_buttons,
            AmountGroupKind::Set => &mut self.set_buttons,
        }
    }

    /// Walks every occupied slot of this instance with its location string
    /// (`display`, `buttons.confirm`, `add-buttons.amounts.10`, ...).
    pub fn occupied_slots(&self) -> impl Iterator<Item = (Slot, String)> + '_ {
        let fixed = [
            (ActionButtonKind::Confirm, &self.confirm),
            (ActionButtonKind::Cancel, &self.cancel),
            (ActionButtonKind::Back, &self.back),
        ];
        let display = std::iter::once((self.display_slot, "display".to_string()));
        let actions = fixed
            .into_iter()
            .map(|(kind, b)| (b.slot, format!("buttons.{}", kind.yaml_key())));
        let sell_all = self
            .sell_all
            .iter()
            .map(|b| (b.slot, "buttons.sell-all".to_string()));
        let groups = [
            AmountGroupKind::Add,
            AmountGroupKind::Remove,
            AmountGroupKind::Set,
        ]
        .into_iter()
        .flat_map(move |g| {
            self.group(g)
                .amounts
                .iter()
                .map(move |(key, b)| (b.slot, format!("{}.amounts.{key}", g.yaml_key())))
        });
        display.chain(actions).chain(sell_all).chain(groups)
    }

    /// Checks whether `slot` is already occupied by an element other than
    /// the one at `exclude_location`. Returns the occupant's location
    /// string on conflict.
    #[must_use]
    pub fn slot_conflict(&self, slot: Slot, exclude_location: &str) -> Option<String> {
        self.occupied_slots()
            .find(|(s, loc)| *s == slot && loc != exclude_location)
            .map(|(_, loc)| loc)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn purchase_defaults_have_no_sell_all() {
        let settings = TransactionMenuSettings::defaults(TransactionKind::Purchase);
        assert!(settings.sell_all.is_none());
        assert_eq!(settings.display_slot.get(), 22);
        assert_eq!(settings.max_amount, 2_304);
    }

    #[test]
    fn sell_defaults_include_sell_all() {
        let settings = TransactionMenuSettings::defaults(TransactionKind::Sell);
        assert!(settings.sell_all.is_some());
    }

    #[test]
    fn occupied_slots_cover_display_actions_and_groups() {
        let mut settings = TransactionMenuSettings::defaults(TransactionKind::Sell);
        let Ok(slot) = Slot::new(24) else {
            panic!("valid slot");
        };
        settings.add_buttons.amounts.insert(
            "1".to_string(),
            AmountButton {
                name: "&a+1".to_string(),
                slot,
            },
        );

        let slots: Vec<(Slot, String)> = settings.occupied_slots().collect();
        assert!(slots.iter().any(|(_, loc)| loc == "display"));
        assert!(slots.iter().any(|(_, loc)| loc == "buttons.confirm"));
        assert!(slots.iter().any(|(_, loc)| loc == "buttons.sell-all"));
        assert!(slots.iter().any(|(_, loc)| loc == "add-buttons.amounts.1"));
    }

    #[test]
    fn slot_conflict_names_occupant() {
        let settings = TransactionMenuSettings::defaults(TransactionKind::Purchase);
        let conflict = settings.slot_conflict(settings.confirm.slot, "buttons.cancel");
        assert_eq!(conflict.as_deref(), Some("buttons.confirm"));
    }

    #[test]
    fn slot_conflict_excludes_self() {
        let settings = TransactionMenuSettings::defaults(TransactionKind::Purchase);
        let conflict = settings.slot_conflict(settings.confirm.slot, "buttons.confirm");
        assert!(conflict.is_none());
    }
}
