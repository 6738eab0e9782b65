//! Shop document model: one YAML file describing a single shop's items.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One sellable/purchasable entry in a shop file.
///
/// The `id` is minted by the workspace when the item enters memory (parse
/// or explicit add), is unique only within the currently loaded shop file,
/// and is never written to YAML. Every other field round-trips through the
/// shop grammar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    /// In-memory identity. Resets to 0 whenever a different shop file loads.
    pub id: u64,
    /// Material token (e.g. `DIAMOND`, `SPAWNER`).
    pub material: String,
    /// Display name; may contain `&` color codes.
    pub name: String,
    /// Purchase price. 0 = not purchasable.
    pub price: f64,
    /// Sell price. 0 = not sellable.
    pub sell_price: f64,
    /// Stack amount per transaction, at least 1.
    pub amount: u32,
    /// Ordered lore lines; empty strings are blank spacer lines and are
    /// preserved as such.
    pub lore: Vec<String>,
    /// Spawner entity type; only meaningful for spawner materials.
    pub spawner_type: String,
    /// Potion effect type; only meaningful for potion materials.
    pub potion_type: String,
    /// Potion amplifier level; 0 = default.
    pub potion_level: u32,
    /// Enchantment name → level. Key order is irrelevant to the plugin;
    /// a sorted map keeps serialization deterministic.
    pub enchantments: BTreeMap<String, u32>,
    /// Hide the attribute modifiers tooltip section.
    pub hide_attributes: bool,
    /// Hide the additional tooltip section.
    pub hide_additional: bool,
    /// Selling requires the held item's display name to match.
    pub require_name: bool,
    /// Selling requires the held item's lore to match.
    pub require_lore: bool,
    /// Sold TNT ignites on placement.
    pub unstable_tnt: bool,
}

impl Default for ShopItem {
    fn default() -> Self {
        Self {
            id: 0,
            material: String::new(),
            name: String::new(),
            price: 0.0,
            sell_price: 0.0,
            amount: 1,
            lore: Vec::new(),
            spawner_type: String::new(),
            potion_type: String::new(),
            potion_level: 0,
            enchantments: BTreeMap::new(),
            hide_attributes: false,
            hide_additional: false,
            require_name: false,
            require_lore: false,
            unstable_tnt: false,
        }
    }
}

impl ShopItem {
    /// Copies every field from `snapshot` onto `self` except the live `id`.
    ///
    /// Used by rollback to restore a prior state while preserving the
    /// in-memory identity of the located item.
    pub fn apply_snapshot(&mut self, snapshot: &Self) {
        let id = self.id;
        *self = snapshot.clone();
        self.id = id;
    }
}

/// Per-shop item-lore display settings: show/line pairs for the four
/// generated tooltip fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemLoreSettings {
    /// Append the buy-price line to item tooltips.
    pub show_buy_price: bool,
    /// Template for the buy-price line.
    pub buy_price_line: String,
    /// Append the buy-hint line to item tooltips.
    pub show_buy_hint: bool,
    /// Template for the buy-hint line.
    pub buy_hint_line: String,
    /// Append the sell-price line to item tooltips.
    pub show_sell_price: bool,
    /// Template for the sell-price line.
    pub sell_price_line: String,
    /// Append the sell-hint line to item tooltips.
    pub show_sell_hint: bool,
    /// Template for the sell-hint line.
    pub sell_hint_line: String,
}

impl Default for ItemLoreSettings {
    fn default() -> Self {
        Self {
            show_buy_price: true,
            buy_price_line: "&7Buy: &a$%price%".to_string(),
            show_buy_hint: true,
            buy_hint_line: "&7Left-click to buy".to_string(),
            show_sell_price: true,
            sell_price_line: "&7Sell: &e$%sell_price%".to_string(),
            show_sell_hint: true,
            sell_hint_line: "&7Right-click to sell".to_string(),
        }
    }
}

/// Full content of one shop YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopDocument {
    /// Title of the shop GUI; may contain `&` color codes.
    pub gui_name: String,
    /// Grid rows, 1–5. Unparsable values fall back to 3.
    pub rows: u8,
    /// Permission node gating the shop; empty = unrestricted.
    pub permission: String,
    /// Ordered opening-time ranges (free-form strings).
    pub available_times: Vec<String>,
    /// Item-lore display settings block.
    pub item_lore: ItemLoreSettings,
    /// Ordered item list.
    pub items: Vec<ShopItem>,
}

impl Default for ShopDocument {
    fn default() -> Self {
        Self {
            gui_name: String::new(),
            rows: 3,
            permission: String::new(),
            available_times: Vec::new(),
            item_lore: ItemLoreSettings::default(),
            items: Vec::new(),
        }
    }
}

impl ShopDocument {
    /// Returns the item with the given in-memory id, if present.
    #[must_use]
    pub fn item(&self, id: u64) -> Option<&ShopItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Returns a mutable reference to the item with the given id.
    pub fn item_mut(&mut self, id: u64) -> Option<&mut ShopItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_item_matches_parser_defaults() {
        let item = ShopItem::default();
        assert_eq!(item.amount, 1);
        assert_eq!(item.price, 0.0);
        assert_eq!(item.sell_price, 0.0);
        assert!(item.lore.is_empty());
        assert!(item.enchantments.is_empty());
        assert!(!item.hide_attributes);
    }

    #[test]
    fn apply_snapshot_preserves_live_id() {
        let mut live = ShopItem {
            id: 7,
            material: "STONE".to_string(),
            price: 10.0,
            ..ShopItem::default()
        };
        let snapshot = ShopItem {
            id: 3,
            material: "DIAMOND".to_string(),
            price: 100.0,
            ..ShopItem::default()
        };

        live.apply_snapshot(&snapshot);
        assert_eq!(live.id, 7);
        assert_eq!(live.material, "DIAMOND");
        assert_eq!(live.price, 100.0);
    }

    #[test]
    fn document_defaults_to_three_rows() {
        assert_eq!(ShopDocument::default().rows, 3);
    }

    #[test]
    fn item_lookup_by_id() {
        let mut doc = ShopDocument::default();
        doc.items.push(ShopItem {
            id: 1,
            material: "DIRT".to_string(),
            ..ShopItem::default()
        });
        doc.items.push(ShopItem {
            id: 2,
            material: "SAND".to_string(),
            ..ShopItem::default()
        });

        assert_eq!(doc.item(2).map(|i| i.material.as_str()), Some("SAND"));
        assert!(doc.item(9).is_none());
    }
}
