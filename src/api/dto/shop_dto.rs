//! Shop-related request/response DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ItemLoreSettings, ShopItem, ShopSettingsSnapshot};

/// `GET /shops` response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShopListResponse {
    /// Sorted stems of every known shop file.
    pub shops: Vec<String>,
    /// Stem of the currently open shop, if any.
    pub current: Option<String>,
}

/// `POST /shops` request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShopRequest {
    /// File stem for the new shop (alphanumeric, `-`, `_`).
    pub name: String,
}

/// Item payload for create and update endpoints.
///
/// Field defaults mirror the parser defaults, so a sparse request builds
/// the same item a sparse YAML file would.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ItemRequest {
    /// Material token.
    pub material: String,
    /// Display name; may contain `&` color codes.
    #[serde(default)]
    pub name: String,
    /// Purchase price. 0 = not purchasable.
    #[serde(default)]
    pub price: f64,
    /// Sell price. 0 = not sellable.
    #[serde(default)]
    pub sell_price: f64,
    /// Stack amount, at least 1.
    #[serde(default = "default_amount")]
    pub amount: u32,
    /// Ordered lore lines; empty strings are blank spacer lines.
    #[serde(default)]
    pub lore: Vec<String>,
    /// Spawner entity type.
    #[serde(default)]
    pub spawner_type: String,
    /// Potion effect type.
    #[serde(default)]
    pub potion_type: String,
    /// Potion amplifier level.
    #[serde(default)]
    pub potion_level: u32,
    /// Enchantment name → level.
    #[serde(default)]
    pub enchantments: BTreeMap<String, u32>,
    /// Hide the attribute modifiers tooltip section.
    #[serde(default)]
    pub hide_attributes: bool,
    /// Hide the additional tooltip section.
    #[serde(default)]
    pub hide_additional: bool,
    /// Selling requires a matching display name.
    #[serde(default)]
    pub require_name: bool,
    /// Selling requires matching lore.
    #[serde(default)]
    pub require_lore: bool,
    /// Sold TNT ignites on placement.
    #[serde(default)]
    pub unstable_tnt: bool,
}

fn default_amount() -> u32 {
    1
}

impl ItemRequest {
    /// Converts into a domain item. The id is left for the workspace.
    #[must_use]
    pub fn into_item(self) -> ShopItem {
        ShopItem {
            id: 0,
            material: self.material,
            name: self.name,
            price: self.price.max(0.0),
            sell_price: self.sell_price.max(0.0),
            amount: self.amount.max(1),
            lore: self.lore,
            spawner_type: self.spawner_type,
            potion_type: self.potion_type,
            potion_level: self.potion_level,
            enchantments: self.enchantments,
            hide_attributes: self.hide_attributes,
            hide_additional: self.hide_additional,
            require_name: self.require_name,
            require_lore: self.require_lore,
            unstable_tnt: self.unstable_tnt,
        }
    }
}

/// `POST /shops/current/items` response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemCreatedResponse {
    /// Minted in-memory item id.
    pub id: u64,
}

/// `PUT /shops/current/settings` request: the per-shop settings block,
/// item-lore fields flattened.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ShopSettingsRequest {
    /// Shop GUI title.
    pub gui_name: String,
    /// Grid rows, 1–5.
    pub rows: u8,
    /// Permission node; empty = unrestricted.
    #[serde(default)]
    pub permission: String,
    /// Opening-time ranges.
    #[serde(default)]
    pub available_times: Vec<String>,
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

impl ShopSettingsRequest {
    /// Converts into the workspace settings snapshot.
    #[must_use]
    pub fn into_snapshot(self) -> ShopSettingsSnapshot {
        ShopSettingsSnapshot {
            gui_name: self.gui_name,
            rows: self.rows,
            permission: self.permission,
            available_times: self.available_times,
            item_lore: ItemLoreSettings {
                show_buy_price: self.show_buy_price,
                buy_price_line: self.buy_price_line,
                show_buy_hint: self.show_buy_hint,
                buy_hint_line: self.buy_hint_line,
                show_sell_price: self.show_sell_price,
                sell_price_line: self.sell_price_line,
                show_sell_hint: self.show_sell_hint,
                sell_hint_line: self.sell_hint_line,
            },
        }
    }
}
