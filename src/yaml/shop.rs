//! Shop-file grammar: parser state machine and canonical serializer.
//!
//! Columns are matched by exact equality: 0 for top-level keys, 2 for
//! `item-lore` children, time-range dashes and item dashes, 4 for item
//! fields, 6 for lore dashes and enchantment pairs. A line one space off
//! its expected column does not belong to its section and is skipped.

use crate::domain::{ShopDocument, ShopItem};

use super::scanner;

const COL_TOP: usize = 0;
const COL_NESTED: usize = 2;
const COL_ITEM_FIELD: usize = 4;
const COL_ITEM_CHILD: usize = 6;

/// Which top-level block the scan is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Top,
    Times,
    LoreSettings,
    Items,
}

/// Sub-state inside an item: lore dashes claim column 6; otherwise any
/// `key: value` pair at column 6 is an enchantment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemMode {
    Fields,
    Lore,
}

/// Parses one shop YAML file.
///
/// Best-effort and infallible: malformed or misindented lines are skipped
/// with a `tracing::debug!` breadcrumb. Item ids are left at 0; the
/// workspace mints them when the document is installed.
#[must_use]
pub fn parse_shop(text: &str) -> ShopDocument {
    let mut doc = ShopDocument::default();
    let mut section = Section::Top;
    let mut mode = ItemMode::Fields;
    let mut current: Option<ShopItem> = None;

    for line in scanner::lines(text) {
        if line.indent == COL_TOP {
            // A new top-level key closes whatever nested section was open.
            if let Some(item) = current.take() {
                doc.items.push(item);
            }
            mode = ItemMode::Fields;
            section = match scanner::key_value(line.content) {
                Some(("gui-name", value)) => {
                    doc.gui_name = scanner::unquote(value).to_string();
                    Section::Top
                }
                Some(("rows", value)) => {
                    doc.rows = scanner::parse_rows_or(scanner::unquote(value), 3, 5);
                    Section::Top
                }
                Some(("permission", value)) => {
                    doc.permission = scanner::unquote(value).to_string();
                    Section::Top
                }
                Some(("available-times", _)) => Section::Times,
                Some(("item-lore", _)) => Section::LoreSettings,
                Some(("items", _)) => Section::Items,
                _ => {
                    tracing::debug!(line = line.content, "skipping unrecognized top-level line");
                    Section::Top
                }
            };
            continue;
        }

        match section {
            Section::Times => {
                if line.indent == COL_NESTED {
                    if let Some(rest) = scanner::list_item(line.content) {
                        doc.available_times
                            .push(scanner::unquote(rest).to_string());
                    }
                }
            }
            Section::LoreSettings => {
                if line.indent == COL_NESTED {
                    if let Some((key, value)) = scanner::key_value(line.content) {
                        apply_lore_setting(&mut doc, key, scanner::unquote(value));
                    }
                }
            }
            Section::Items => match line.indent {
                COL_NESTED => {
                    if let Some(rest) = scanner::list_item(line.content) {
                        // A dash starts a new element; the previous one is
                        // finalized here. Both the inline form
                        // (`- material: X`) and the bare-dash split form
                        // land in the same state.
                        if let Some(item) = current.take() {
                            doc.items.push(item);
                        }
                        let mut item = ShopItem::default();
                        if let Some((key, value)) = scanner::key_value(rest) {
                            apply_item_field(&mut item, key, scanner::unquote(value));
                        }
                        current = Some(item);
                        mode = ItemMode::Fields;
                    }
                }
                COL_ITEM_FIELD => {
                    if let Some(item) = current.as_mut() {
                        if let Some((key, value)) = scanner::key_value(line.content) {
                            if key == "lore" && value.is_empty() {
                                mode = ItemMode::Lore;
                            } else {
                                // Any sibling key ends lore mode, including
                                // the `enchantments:` header (its children
                                // are recognized by column alone).
                                mode = ItemMode::Fields;
                                if key != "enchantments" {
                                    apply_item_field(item, key, scanner::unquote(value));
                                }
                            }
                        }
                    }
                }
                COL_ITEM_CHILD => {
                    if let Some(item) = current.as_mut() {
                        match mode {
                            ItemMode::Lore => {
                                if let Some(rest) = scanner::list_item(line.content) {
                                    // Empty after trimming the dash: a blank
                                    // spacer line, preserved not dropped.
                                    item.lore.push(scanner::unquote(rest).to_string());
                                }
                            }
                            ItemMode::Fields => {
                                if let Some((key, value)) = scanner::key_value(line.content) {
                                    item.enchantments.insert(
                                        key.to_string(),
                                        scanner::parse_u32_or(scanner::unquote(value), 1),
                                    );
                                }
                            }
                        }
                    }
                }
                _ => {
                    tracing::debug!(
                        indent = line.indent,
                        line = line.content,
                        "skipping misindented item line"
                    );
                }
            },
            Section::Top => {
                tracing::debug!(line = line.content, "skipping stray indented line");
            }
        }
    }

    if let Some(item) = current.take() {
        doc.items.push(item);
    }
    doc
}

fn apply_lore_setting(doc: &mut ShopDocument, key: &str, value: &str) {
    let settings = &mut doc.item_lore;
    match key {
        "show-buy-price" => settings.show_buy_price = scanner::parse_bool(value),
        "buy-price-line" => settings.buy_price_line = value.to_string(),
        "show-buy-hint" => settings.show_buy_hint = scanner::parse_bool(value),
        "buy-hint-line" => settings.buy_hint_line = value.to_string(),
        "show-sell-price" => settings.show_sell_price = scanner::parse_bool(value),
        "sell-price-line" => settings.sell_price_line = value.to_string(),
        "show-sell-hint" => settings.show_sell_hint = scanner::parse_bool(value),
        "sell-hint-line" => settings.sell_hint_line = value.to_string(),
        _ => tracing::debug!(key, "skipping unknown item-lore key"),
    }
}

fn apply_item_field(item: &mut ShopItem, key: &str, value: &str) {
    match key {
        "material" => item.material = value.to_string(),
        "name" => item.name = value.to_string(),
        "price" => item.price = scanner::parse_price_or(value, 0.0),
        "sell-price" => item.sell_price = scanner::parse_price_or(value, 0.0),
        "amount" => item.amount = scanner::parse_u32_or(value, 1).max(1),
        "spawner-type" => item.spawner_type = value.to_string(),
        "potion-type" => item.potion_type = value.to_string(),
        "potion-level" => item.potion_level = scanner::parse_u32_or(value, 0),
        "hide-attributes" => item.hide_attributes = scanner::parse_bool(value),
        "hide-additional" => item.hide_additional = scanner::parse_bool(value),
        "require-name" => item.require_name = scanner::parse_bool(value),
        "require-lore" => item.require_lore = scanner::parse_bool(value),
        "unstable-tnt" => item.unstable_tnt = scanner::parse_bool(value),
        _ => tracing::debug!(key, "skipping unknown item key"),
    }
}

/// Serializes a shop document to canonical YAML.
///
/// Deterministic: the same document always renders byte-identical text,
/// which the save pipeline relies on to skip unchanged writes. Falsy
/// optional fields (zero prices, empty strings, empty lists and maps,
/// false flags) are omitted entirely; structural fields always render.
#[must_use]
pub fn serialize_shop(doc: &ShopDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!("gui-name: {}\n", scanner::quoted(&doc.gui_name)));
    out.push_str(&format!("rows: {}\n", doc.rows));
    if !doc.permission.is_empty() {
        out.push_str(&format!(
            "permission: {}\n",
            scanner::quoted(&doc.permission)
        ));
    }
    if !doc.available_times.is_empty() {
        out.push_str("available-times:\n");
        for time in &doc.available_times {
            out.push_str(&format!("  - {}\n", scanner::quoted(time)));
        }
    }
    out.push_str("item-lore:\n");
    let lore = &doc.item_lore;
    out.push_str(&format!("  show-buy-price: {}\n", lore.show_buy_price));
    out.push_str(&format!(
        "  buy-price-line: {}\n",
        scanner::quoted(&lore.buy_price_line)
    ));
    out.push_str(&format!("  show-buy-hint: {}\n", lore.show_buy_hint));
    out.push_str(&format!(
        "  buy-hint-line: {}\n",
        scanner::quoted(&lore.buy_hint_line)
    ));
    out.push_str(&format!("  show-sell-price: {}\n", lore.show_sell_price));
    out.push_str(&format!(
        "  sell-price-line: {}\n",
        scanner::quoted(&lore.sell_price_line)
    ));
    out.push_str(&format!("  show-sell-hint: {}\n", lore.show_sell_hint));
    out.push_str(&format!(
        "  sell-hint-line: {}\n",
        scanner::quoted(&lore.sell_hint_line)
    ));
    if !doc.items.is_empty() {
        out.push_str("items:\n");
        for item in &doc.items {
            serialize_item(&mut out, item);
        }
    }
    out
}

fn serialize_item(out: &mut String, item: &ShopItem) {
    out.push_str(&format!(
        "  - material: {}\n",
        scanner::quoted(&item.material)
    ));
    if !item.name.is_empty() {
        out.push_str(&format!("    name: {}\n", scanner::quoted(&item.name)));
    }
    if item.price != 0.0 {
        out.push_str(&format!(
            "    price: {}\n",
            scanner::plain_number(item.price)
        ));
    }
    if item.sell_price != 0.0 {
        out.push_str(&format!(
            "    sell-price: {}\n",
            scanner::plain_number(item.sell_price)
        ));
    }
    out.push_str(&format!("    amount: {}\n", item.amount));
    if !item.lore.is_empty() {
        out.push_str("    lore:\n");
        for line in &item.lore {
            out.push_str(&format!("      - {}\n", scanner::quoted(line)));
        }
    }
    if !item.spawner_type.is_empty() {
        out.push_str(&format!(
            "    spawner-type: {}\n",
            scanner::quoted(&item.spawner_type)
        ));
    }
    if !item.potion_type.is_empty() {
        out.push_str(&format!(
            "    potion-type: {}\n",
            scanner::quoted(&item.potion_type)
        ));
    }
    if item.potion_level != 0 {
        out.push_str(&format!("    potion-level: {}\n", item.potion_level));
    }
    if !item.enchantments.is_empty() {
        out.push_str("    enchantments:\n");
        for (name, level) in &item.enchantments {
            out.push_str(&format!("      {name}: {level}\n"));
        }
    }
    for (flag, value) in [
        ("hide-attributes", item.hide_attributes),
        ("hide-additional", item.hide_additional),
        ("require-name", item.require_name),
        ("require-lore", item.require_lore),
        ("unstable-tnt", item.unstable_tnt),
    ] {
        if value {
            out.push_str(&format!("    {flag}: true\n"));
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_inline_item_with_defaults() {
        let doc = parse_shop("items:\n  - material: DIAMOND\n    name: '&bGem'\n    price: 100\n");
        assert_eq!(doc.items.len(), 1);
        let Some(item) = doc.items.first() else {
            panic!("expected one item");
        };
        assert_eq!(item.material, "DIAMOND");
        assert_eq!(item.name, "&bGem");
        assert_eq!(item.price, 100.0);
        assert_eq!(item.sell_price, 0.0);
        assert_eq!(item.amount, 1);
        assert!(item.lore.is_empty());
    }

    #[test]
    fn split_item_start_equals_inline_start() {
        let inline = parse_shop("items:\n  - material: STONE\n    price: 10\n");
        let split = parse_shop("items:\n  -\n    material: STONE\n    price: 10\n");
        assert_eq!(inline.items, split.items);
    }

    #[test]
    fn lore_blank_lines_survive_round_trip() {
        let text = "items:\n  - material: STONE\n    lore:\n      - '&7First'\n      - ''\n      - '&7Third'\n";
        let doc = parse_shop(text);
        let Some(item) = doc.items.first() else {
            panic!("expected one item");
        };
        assert_eq!(item.lore, vec!["&7First", "", "&7Third"]);

        let reparsed = parse_shop(&serialize_shop(&doc));
        let Some(item) = reparsed.items.first() else {
            panic!("expected one item");
        };
        assert_eq!(item.lore, vec!["&7First", "", "&7Third"]);
    }

    #[test]
    fn deep_pairs_are_enchantments_unless_lore_is_open() {
        let text = "items:\n  - material: DIAMOND_SWORD\n    enchantments:\n      sharpness: 2\n      looting: 3\n    lore:\n      - '&7Sharp'\n";
        let doc = parse_shop(text);
        let Some(item) = doc.items.first() else {
            panic!("expected one item");
        };
        assert_eq!(item.enchantments.get("sharpness"), Some(&2));
        assert_eq!(item.enchantments.get("looting"), Some(&3));
        assert_eq!(item.lore, vec!["&7Sharp"]);
    }

    #[test]
    fn enchantment_pair_without_header_still_lands() {
        // Column width alone decides: no `enchantments:` marker needed.
        let text = "items:\n  - material: DIAMOND_SWORD\n      sharpness: 2\n";
        let doc = parse_shop(text);
        let Some(item) = doc.items.first() else {
            panic!("expected one item");
        };
        assert_eq!(item.enchantments.get("sharpness"), Some(&2));
    }

    #[test]
    fn misindented_lines_are_skipped() {
        // `name` is at column 5, one space off; it must not apply.
        let text = "items:\n  - material: STONE\n     name: '&7Oops'\n    price: 5\n";
        let doc = parse_shop(text);
        let Some(item) = doc.items.first() else {
            panic!("expected one item");
        };
        assert!(item.name.is_empty());
        assert_eq!(item.price, 5.0);
    }

    #[test]
    fn top_level_key_closes_items_section() {
        let text = "items:\n  - material: STONE\nrows: 4\n  - material: DIRT\n";
        let doc = parse_shop(text);
        assert_eq!(doc.items.len(), 1);
        assert_eq!(doc.rows, 4);
    }

    #[test]
    fn non_numeric_rows_falls_back_to_three() {
        let doc = parse_shop("rows: lots\n");
        assert_eq!(doc.rows, 3);
    }

    #[test]
    fn header_fields_and_times_parse() {
        let text = "gui-name: '&8Blocks'\nrows: 5\npermission: 'shop.blocks'\navailable-times:\n  - 'MON 09:00-17:00'\n  - 'TUE 09:00-17:00'\n";
        let doc = parse_shop(text);
        assert_eq!(doc.gui_name, "&8Blocks");
        assert_eq!(doc.rows, 5);
        assert_eq!(doc.permission, "shop.blocks");
        assert_eq!(doc.available_times.len(), 2);
    }

    #[test]
    fn round_trip_is_deep_equal_on_canonical_output() {
        let text = "gui-name: '&8Blocks'\nrows: 3\nitems:\n  - material: DIAMOND\n    name: '&bGem'\n    price: 100\n    sell-price: 40\n    amount: 16\n    lore:\n      - '&7Shiny'\n      - ''\n    enchantments:\n      fortune: 3\n    hide-attributes: true\n";
        let doc = parse_shop(text);
        let canonical = serialize_shop(&doc);
        let reparsed = parse_shop(&canonical);
        assert_eq!(doc, reparsed);
    }

    #[test]
    fn serializer_is_deterministic() {
        let doc = parse_shop("items:\n  - material: DIAMOND\n    price: 2.5\n");
        assert_eq!(serialize_shop(&doc), serialize_shop(&doc));
    }

    #[test]
    fn falsy_fields_are_omitted() {
        let doc = parse_shop("items:\n  - material: STONE\n");
        let text = serialize_shop(&doc);
        assert!(!text.contains("price"));
        assert!(!text.contains("lore:\n      -"));
        assert!(!text.contains("enchantments"));
        assert!(!text.contains("hide-attributes"));
        assert!(!text.contains("permission"));
    }

    #[test]
    fn fractional_prices_render_as_written() {
        let doc = parse_shop("items:\n  - material: STONE\n    price: 2.5\n    sell-price: 1\n");
        let text = serialize_shop(&doc);
        assert!(text.contains("price: 2.5\n"));
        assert!(text.contains("sell-price: 1\n"));
    }
}
