//! Main-menu grammar: parser state machine and canonical serializer.
//!
//! Columns: 0 for top-level keys, 2 for button map keys, 4 for button
//! fields, 6 for lore dashes.

use crate::domain::{MainMenuButton, MainMenuState, Slot};

use super::scanner;

const COL_TOP: usize = 0;
const COL_BUTTON_KEY: usize = 2;
const COL_BUTTON_FIELD: usize = 4;
const COL_LORE: usize = 6;

/// Parses the split-format `menu.yml`.
///
/// Best-effort and infallible; unrecognized lines are skipped.
#[must_use]
pub fn parse_main_menu(text: &str) -> MainMenuState {
    let mut menu = MainMenuState::default();
    let mut in_buttons = false;
    let mut lore_mode = false;
    let mut current: Option<MainMenuButton> = None;

    for line in scanner::lines(text) {
        if line.indent == COL_TOP {
            if let Some(button) = current.take() {
                menu.buttons.push(button);
            }
            lore_mode = false;
            in_buttons = match scanner::key_value(line.content) {
                Some(("title", value)) => {
                    menu.title = scanner::unquote(value).to_string();
                    false
                }
                Some(("rows", value)) => {
                    menu.rows = scanner::parse_rows_or(scanner::unquote(value), 3, 6);
                    false
                }
                Some(("buttons", _)) => true,
                _ => {
                    tracing::debug!(line = line.content, "skipping unrecognized top-level line");
                    false
                }
            };
            continue;
        }

        if !in_buttons {
            tracing::debug!(line = line.content, "skipping stray indented line");
            continue;
        }

        match line.indent {
            COL_BUTTON_KEY => {
                // A `key:` line with no value starts a new button.
                if let Some((key, value)) = scanner::key_value(line.content) {
                    if value.is_empty() {
                        if let Some(button) = current.take() {
                            menu.buttons.push(button);
                        }
                        current = Some(MainMenuButton::with_key(key));
                        lore_mode = false;
                    }
                }
            }
            COL_BUTTON_FIELD => {
                if let Some(button) = current.as_mut() {
                    if let Some((key, value)) = scanner::key_value(line.content) {
                        if key == "lore" && value.is_empty() {
                            lore_mode = true;
                        } else {
                            lore_mode = false;
                            apply_button_field(button, key, scanner::unquote(value));
                        }
                    }
                }
            }
            COL_LORE => {
                if lore_mode {
                    if let Some(button) = current.as_mut() {
                        if let Some(rest) = scanner::list_item(line.content) {
                            button.lore.push(scanner::unquote(rest).to_string());
                        }
                    }
                }
            }
            _ => {
                tracing::debug!(
                    indent = line.indent,
                    line = line.content,
                    "skipping misindented button line"
                );
            }
        }
    }

    if let Some(button) = current.take() {
        menu.buttons.push(button);
    }
    menu
}

fn apply_button_field(button: &mut MainMenuButton, key: &str, value: &str) {
    match key {
        "material" => button.material = value.to_string(),
        "name" => button.name = value.to_string(),
        "slot" => button.slot = Slot::parse_or_default(value),
        "shop" => button.shop = value.to_string(),
        "permission" => button.permission = value.to_string(),
        "hide-attributes" => button.hide_attributes = scanner::parse_bool(value),
        "hide-additional" => button.hide_additional = scanner::parse_bool(value),
        _ => tracing::debug!(key, "skipping unknown button key"),
    }
}

/// Serializes the main menu to canonical YAML. Deterministic; buttons
/// render in insertion order.
#[must_use]
pub fn serialize_main_menu(menu: &MainMenuState) -> String {
    let mut out = String::new();
    out.push_str(&format!("title: {}\n", scanner::quoted(&menu.title)));
    out.push_str(&format!("rows: {}\n", menu.rows));
    if !menu.buttons.is_empty() {
        out.push_str("buttons:\n");
        for button in &menu.buttons {
            serialize_button(&mut out, button);
        }
    }
    out
}

fn serialize_button(out: &mut String, button: &MainMenuButton) {
    out.push_str(&format!("  {}:\n", button.key));
    out.push_str(&format!(
        "    material: {}\n",
        scanner::quoted(&button.material)
    ));
    if !button.name.is_empty() {
        out.push_str(&format!("    name: {}\n", scanner::quoted(&button.name)));
    }
    out.push_str(&format!("    slot: {}\n", button.slot));
    if !button.shop.is_empty() {
        out.push_str(&format!("    shop: {}\n", scanner::quoted(&button.shop)));
    }
    if !button.permission.is_empty() {
        out.push_str(&format!(
            "    permission: {}\n",
            scanner::quoted(&button.permission)
        ));
    }
    if !button.lore.is_empty() {
        out.push_str("    lore:\n");
        for line in &button.lore {
            out.push_str(&format!("      - {}\n", scanner::quoted(line)));
        }
    }
    if button.hide_attributes {
        out.push_str("    hide-attributes: true\n");
    }
    if button.hide_additional {
        out.push_str("    hide-additional: true\n");
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const SAMPLE: &str = "title: '&8Shop'\nrows: 3\nbuttons:\n  blocks:\n    material: STONE\n    name: '&aBlocks'\n    slot: 10\n    shop: 'blocks'\n    lore:\n      - '&7Buy and sell blocks'\n    hide-attributes: true\n  food:\n    material: BREAD\n    slot: 12\n";

    #[test]
    fn parses_buttons_in_order() {
        let menu = parse_main_menu(SAMPLE);
        assert_eq!(menu.title, "&8Shop");
        assert_eq!(menu.rows, 3);
        let keys: Vec<&str> = menu.buttons.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["blocks", "food"]);
    }

    #[test]
    fn button_fields_land_on_the_right_button() {
        let menu = parse_main_menu(SAMPLE);
        let Some(blocks) = menu.button("blocks") else {
            panic!("missing blocks button");
        };
        assert_eq!(blocks.slot.get(), 10);
        assert_eq!(blocks.shop, "blocks");
        assert_eq!(blocks.lore, vec!["&7Buy and sell blocks"]);
        assert!(blocks.hide_attributes);

        let Some(food) = menu.button("food") else {
            panic!("missing food button");
        };
        assert_eq!(food.slot.get(), 12);
        assert!(food.lore.is_empty());
    }

    #[test]
    fn lore_mode_is_scoped_to_its_button() {
        // A sibling key after `lore:` ends lore mode; the later dash at
        // column 6 no longer belongs to anything and is skipped.
        let text = "buttons:\n  a:\n    lore:\n      - '&7One'\n    slot: 3\n      - '&7Stray'\n";
        let menu = parse_main_menu(text);
        let Some(button) = menu.button("a") else {
            panic!("missing button");
        };
        assert_eq!(button.lore, vec!["&7One"]);
    }

    #[test]
    fn unparsable_slot_defaults_to_zero() {
        let text = "buttons:\n  a:\n    slot: center\n";
        let menu = parse_main_menu(text);
        assert_eq!(menu.button("a").map(|b| b.slot.get()), Some(0));
    }

    #[test]
    fn round_trip_is_deep_equal() {
        let menu = parse_main_menu(SAMPLE);
        let reparsed = parse_main_menu(&serialize_main_menu(&menu));
        assert_eq!(menu, reparsed);
    }

    #[test]
    fn serializer_is_deterministic() {
        let menu = parse_main_menu(SAMPLE);
        assert_eq!(serialize_main_menu(&menu), serialize_main_menu(&menu));
    }

    #[test]
    fn empty_menu_renders_header_only() {
        let text = serialize_main_menu(&MainMenuState::default());
        assert_eq!(text, "title: ''\nrows: 3\n");
    }
}
