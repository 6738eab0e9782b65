//! Transaction-menu grammar (purchase and sell): parser and serializer.
//!
//! Columns: 0 for top-level keys, 2 for action-button keys and group
//! children (`material:`, `amounts:`), 4 for action-button fields and
//! amount keys, 6 for amount-button fields.

use crate::domain::{
    ActionButton, ActionButtonKind, AmountButton, AmountGroupKind, Slot, TransactionKind,
    TransactionMenuSettings,
};

use super::scanner;

const COL_TOP: usize = 0;
const COL_CHILD: usize = 2;
const COL_FIELD: usize = 4;
const COL_AMOUNT_FIELD: usize = 6;

/// Parser context: which top-level block the scan is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Top,
    /// Inside `buttons:`; holds the action button the next fields apply
    /// to (`None` when the key was unrecognized and acts as a sink).
    Buttons(Option<ActionButtonKind>),
    /// Inside a group block; `in_amounts` flips once `amounts:` is seen.
    Group(AmountGroupKind, bool),
}

/// Parses a transaction-menu settings file (`purchase.yml` / `sell.yml`).
///
/// Starts from the canonical defaults for `kind` and overwrites whatever
/// the file provides, so partial files degrade gracefully. Best-effort
/// and infallible.
#[must_use]
pub fn parse_transaction_menu(text: &str, kind: TransactionKind) -> TransactionMenuSettings {
    let mut settings = TransactionMenuSettings::defaults(kind);
    let mut context = Context::Top;
    let mut current_amount: Option<String> = None;

    for line in scanner::lines(text) {
        if line.indent == COL_TOP {
            current_amount = None;
            context = match scanner::key_value(line.content) {
                Some(("title-prefix", value)) => {
                    settings.title_prefix = scanner::unquote(value).to_string();
                    Context::Top
                }
                Some(("display-material", value)) => {
                    settings.display_material = scanner::unquote(value).to_string();
                    Context::Top
                }
                Some(("display-slot", value)) => {
                    settings.display_slot = parse_slot_or(
                        scanner::unquote(value),
                        TransactionMenuSettings::DEFAULT_DISPLAY_SLOT,
                    );
                    Context::Top
                }
                Some(("max-amount", value)) => {
                    settings.max_amount = scanner::parse_u32_or(
                        scanner::unquote(value),
                        TransactionMenuSettings::DEFAULT_MAX_AMOUNT,
                    )
                    .max(1);
                    Context::Top
                }
                Some(("buttons", _)) => Context::Buttons(None),
                Some(("add-buttons", _)) => Context::Group(AmountGroupKind::Add, false),
                Some(("remove-buttons", _)) => Context::Group(AmountGroupKind::Remove, false),
                Some(("set-buttons", _)) => Context::Group(AmountGroupKind::Set, false),
                _ => {
                    tracing::debug!(line = line.content, "skipping unrecognized top-level line");
                    Context::Top
                }
            };
            continue;
        }

        match context {
            Context::Buttons(ref mut current) => match line.indent {
                COL_CHILD => {
                    if let Some((key, value)) = scanner::key_value(line.content) {
                        if value.is_empty() {
                            *current = action_button_kind(key, kind);
                        }
                    }
                }
                COL_FIELD => {
                    if let Some(which) = *current {
                        if let Some((key, value)) = scanner::key_value(line.content) {
                            apply_action_field(&mut settings, which, key, scanner::unquote(value));
                        }
                    }
                }
                _ => {
                    tracing::debug!(
                        indent = line.indent,
                        line = line.content,
                        "skipping misindented buttons line"
                    );
                }
            },
            Context::Group(group, ref mut in_amounts) => match line.indent {
                COL_CHILD => {
                    current_amount = None;
                    if let Some((key, value)) = scanner::key_value(line.content) {
                        match key {
                            "material" => {
                                settings.group_mut(group).material =
                                    scanner::unquote(value).to_string();
                            }
                            "amounts" if value.is_empty() => *in_amounts = true,
                            _ => {
                                tracing::debug!(key, "skipping unknown group key");
                            }
                        }
                    }
                }
                COL_FIELD => {
                    if *in_amounts {
                        if let Some((key, value)) = scanner::key_value(line.content) {
                            if value.is_empty() {
                                let amount = scanner::unquote(key).to_string();
                                settings
                                    .group_mut(group)
                                    .amounts
                                    .entry(amount.clone())
                                    .or_default();
                                current_amount = Some(amount);
                            }
                        }
                    }
                }
                COL_AMOUNT_FIELD => {
                    if let Some(amount) = current_amount.as_deref() {
                        if let Some((key, value)) = scanner::key_value(line.content) {
                            if let Some(button) =
                                settings.group_mut(group).amounts.get_mut(amount)
                            {
                                apply_amount_field(button, key, scanner::unquote(value));
                            }
                        }
                    }
                }
                _ => {
                    tracing::debug!(
                        indent = line.indent,
                        line = line.content,
                        "skipping misindented group line"
                    );
                }
            },
            Context::Top => {
                tracing::debug!(line = line.content, "skipping stray indented line");
            }
        }
    }

    settings
}

fn action_button_kind(key: &str, kind: TransactionKind) -> Option<ActionButtonKind> {
    match key {
        "confirm" => Some(ActionButtonKind::Confirm),
        "cancel" => Some(ActionButtonKind::Cancel),
        "back" => Some(ActionButtonKind::Back),
        // The purchase menu has no sell-all; an unexpected block acts as
        // a sink and its fields are dropped.
        "sell-all" if kind == TransactionKind::Sell => Some(ActionButtonKind::SellAll),
        _ => None,
    }
}

fn apply_action_field(
    settings: &mut TransactionMenuSettings,
    which: ActionButtonKind,
    key: &str,
    value: &str,
) {
    let button = match which {
        ActionButtonKind::Confirm => &mut settings.confirm,
        ActionButtonKind::Cancel => &mut settings.cancel,
        ActionButtonKind::Back => &mut settings.back,
        ActionButtonKind::SellAll => {
            match settings.sell_all.as_mut() {
                Some(b) => b,
                None => return,
            }
        }
    };
    match key {
        "material" => button.material = value.to_string(),
        "name" => button.name = value.to_string(),
        "slot" => button.slot = Slot::parse_or_default(value),
        _ => tracing::debug!(key, "skipping unknown action-button key"),
    }
}

fn apply_amount_field(button: &mut AmountButton, key: &str, value: &str) {
    match key {
        "name" => button.name = value.to_string(),
        "slot" => button.slot = Slot::parse_or_default(value),
        _ => tracing::debug!(key, "skipping unknown amount-button key"),
    }
}

fn parse_slot_or(raw: &str, default: u8) -> Slot {
    raw.parse::<u8>()
        .ok()
        .and_then(|v| Slot::new(v).ok())
        .or_else(|| Slot::new(default).ok())
        .unwrap_or_default()
}

/// Serializes a transaction-menu settings instance to canonical YAML.
///
/// Deterministic; groups render in the fixed add/remove/set order and
/// amount keys in sorted map order. Fixed buttons always render all three
/// fields so a partial hand edit cannot change unrelated output.
#[must_use]
pub fn serialize_transaction_menu(settings: &TransactionMenuSettings) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "title-prefix: {}\n",
        scanner::quoted(&settings.title_prefix)
    ));
    out.push_str(&format!(
        "display-material: {}\n",
        scanner::quoted(&settings.display_material)
    ));
    out.push_str(&format!("display-slot: {}\n", settings.display_slot));
    out.push_str(&format!("max-amount: {}\n", settings.max_amount));
    out.push_str("buttons:\n");
    serialize_action(&mut out, "confirm", &settings.confirm);
    serialize_action(&mut out, "cancel", &settings.cancel);
    serialize_action(&mut out, "back", &settings.back);
    if let Some(sell_all) = &settings.sell_all {
        serialize_action(&mut out, "sell-all", sell_all);
    }
    for group in [
        AmountGroupKind::Add,
        AmountGroupKind::Remove,
        AmountGroupKind::Set,
    ] {
        let buttons = settings.group(group);
        out.push_str(&format!("{}:\n", group.yaml_key()));
        out.push_str(&format!(
            "  material: {}\n",
            scanner::quoted(&buttons.material)
        ));
        if !buttons.amounts.is_empty() {
            out.push_str("  amounts:\n");
            for (amount, button) in &buttons.amounts {
                out.push_str(&format!("    {}:\n", scanner::quoted(amount)));
                out.push_str(&format!(
                    "      name: {}\n",
                    scanner::quoted(&button.name)
                ));
                out.push_str(&format!("      slot: {}\n", button.slot));
            }
        }
    }
    out
}

fn serialize_action(out: &mut String, key: &str, button: &ActionButton) {
    out.push_str(&format!("  {key}:\n"));
    out.push_str(&format!(
        "    material: {}\n",
        scanner::quoted(&button.material)
    ));
    out.push_str(&format!("    name: {}\n", scanner::quoted(&button.name)));
    out.push_str(&format!("    slot: {}\n", button.slot));
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const SAMPLE: &str = "title-prefix: '&8Buying'\ndisplay-material: 'CHEST'\ndisplay-slot: 22\nmax-amount: 2304\nbuttons:\n  confirm:\n    material: 'LIME_STAINED_GLASS_PANE'\n    name: '&aConfirm'\n    slot: 39\n  cancel:\n    material: 'RED_STAINED_GLASS_PANE'\n    name: '&cCancel'\n    slot: 41\nadd-buttons:\n  material: 'LIME_STAINED_GLASS_PANE'\n  amounts:\n    '1':\n      name: '&a+1'\n      slot: 24\n    '10':\n      name: '&a+10'\n      slot: 25\n";

    #[test]
    fn parses_scalars_and_buttons() {
        let settings = parse_transaction_menu(SAMPLE, TransactionKind::Purchase);
        assert_eq!(settings.title_prefix, "&8Buying");
        assert_eq!(settings.display_slot.get(), 22);
        assert_eq!(settings.max_amount, 2_304);
        assert_eq!(settings.confirm.slot.get(), 39);
        assert_eq!(settings.cancel.name, "&cCancel");
    }

    #[test]
    fn amount_buttons_land_under_their_keys() {
        let settings = parse_transaction_menu(SAMPLE, TransactionKind::Purchase);
        let one = settings.add_buttons.amounts.get("1");
        assert_eq!(one.map(|b| b.slot.get()), Some(24));
        let ten = settings.add_buttons.amounts.get("10");
        assert_eq!(ten.map(|b| b.name.as_str()), Some("&a+10"));
    }

    #[test]
    fn missing_fields_keep_kind_defaults() {
        let settings = parse_transaction_menu("title-prefix: '&8Buying'\n", TransactionKind::Purchase);
        assert_eq!(settings.back.slot.get(), 49);
        assert_eq!(
            settings.max_amount,
            TransactionMenuSettings::DEFAULT_MAX_AMOUNT
        );
    }

    #[test]
    fn sell_all_is_dropped_on_purchase_menu() {
        let text = "buttons:\n  sell-all:\n    material: 'HOPPER'\n    slot: 40\n";
        let settings = parse_transaction_menu(text, TransactionKind::Purchase);
        assert!(settings.sell_all.is_none());
    }

    #[test]
    fn sell_all_parses_on_sell_menu() {
        let text = "buttons:\n  sell-all:\n    material: 'BARREL'\n    slot: 38\n";
        let settings = parse_transaction_menu(text, TransactionKind::Sell);
        let Some(sell_all) = settings.sell_all else {
            panic!("missing sell-all");
        };
        assert_eq!(sell_all.material, "BARREL");
        assert_eq!(sell_all.slot.get(), 38);
    }

    #[test]
    fn unparsable_display_slot_falls_back_to_22() {
        let settings =
            parse_transaction_menu("display-slot: middle\n", TransactionKind::Purchase);
        assert_eq!(settings.display_slot.get(), 22);
    }

    #[test]
    fn round_trip_is_deep_equal() {
        let settings = parse_transaction_menu(SAMPLE, TransactionKind::Purchase);
        let reparsed = parse_transaction_menu(
            &serialize_transaction_menu(&settings),
            TransactionKind::Purchase,
        );
        assert_eq!(settings, reparsed);
    }

    #[test]
    fn serializer_is_deterministic() {
        let settings = parse_transaction_menu(SAMPLE, TransactionKind::Sell);
        assert_eq!(
            serialize_transaction_menu(&settings),
            serialize_transaction_menu(&settings)
        );
    }
}
