//! Deprecated combined `gui.yml` grammar: parser and splice serializer.
//!
//! The legacy file nests everything under a single `menus:` root, pushing
//! every block four columns deeper than the split files: sections at 2,
//! their fields at 4, button keys and group children at 6, button fields
//! and amount keys at 8, lore dashes and amount fields at 10. The two
//! formats disagree on indentation depth for structurally identical data,
//! so this parser is a separate machine from the split-file ones and must
//! stay that way.

use crate::domain::{
    ActionButtonKind, AmountButton, AmountGroupKind, MainMenuButton, MainMenuState, Slot,
    TransactionKind, TransactionMenuSettings,
};

use super::scanner;

const COL_ROOT: usize = 0;
const COL_SECTION: usize = 2;
const COL_FIELD: usize = 4;
const COL_CHILD: usize = 6;
const COL_SUB: usize = 8;
const COL_SUBSUB: usize = 10;

/// The three menu documents carried by one legacy `gui.yml`.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyMenus {
    /// Main menu document.
    pub main: MainMenuState,
    /// Purchase menu settings.
    pub purchase: TransactionMenuSettings,
    /// Sell menu settings.
    pub sell: TransactionMenuSettings,
}

impl Default for LegacyMenus {
    fn default() -> Self {
        Self {
            main: MainMenuState::default(),
            purchase: TransactionMenuSettings::defaults(TransactionKind::Purchase),
            sell: TransactionMenuSettings::defaults(TransactionKind::Sell),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Main,
    Transaction(TransactionKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainCx {
    Fields,
    Buttons,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxCx {
    Fields,
    Buttons(Option<ActionButtonKind>),
    Group(AmountGroupKind, bool),
}

/// Parses the deprecated combined `gui.yml`.
///
/// Best-effort and infallible, like every grammar here. Sections the file
/// does not carry keep their canonical defaults.
#[must_use]
pub fn parse_legacy_gui(text: &str) -> LegacyMenus {
    let mut menus = LegacyMenus::default();
    let mut section = Section::None;
    let mut main_cx = MainCx::Fields;
    let mut tx_cx = TxCx::Fields;
    let mut current_button: Option<MainMenuButton> = None;
    let mut lore_mode = false;
    let mut current_amount: Option<String> = None;

    for line in scanner::lines(text) {
        match line.indent {
            COL_ROOT => {
                finalize_button(&mut menus, section, &mut current_button);
                section = Section::None;
            }
            COL_SECTION => {
                finalize_button(&mut menus, section, &mut current_button);
                main_cx = MainCx::Fields;
                tx_cx = TxCx::Fields;
                lore_mode = false;
                current_amount = None;
                section = match scanner::key_value(line.content) {
                    Some(("main", "")) => Section::Main,
                    Some(("purchase", "")) => Section::Transaction(TransactionKind::Purchase),
                    Some(("sell", "")) => Section::Transaction(TransactionKind::Sell),
                    _ => {
                        tracing::debug!(line = line.content, "skipping unknown legacy section");
                        Section::None
                    }
                };
            }
            COL_FIELD => match section {
                Section::Main => {
                    finalize_button(&mut menus, section, &mut current_button);
                    lore_mode = false;
                    if let Some((key, value)) = scanner::key_value(line.content) {
                        match key {
                            "title" => menus.main.title = scanner::unquote(value).to_string(),
                            "rows" => {
                                menus.main.rows =
                                    scanner::parse_rows_or(scanner::unquote(value), 3, 6);
                            }
                            "buttons" if value.is_empty() => main_cx = MainCx::Buttons,
                            _ => {
                                tracing::debug!(key, "skipping unknown legacy main key");
                            }
                        }
                    }
                }
                Section::Transaction(kind) => {
                    current_amount = None;
                    if let Some((key, value)) = scanner::key_value(line.content) {
                        let settings = transaction_mut(&mut menus, kind);
                        match key {
                            "title-prefix" => {
                                settings.title_prefix = scanner::unquote(value).to_string();
                            }
                            "display-material" => {
                                settings.display_material =
                                    scanner::unquote(value).to_string();
                            }
                            "display-slot" => {
                                settings.display_slot = slot_or(
                                    scanner::unquote(value),
                                    TransactionMenuSettings::DEFAULT_DISPLAY_SLOT,
                                );
                            }
                            "max-amount" => {
                                settings.max_amount = scanner::parse_u32_or(
                                    scanner::unquote(value),
                                    TransactionMenuSettings::DEFAULT_MAX_AMOUNT,
                                )
                                .max(1);
                            }
                            "buttons" if value.is_empty() => tx_cx = TxCx::Buttons(None),
                            "add-buttons" if value.is_empty() => {
                                tx_cx = TxCx::Group(AmountGroupKind::Add, false);
                            }
                            "remove-buttons" if value.is_empty() => {
                                tx_cx = TxCx::Group(AmountGroupKind::Remove, false);
                            }
                            "set-buttons" if value.is_empty() => {
                                tx_cx = TxCx::Group(AmountGroupKind::Set, false);
                            }
                            _ => {
                                tracing::debug!(key, "skipping unknown legacy transaction key");
                            }
                        }
                    }
                }
                Section::None => {}
            },
            COL_CHILD => match (section, main_cx, tx_cx) {
                (Section::Main, MainCx::Buttons, _) => {
                    if let Some((key, value)) = scanner::key_value(line.content) {
                        if value.is_empty() {
                            finalize_button(&mut menus, section, &mut current_button);
                            current_button = Some(MainMenuButton::with_key(key));
                            lore_mode = false;
                        }
                    }
                }
                (Section::Transaction(kind), _, TxCx::Buttons(_)) => {
                    if let Some((key, value)) = scanner::key_value(line.content) {
                        if value.is_empty() {
                            tx_cx = TxCx::Buttons(legacy_action_kind(key, kind));
                        }
                    }
                }
                (Section::Transaction(kind), _, TxCx::Group(group, _)) => {
                    current_amount = None;
                    if let Some((key, value)) = scanner::key_value(line.content) {
                        match key {
                            "material" => {
                                transaction_mut(&mut menus, kind).group_mut(group).material =
                                    scanner::unquote(value).to_string();
                            }
                            "amounts" if value.is_empty() => {
                                tx_cx = TxCx::Group(group, true);
                            }
                            _ => {
                                tracing::debug!(key, "skipping unknown legacy group key");
                            }
                        }
                    }
                }
                _ => {}
            },
            COL_SUB => match (section, tx_cx) {
                (Section::Main, _) => {
                    if let Some(button) = current_button.as_mut() {
                        if let Some((key, value)) = scanner::key_value(line.content) {
                            if key == "lore" && value.is_empty() {
                                lore_mode = true;
                            } else {
                                lore_mode = false;
                                apply_main_button_field(button, key, scanner::unquote(value));
                            }
                        }
                    }
                }
                (Section::Transaction(kind), TxCx::Buttons(Some(which))) => {
                    if let Some((key, value)) = scanner::key_value(line.content) {
                        apply_action_field(
                            transaction_mut(&mut menus, kind),
                            which,
                            key,
                            scanner::unquote(value),
                        );
                    }
                }
                (Section::Transaction(kind), TxCx::Group(group, true)) => {
                    if let Some((key, value)) = scanner::key_value(line.content) {
                        if value.is_empty() {
                            let amount = scanner::unquote(key).to_string();
                            transaction_mut(&mut menus, kind)
                                .group_mut(group)
                                .amounts
                                .entry(amount.clone())
                                .or_default();
                            current_amount = Some(amount);
                        }
                    }
                }
                _ => {}
            },
            COL_SUBSUB => match (section, tx_cx) {
                (Section::Main, _) => {
                    if lore_mode {
                        if let Some(button) = current_button.as_mut() {
                            if let Some(rest) = scanner::list_item(line.content) {
                                button.lore.push(scanner::unquote(rest).to_string());
                            }
                        }
                    }
                }
                (Section::Transaction(kind), TxCx::Group(group, true)) => {
                    if let Some(amount) = current_amount.as_deref() {
                        if let Some((key, value)) = scanner::key_value(line.content) {
                            if let Some(button) = transaction_mut(&mut menus, kind)
                                .group_mut(group)
                                .amounts
                                .get_mut(amount)
                            {
                                apply_amount_field(button, key, scanner::unquote(value));
                            }
                        }
                    }
                }
                _ => {}
            },
            _ => {
                tracing::debug!(
                    indent = line.indent,
                    line = line.content,
                    "skipping misindented legacy line"
                );
            }
        }
    }

    finalize_button(&mut menus, section, &mut current_button);
    menus
}

fn finalize_button(
    menus: &mut LegacyMenus,
    section: Section,
    current: &mut Option<MainMenuButton>,
) {
    if section == Section::Main {
        if let Some(button) = current.take() {
            menus.main.buttons.push(button);
        }
    } else {
        *current = None;
    }
}

fn transaction_mut(menus: &mut LegacyMenus, kind: TransactionKind) -> &mut TransactionMenuSettings {
    match kind {
        TransactionKind::Purchase => &mut menus.purchase,
        TransactionKind::Sell => &mut menus.sell,
    }
}

fn legacy_action_kind(key: &str, kind: TransactionKind) -> Option<ActionButtonKind> {
    match key {
        "confirm" => Some(ActionButtonKind::Confirm),
        "cancel" => Some(ActionButtonKind::Cancel),
        "back" => Some(ActionButtonKind::Back),
        "sell-all" if kind == TransactionKind::Sell => Some(ActionButtonKind::SellAll),
        _ => None,
    }
}

fn apply_main_button_field(button: &mut MainMenuButton, key: &str, value: &str) {
    match key {
        "material" => button.material = value.to_string(),
        "name" => button.name = value.to_string(),
        "slot" => button.slot = Slot::parse_or_default(value),
        "shop" => button.shop = value.to_string(),
        "permission" => button.permission = value.to_string(),
        "hide-attributes" => button.hide_attributes = scanner::parse_bool(value),
        "hide-additional" => button.hide_additional = scanner::parse_bool(value),
        _ => tracing::debug!(key, "skipping unknown legacy button key"),
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
        ActionButtonKind::SellAll => match settings.sell_all.as_mut() {
            Some(b) => b,
            None => return,
        },
    };
    match key {
        "material" => button.material = value.to_string(),
        "name" => button.name = value.to_string(),
        "slot" => button.slot = Slot::parse_or_default(value),
        _ => tracing::debug!(key, "skipping unknown legacy action key"),
    }
}

fn apply_amount_field(button: &mut AmountButton, key: &str, value: &str) {
    match key {
        "name" => button.name = value.to_string(),
        "slot" => button.slot = Slot::parse_or_default(value),
        _ => tracing::debug!(key, "skipping unknown legacy amount key"),
    }
}

fn slot_or(raw: &str, default: u8) -> Slot {
    raw.parse::<u8>()
        .ok()
        .and_then(|v| Slot::new(v).ok())
        .or_else(|| Slot::new(default).ok())
        .unwrap_or_default()
}

/// Rewrites a legacy `gui.yml`, splicing regenerated `main:`, `purchase:`
/// and `sell:` section bodies into the previously loaded original text.
///
/// Every line outside those bodies (headers, comments, unknown top-level
/// keys) is copied byte-identical. A replaced body extends over the lines
/// that are blank or indented past column 2; the first non-blank line at
/// column 2 or less terminates it. Sections missing from the original are
/// appended at the end so an edit cannot be silently dropped.
#[must_use]
pub fn splice_legacy_gui(original: &str, menus: &LegacyMenus) -> String {
    if original.trim().is_empty() {
        let mut out = String::from("menus:\n");
        emit_main_section(&mut out, &menus.main);
        emit_transaction_section(&mut out, &menus.purchase);
        emit_transaction_section(&mut out, &menus.sell);
        return out;
    }

    let mut out = String::new();
    let mut seen_main = false;
    let mut seen_purchase = false;
    let mut seen_sell = false;

    let mut lines = original.lines().peekable();
    while let Some(raw) = lines.next() {
        let content = raw.trim();
        let is_section = scanner::indent_of(raw) == COL_SECTION
            && !content.starts_with('#')
            && content.len() > 1
            && content.ends_with(':');
        let key = content.strip_suffix(':').unwrap_or(content);

        if is_section && matches!(key, "main" | "purchase" | "sell") {
            match key {
                "main" => {
                    seen_main = true;
                    emit_main_section(&mut out, &menus.main);
                }
                "purchase" => {
                    seen_purchase = true;
                    emit_transaction_section(&mut out, &menus.purchase);
                }
                _ => {
                    seen_sell = true;
                    emit_transaction_section(&mut out, &menus.sell);
                }
            }
            // Consume the original body.
            while let Some(next) = lines.peek() {
                if !next.trim().is_empty() && scanner::indent_of(next) <= COL_SECTION {
                    break;
                }
                lines.next();
            }
        } else {
            out.push_str(raw);
            out.push('\n');
        }
    }

    if !seen_main {
        emit_main_section(&mut out, &menus.main);
    }
    if !seen_purchase {
        emit_transaction_section(&mut out, &menus.purchase);
    }
    if !seen_sell {
        emit_transaction_section(&mut out, &menus.sell);
    }
    out
}

fn emit_main_section(out: &mut String, menu: &MainMenuState) {
    out.push_str("  main:\n");
    out.push_str(&format!("    title: {}\n", scanner::quoted(&menu.title)));
    out.push_str(&format!("    rows: {}\n", menu.rows));
    if !menu.buttons.is_empty() {
        out.push_str("    buttons:\n");
        for button in &menu.buttons {
            out.push_str(&format!("      {}:\n", button.key));
            out.push_str(&format!(
                "        material: {}\n",
                scanner::quoted(&button.material)
            ));
            if !button.name.is_empty() {
                out.push_str(&format!(
                    "        name: {}\n",
                    scanner::quoted(&button.name)
                ));
            }
            out.push_str(&format!("        slot: {}\n", button.slot));
            if !button.shop.is_empty() {
                out.push_str(&format!(
                    "        shop: {}\n",
                    scanner::quoted(&button.shop)
                ));
            }
            if !button.permission.is_empty() {
                out.push_str(&format!(
                    "        permission: {}\n",
                    scanner::quoted(&button.permission)
                ));
            }
            if !button.lore.is_empty() {
                out.push_str("        lore:\n");
                for line in &button.lore {
                    out.push_str(&format!("          - {}\n", scanner::quoted(line)));
                }
            }
            if button.hide_attributes {
                out.push_str("        hide-attributes: true\n");
            }
            if button.hide_additional {
                out.push_str("        hide-additional: true\n");
            }
        }
    }
}

fn emit_transaction_section(out: &mut String, settings: &TransactionMenuSettings) {
    out.push_str(&format!("  {}:\n", settings.kind));
    out.push_str(&format!(
        "    title-prefix: {}\n",
        scanner::quoted(&settings.title_prefix)
    ));
    out.push_str(&format!(
        "    display-material: {}\n",
        scanner::quoted(&settings.display_material)
    ));
    out.push_str(&format!("    display-slot: {}\n", settings.display_slot));
    out.push_str(&format!("    max-amount: {}\n", settings.max_amount));
    out.push_str("    buttons:\n");
    emit_legacy_action(out, "confirm", &settings.confirm);
    emit_legacy_action(out, "cancel", &settings.cancel);
    emit_legacy_action(out, "back", &settings.back);
    if let Some(sell_all) = &settings.sell_all {
        emit_legacy_action(out, "sell-all", sell_all);
    }
    for group in [
        AmountGroupKind::Add,
        AmountGroupKind::Remove,
        AmountGroupKind::Set,
    ] {
        let buttons = settings.group(group);
        out.push_str(&format!("    {}:\n", group.yaml_key()));
        out.push_str(&format!(
            "      material: {}\n",
            scanner::quoted(&buttons.material)
        ));
        if !buttons.amounts.is_empty() {
            out.push_str("      amounts:\n");
            for (amount, button) in &buttons.amounts {
                out.push_str(&format!("        {}:\n", scanner::quoted(amount)));
                out.push_str(&format!(
                    "          name: {}\n",
                    scanner::quoted(&button.name)
                ));
                out.push_str(&format!("          slot: {}\n", button.slot));
            }
        }
    }
}

fn emit_legacy_action(out: &mut String, key: &str, button: &crate::domain::ActionButton) {
    out.push_str(&format!("    {key}:\n"));
    out.push_str(&format!(
        "      material: {}\n",
        scanner::quoted(&button.material)
    ));
    out.push_str(&format!("      name: {}\n", scanner::quoted(&button.name)));
    out.push_str(&format!("      slot: {}\n", button.slot));
}
