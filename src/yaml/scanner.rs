//! Line-scanning primitives shared by the four document grammars.
//!
//! The grammars are positional: structure is recognized by the exact
//! column a line starts at, never by indentation level. The scanner
//! therefore reports raw column numbers and leaves all routing to the
//! per-grammar state machines.

/// One scanned logical line: raw indent column plus trimmed content.
#[derive(Debug, Clone, Copy)]
pub struct Line<'a> {
    /// Column of the first non-space character.
    pub indent: usize,
    /// Content with surrounding whitespace removed. Never empty.
    pub content: &'a str,
}

/// Iterates the non-blank, non-comment lines of `text`.
///
/// Blank lines and `#` comment lines are skipped unconditionally,
/// regardless of what section a grammar is currently inside.
pub fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    text.lines().filter_map(|raw| {
        let content = raw.trim();
        if content.is_empty() || content.starts_with('#') {
            return None;
        }
        Some(Line {
            indent: indent_of(raw),
            content,
        })
    })
}

/// Column of the first non-space character (raw column, not indent level).
#[must_use]
pub fn indent_of(raw: &str) -> usize {
    raw.chars().take_while(|c| *c == ' ').count()
}

/// Splits `key: value` content at the first colon.
///
/// Returns `None` when the line has no colon at all. The value side is
/// trimmed but not unquoted; `key:` with nothing after yields an empty
/// value.
#[must_use]
pub fn key_value(content: &str) -> Option<(&str, &str)> {
    let (key, value) = content.split_once(':')?;
    Some((key.trim(), value.trim()))
}

/// Recognizes a block-sequence item: `- rest` or a bare `-`.
///
/// Returns the trimmed rest (empty for a bare dash, which the shop
/// grammar uses as the split item-start syntax and the lore grammar as a
/// blank spacer line). Content like `-1` is not a sequence item.
#[must_use]
pub fn list_item(content: &str) -> Option<&str> {
    if content == "-" {
        return Some("");
    }
    content.strip_prefix("- ").map(str::trim)
}

/// Strips one surrounding pair of single or double quotes.
///
/// No escape processing happens beyond that, matching the plugin's own
/// reader.
#[must_use]
pub fn unquote(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes.first().copied();
        let last = bytes.last().copied();
        if (first == Some(b'\'') && last == Some(b'\''))
            || (first == Some(b'"') && last == Some(b'"'))
        {
            return raw.get(1..raw.len() - 1).unwrap_or(raw);
        }
    }
    raw
}

/// Parses a float scalar, falling back to `default` and clamping
/// negatives to zero (prices are non-negative by contract).
#[must_use]
pub fn parse_price_or(raw: &str, default: f64) -> f64 {
    raw.parse::<f64>().map_or(default, |v| v.max(0.0))
}

/// Parses an unsigned integer scalar with a fallback.
#[must_use]
pub fn parse_u32_or(raw: &str, default: u32) -> u32 {
    raw.parse::<u32>().unwrap_or(default)
}

/// Parses a row count, falling back to `default` and clamping into the
/// given inclusive range.
#[must_use]
pub fn parse_rows_or(raw: &str, default: u8, max: u8) -> u8 {
    raw.parse::<u8>().map_or(default, |v| v.clamp(1, max))
}

/// Boolean literals: exactly `true` is true, anything else is false.
#[must_use]
pub fn parse_bool(raw: &str) -> bool {
    raw == "true"
}

/// Renders a string scalar in canonical output form: single-quoted.
#[must_use]
pub fn quoted(raw: &str) -> String {
    format!("'{raw}'")
}

/// Renders a number as plain digits (`100.0` renders `100`, `2.5` stays).
#[must_use]
pub fn plain_number(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn lines_skip_blanks_and_comments() {
        let text = "a: 1\n\n# comment\n   # indented comment\n  b: 2\n";
        let collected: Vec<(usize, &str)> =
            lines(text).map(|l| (l.indent, l.content)).collect();
        assert_eq!(collected, vec![(0, "a: 1"), (2, "b: 2")]);
    }

    #[test]
    fn indent_is_raw_column_count() {
        assert_eq!(indent_of("key: v"), 0);
        assert_eq!(indent_of("  key: v"), 2);
        assert_eq!(indent_of("   key: v"), 3);
    }

    #[test]
    fn key_value_splits_at_first_colon() {
        assert_eq!(key_value("name: '&7Buy: cheap'"), Some(("name", "'&7Buy: cheap'")));
        assert_eq!(key_value("buttons:"), Some(("buttons", "")));
        assert_eq!(key_value("no colon here"), None);
    }

    #[test]
    fn list_item_accepts_bare_dash() {
        assert_eq!(list_item("-"), Some(""));
        assert_eq!(list_item("- material: STONE"), Some("material: STONE"));
        assert_eq!(list_item("- ''"), Some("''"));
        assert_eq!(list_item("-1"), None);
    }

    #[test]
    fn unquote_strips_one_pair_only() {
        assert_eq!(unquote("'&bGem'"), "&bGem");
        assert_eq!(unquote("\"&bGem\""), "&bGem");
        assert_eq!(unquote("''"), "");
        assert_eq!(unquote("'mismatched\""), "'mismatched\"");
        assert_eq!(unquote("plain"), "plain");
        assert_eq!(unquote("'"), "'");
    }

    #[test]
    fn price_parsing_clamps_negatives() {
        assert_eq!(parse_price_or("100", 0.0), 100.0);
        assert_eq!(parse_price_or("2.5", 0.0), 2.5);
        assert_eq!(parse_price_or("-3", 0.0), 0.0);
        assert_eq!(parse_price_or("junk", 0.0), 0.0);
    }

    #[test]
    fn rows_parsing_clamps_and_falls_back() {
        assert_eq!(parse_rows_or("4", 3, 5), 4);
        assert_eq!(parse_rows_or("9", 3, 5), 5);
        assert_eq!(parse_rows_or("0", 3, 5), 1);
        assert_eq!(parse_rows_or("junk", 3, 5), 3);
    }

    #[test]
    fn booleans_are_strict_true() {
        assert!(parse_bool("true"));
        assert!(!parse_bool("True"));
        assert!(!parse_bool("yes"));
        assert!(!parse_bool("false"));
    }

    #[test]
    fn plain_number_drops_trailing_zero() {
        assert_eq!(plain_number(100.0), "100");
        assert_eq!(plain_number(2.5), "2.5");
    }
}
