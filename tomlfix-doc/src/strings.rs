//! Raw representations of single-line TOML strings.

use tomlfix_types::StringStyle;

/// Render `s` as a basic (double-quoted) TOML string.
pub fn quote_basic(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Whether `s` fits in a literal (single-quoted, single-line) string.
pub fn is_literal_representable(s: &str) -> bool {
    !s.chars().any(|c| c == '\'' || (c.is_control() && c != '\t'))
}

/// Render `s` as a literal (single-quoted) TOML string, if possible.
pub fn quote_literal(s: &str) -> Option<String> {
    if !is_literal_representable(s) {
        return None;
    }
    Some(format!("'{s}'"))
}

/// The quoting style of a raw string repr; `None` for multi-line strings or non-strings.
pub fn string_style(raw: &str) -> Option<StringStyle> {
    if raw.starts_with("\"\"\"") || raw.starts_with("'''") {
        return None;
    }
    if raw.starts_with('"') {
        Some(StringStyle::Basic)
    } else if raw.starts_with('\'') {
        Some(StringStyle::Literal)
    } else {
        None
    }
}
