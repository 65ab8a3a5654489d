//! A toy rule engine for tests: walks a TOML document and reports what the builtin fixers
//! know how to fix.

#![allow(dead_code)]

use tomlfix_doc::toml_edit::{DocumentMut, InlineTable, Item, Table, Value};
use tomlfix_types::{Match, PathSegment, TomlPath};

pub fn detect(document: &str, raw: &str) -> Vec<Match> {
    let doc: DocumentMut = raw.parse().expect("detector input parses");
    let mut out = Vec::new();
    walk_table(document, doc.as_table(), &TomlPath::root(), &mut out);
    out
}

fn walk_table(document: &str, table: &Table, path: &TomlPath, out: &mut Vec<Match>) {
    for (key, item) in table.iter() {
        let here = path.join(key);
        match item {
            Item::Value(v) => walk_value(document, key, v, &here, out),
            Item::Table(t) => {
                walk_table(document, t, &here, out);
                flag_key(document, key, &here, out);
            }
            Item::ArrayOfTables(a) => {
                for (i, t) in a.iter().enumerate() {
                    walk_table(document, t, &here.join(PathSegment::Index(i)), out);
                }
                flag_key(document, key, &here, out);
            }
            Item::None => {}
        }
    }
}

fn walk_inline(document: &str, table: &InlineTable, path: &TomlPath, out: &mut Vec<Match>) {
    for (key, v) in table.iter() {
        walk_value(document, key, v, &path.join(key), out);
    }
}

fn walk_value(document: &str, key: &str, v: &Value, path: &TomlPath, out: &mut Vec<Match>) {
    flag_key(document, key, path, out);
    match v {
        Value::String(s) => {
            if s.display_repr().starts_with('\'') {
                out.push(at(document, "toml.string-style", path));
            }
            if is_truthy_word(s.value()) {
                out.push(at(document, "toml.truthy", path));
            }
        }
        Value::InlineTable(t) => walk_inline(document, t, path, out),
        _ => {}
    }
}

fn flag_key(document: &str, key: &str, path: &TomlPath, out: &mut Vec<Match>) {
    if key.contains('_') {
        out.push(at(document, "toml.key-case", path));
    }
}

fn is_truthy_word(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "yes" | "no" | "on" | "off" | "true" | "false"
    )
}

fn at(document: &str, rule: &str, path: &TomlPath) -> Match {
    Match::new(document, rule)
        .with_path(path.clone())
        .with_message(format!("{rule} at {path}"))
}
