//! Line → structural path index, built once from the original text.
//!
//! Rule engines often report only a line. This index maps each table header and each
//! `key = value` line (including the continuation lines of multi-line values) to the path of
//! the node it declares.

use std::collections::HashMap;
use tomlfix_types::{PathSegment, TomlPath};

#[derive(Debug, Clone, Default)]
pub(crate) struct LineIndex {
    entries: Vec<LineEntry>,
}

#[derive(Debug, Clone)]
struct LineEntry {
    first: u64,
    last: u64,
    path: TomlPath,
}

impl LineIndex {
    pub(crate) fn build(raw: &str) -> Self {
        let mut entries: Vec<LineEntry> = Vec::new();
        let mut table = TomlPath::root();
        // Element counts of arrays of tables, keyed by their (parent-indexed) path.
        let mut aot_len: HashMap<TomlPath, usize> = HashMap::new();
        let mut scanner = ValueScanner::default();

        for (idx, line) in raw.lines().enumerate() {
            let lineno = idx as u64 + 1;

            if scanner.is_open() {
                scanner.feed(line);
                if let Some(last) = entries.last_mut() {
                    last.last = lineno;
                }
                continue;
            }

            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix("[[") {
                let Some(keys) = header_keys(rest, "]]") else {
                    continue;
                };
                let Some((last, parents)) = keys.split_last() else {
                    continue;
                };
                let base = indexed_path(parents, &aot_len).join(last.as_str());
                let len = aot_len.entry(base.clone()).or_insert(0);
                *len += 1;
                table = base.join(PathSegment::Index(*len - 1));
                entries.push(LineEntry {
                    first: lineno,
                    last: lineno,
                    path: table.clone(),
                });
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix('[') {
                let Some(keys) = header_keys(rest, "]") else {
                    continue;
                };
                table = indexed_path(&keys, &aot_len);
                entries.push(LineEntry {
                    first: lineno,
                    last: lineno,
                    path: table.clone(),
                });
                continue;
            }

            let Some((keys, value)) = split_key_value(trimmed) else {
                continue;
            };
            let mut path = table.clone();
            for k in keys {
                path.push(k);
            }
            entries.push(LineEntry {
                first: lineno,
                last: lineno,
                path,
            });
            scanner.feed(value);
        }

        Self { entries }
    }

    /// Path declared on (or continued through) `line`.
    pub(crate) fn path_at(&self, line: u64) -> Option<&TomlPath> {
        self.entries
            .iter()
            .find(|e| e.first <= line && line <= e.last)
            .map(|e| &e.path)
    }

    /// First line of the deepest declared node on the way to `path`.
    pub(crate) fn line_of(&self, path: &TomlPath) -> Option<u64> {
        self.entries
            .iter()
            .filter(|e| path.starts_with(&e.path))
            .max_by_key(|e| (e.path.len(), std::cmp::Reverse(e.first)))
            .map(|e| e.first)
    }
}

fn indexed_path(keys: &[String], aot_len: &HashMap<TomlPath, usize>) -> TomlPath {
    let mut path = TomlPath::root();
    for k in keys {
        path.push(k.as_str());
        if let Some(len) = aot_len.get(&path) {
            path.push(PathSegment::Index(len.saturating_sub(1)));
        }
    }
    path
}

fn header_keys(rest: &str, close: &str) -> Option<Vec<String>> {
    let end = find_unquoted(rest, close)?;
    split_dotted(&rest[..end])
}

fn split_key_value(line: &str) -> Option<(Vec<String>, &str)> {
    let eq = find_unquoted(line, "=")?;
    let keys = split_dotted(&line[..eq])?;
    Some((keys, &line[eq + 1..]))
}

/// Byte offset of the first `needle` outside quotes.
fn find_unquoted(s: &str, needle: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if q == '"' && c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => {
                if c == '"' || c == '\'' {
                    quote = Some(c);
                } else if s[i..].starts_with(needle) {
                    return Some(i);
                }
            }
        }
    }
    None
}

fn split_dotted(s: &str) -> Option<Vec<String>> {
    let mut keys = Vec::new();
    let mut rest = s;
    loop {
        let end = find_unquoted(rest, ".").unwrap_or(rest.len());
        keys.push(unquote_key(rest[..end].trim())?);
        if end == rest.len() {
            break;
        }
        rest = &rest[end + 1..];
    }
    Some(keys)
}

fn unquote_key(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    if let Some(inner) = raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        return Some(inner.replace("\\\"", "\"").replace("\\\\", "\\"));
    }
    if let Some(inner) = raw.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) {
        return Some(inner.to_string());
    }
    let bare = raw
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    bare.then(|| raw.to_string())
}

/// Tracks whether a value continues past the end of its line.
#[derive(Debug, Default)]
struct ValueScanner {
    depth: usize,
    multiline: Option<&'static [u8]>,
}

impl ValueScanner {
    fn is_open(&self) -> bool {
        self.depth > 0 || self.multiline.is_some()
    }

    fn feed(&mut self, text: &str) {
        let b = text.as_bytes();
        let mut i = 0;
        while i < b.len() {
            if let Some(delim) = self.multiline {
                match find_bytes(&b[i..], delim) {
                    Some(pos) => {
                        i += pos + delim.len();
                        self.multiline = None;
                    }
                    None => return,
                }
                continue;
            }

            match b[i] {
                b'#' => return,
                q @ (b'"' | b'\'') => {
                    let triple: &'static [u8] = if q == b'"' { b"\"\"\"" } else { b"'''" };
                    if b[i..].starts_with(triple) {
                        self.multiline = Some(triple);
                        i += 3;
                        continue;
                    }
                    i += 1;
                    while i < b.len() {
                        if q == b'"' && b[i] == b'\\' {
                            i += 2;
                            continue;
                        }
                        if b[i] == q {
                            break;
                        }
                        i += 1;
                    }
                    i += 1;
                }
                b'[' | b'{' => {
                    self.depth += 1;
                    i += 1;
                }
                b']' | b'}' => {
                    self.depth = self.depth.saturating_sub(1);
                    i += 1;
                }
                _ => i += 1,
            }
        }
    }
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
