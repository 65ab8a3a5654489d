//! Carry the original text's line layout over to a re-serialized tree.
//!
//! `toml_edit` ends every line it emits with `\n` and always terminates the last one. Lines an
//! edit did not touch are copied from the original instead, terminator included, so line endings
//! and a missing final newline survive.

use diffy::{DiffOptions, Line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    /// Style of the first line break; `Lf` for single-line text.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(i) if text[..i].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Rebuild `edited` on top of `original`.
///
/// Lines present in both are taken verbatim from `original`. Inserted lines end with the
/// original's line ending. When `original` has no final newline, neither does the result.
pub fn splice(original: &str, edited: &str) -> String {
    let old = normalize(original);
    let new = normalize(edited);
    if old == new {
        return original.to_string();
    }

    let eol = LineEnding::detect(original);
    let old_lines: Vec<&str> = original.split_inclusive('\n').collect();
    let patch = DiffOptions::new().create_patch(&old, &new);

    let mut out = String::with_capacity(edited.len() + old_lines.len());
    let mut next = 0;
    for hunk in patch.hunks() {
        let range = hunk.old_range();
        // Hunk ranges are 1-based unless empty.
        let start = if range.is_empty() {
            range.start()
        } else {
            range.start() - 1
        };
        for line in old_lines.get(next..start).into_iter().flatten() {
            out.push_str(line);
        }
        next = start;

        for line in hunk.lines() {
            match line {
                Line::Context(_) => {
                    if let Some(kept) = old_lines.get(next) {
                        out.push_str(kept);
                    }
                    next += 1;
                }
                Line::Delete(_) => next += 1,
                Line::Insert(text) => match text.strip_suffix('\n') {
                    Some(body) => {
                        out.push_str(body);
                        out.push_str(eol.as_str());
                    }
                    None => out.push_str(text),
                },
            }
        }
    }
    for line in old_lines.get(next..).into_iter().flatten() {
        out.push_str(line);
    }

    if !original.is_empty()
        && !original.ends_with('\n')
        && let Some(body) = out.strip_suffix('\n')
    {
        let len = body.strip_suffix('\r').unwrap_or(body).len();
        out.truncate(len);
    }
    out
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn detects_first_line_break() {
        assert_eq!(LineEnding::detect("a = 1\r\nb = 2\n"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a = 1\nb = 2\r\n"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a = 1"), LineEnding::Lf);
    }

    #[test]
    fn unchanged_content_returns_original_bytes() {
        let original = "# c\r\n[t]\r\na = 1";
        assert_eq!(splice(original, "# c\n[t]\na = 1\n"), original);
    }

    #[test]
    fn crlf_survives_a_changed_line() {
        assert_eq!(
            splice("# c\r\n[t]\r\na = 1\r\nb = 3\r\n", "# c\n[t]\na = 2\nb = 3\n"),
            "# c\r\n[t]\r\na = 2\r\nb = 3\r\n"
        );
    }

    #[test]
    fn mixed_endings_are_kept_per_line() {
        assert_eq!(
            splice("a = 1\r\nb = 2\nc = 3\r\n", "a = 1\nb = 9\nc = 3\n"),
            "a = 1\r\nb = 9\r\nc = 3\r\n"
        );
    }

    #[test]
    fn missing_final_newline_stays_missing() {
        assert_eq!(splice("[t]\nb = 3\na = 1", "[t]\nb = 3\na = 2\n"), "[t]\nb = 3\na = 2");
        assert_eq!(
            splice("[t]\r\na = 1\r\nb = 2", "[t]\nb = 2\na = 1\n"),
            "[t]\r\nb = 2\r\na = 1"
        );
    }

    #[test]
    fn inserted_and_removed_lines() {
        assert_eq!(
            splice("[w]\r\nm = []\r\n\r\n[x]\r\n", "[w]\nm = []\nr = \"2\"\n\n[x]\n"),
            "[w]\r\nm = []\r\nr = \"2\"\r\n\r\n[x]\r\n"
        );
        assert_eq!(splice("a = 1\r\nb = 2\r\n", "b = 2\n"), "b = 2\r\n");
    }

    #[test]
    fn empty_original_takes_edited_text() {
        assert_eq!(splice("", "a = 1\n"), "a = 1\n");
    }
}
