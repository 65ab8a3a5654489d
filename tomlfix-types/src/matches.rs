use crate::path::TomlPath;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A match ledger: the ordered output of one rule engine run.
///
/// tomlfix tries hard to be *tolerant* when reading ledgers:
/// - Unknown fields are ignored.
/// - Optional fields may be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchLedger {
    /// Schema identifier, e.g. "tomlfix.matches.v1".
    pub schema: String,

    pub tool: ToolInfo,

    #[serde(default)]
    pub matches: Vec<Match>,
}

impl MatchLedger {
    pub fn new(tool: ToolInfo) -> Self {
        Self {
            schema: crate::schema::TOMLFIX_MATCHES_V1.to_string(),
            tool,
            matches: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

/// Stable identity of a document: its path relative to the store root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Utf8PathBuf);

impl DocumentId {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Utf8Path {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Lexically normalized: `.` segments and repeated separators dropped. `..` is kept, since
    /// resolving it needs the filesystem.
    pub fn normalized(&self) -> DocumentId {
        let path: Utf8PathBuf = self
            .0
            .components()
            .filter(|c| !matches!(c, Utf8Component::CurDir))
            .collect();
        if path.as_str().is_empty() {
            return self.clone();
        }
        Self(path)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(Utf8PathBuf::from(s))
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(Utf8PathBuf::from(s))
    }
}

impl From<Utf8PathBuf> for DocumentId {
    fn from(p: Utf8PathBuf) -> Self {
        Self(p)
    }
}

/// One detected rule violation. Read-only to tomlfix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub document: DocumentId,

    pub rule_id: String,

    #[serde(default)]
    pub severity: Severity,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub location: Location,

    /// Optional structured hint from the rule engine about the expected fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<FixPayload>,
}

impl Match {
    pub fn new(document: impl Into<DocumentId>, rule_id: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            rule_id: rule_id.into(),
            severity: Severity::default(),
            message: String::new(),
            location: Location::default(),
            fix: None,
        }
    }

    pub fn with_line(mut self, line: u64) -> Self {
        self.location.line = Some(line);
        self
    }

    pub fn with_column(mut self, column: u64) -> Self {
        self.location.column = Some(column);
        self
    }

    pub fn with_path(mut self, path: TomlPath) -> Self {
        self.location.toml_path = path;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_fix(mut self, fix: FixPayload) -> Self {
        self.fix = Some(fix);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Info,
    Warn,
    Error,
}

/// Where a match points. Either coordinate may be absent; a structural path wins over a line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// 1-based line in the original document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,

    /// 1-based column in the original document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u64>,

    #[serde(default, skip_serializing_if = "TomlPath::is_empty")]
    pub toml_path: TomlPath,
}

impl Location {
    pub fn at_line(line: u64) -> Self {
        Self {
            line: Some(line),
            ..Self::default()
        }
    }

    pub fn at_path(path: TomlPath) -> Self {
        Self {
            toml_path: path,
            ..Self::default()
        }
    }

    pub fn is_unspecified(&self) -> bool {
        self.line.is_none() && self.toml_path.is_empty()
    }
}

/// Fix hint supplied by the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FixPayload {
    Set { value: serde_json::Value },
    Remove,
    Rename { to: String },
    Restyle { style: StringStyle },
}

impl FixPayload {
    /// The payload's wire tag, as listed in `FixerMeta::payloads`.
    pub fn kind(&self) -> &'static str {
        match self {
            FixPayload::Set { .. } => "set",
            FixPayload::Remove => "remove",
            FixPayload::Rename { .. } => "rename",
            FixPayload::Restyle { .. } => "restyle",
        }
    }
}

/// Quoting style of a single-line TOML string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringStyle {
    /// `"..."`
    #[default]
    Basic,
    /// `'...'`
    Literal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathSegment;
    use pretty_assertions::assert_eq;

    #[test]
    fn match_tolerates_missing_optional_fields() {
        let m: Match = serde_json::from_str(
            r#"{ "document": "Cargo.toml", "rule_id": "toml.truthy", "extra": 1 }"#,
        )
        .expect("parse");
        assert_eq!(m.document, DocumentId::from("Cargo.toml"));
        assert_eq!(m.severity, Severity::Info);
        assert!(m.location.is_unspecified());
        assert!(m.fix.is_none());
    }

    #[test]
    fn fix_payload_is_tagged() {
        let fix: FixPayload =
            serde_json::from_str(r#"{ "type": "rename", "to": "default-features" }"#)
                .expect("parse");
        assert_eq!(
            fix,
            FixPayload::Rename {
                to: "default-features".to_string()
            }
        );

        let restyle = serde_json::to_value(FixPayload::Restyle {
            style: StringStyle::Literal,
        })
        .expect("serialize");
        assert_eq!(
            restyle,
            serde_json::json!({ "type": "restyle", "style": "literal" })
        );
    }

    #[test]
    fn location_omits_empty_fields() {
        let loc = Location::at_path(TomlPath::from(vec![
            PathSegment::key("workspace"),
            PathSegment::key("members"),
            PathSegment::Index(0),
        ]));
        let v = serde_json::to_value(&loc).expect("serialize");
        assert_eq!(
            v,
            serde_json::json!({ "toml_path": ["workspace", "members", 0] })
        );
    }

    #[test]
    fn document_id_normalizes_current_dir_segments() {
        assert_eq!(DocumentId::from("./a.toml").normalized(), DocumentId::from("a.toml"));
        assert_eq!(
            DocumentId::from("crates//./x/Cargo.toml").normalized(),
            DocumentId::from("crates/x/Cargo.toml")
        );
        assert_eq!(
            DocumentId::from("../a.toml").normalized(),
            DocumentId::from("../a.toml")
        );
        assert_eq!(DocumentId::from(".").normalized(), DocumentId::from("."));
    }
}
