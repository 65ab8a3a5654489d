use crate::matches::{DocumentId, ToolInfo};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one transform pass over a match ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformReport {
    pub schema: String,
    pub tool: ToolInfo,

    #[serde(default)]
    pub run: RunInfo,

    /// True when no document was written.
    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub results: Vec<TransformResult>,

    pub summary: TransformSummary,
}

impl TransformReport {
    pub fn new(tool: ToolInfo, dry_run: bool) -> Self {
        Self {
            schema: crate::schema::TOMLFIX_REPORT_V1.to_string(),
            tool,
            run: RunInfo::default(),
            dry_run,
            results: vec![],
            summary: TransformSummary::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Serialized text equals the original; storage untouched.
    Unchanged,
    /// Serialized text differs from the original.
    Changed,
    /// The document could not be read, parsed or written.
    Failed,
    /// The batch was cancelled before this document was started.
    Cancelled,
}

/// Per-document outcome of a transform pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformResult {
    pub document: DocumentId,
    pub status: DocumentStatus,

    /// True when new content reached storage.
    #[serde(default)]
    pub written: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_before: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_after: Option<String>,

    /// Ledger indices of the matches that were fixed.
    #[serde(default)]
    pub fixed: Vec<usize>,

    #[serde(default)]
    pub outcomes: Vec<MatchOutcome>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<DocumentError>,
}

impl TransformResult {
    pub fn new(document: DocumentId, status: DocumentStatus) -> Self {
        Self {
            document,
            status,
            written: false,
            sha256_before: None,
            sha256_after: None,
            fixed: vec![],
            outcomes: vec![],
            error: None,
        }
    }

    pub fn is_changed(&self) -> bool {
        self.status == DocumentStatus::Changed
    }

    pub fn is_failed(&self) -> bool {
        self.status == DocumentStatus::Failed
    }
}

/// What happened to one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Index into the ledger the pass was run against.
    pub index: usize,
    pub rule_id: String,

    #[serde(flatten)]
    pub status: FixStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FixStatus {
    Fixed,
    /// No strategy is registered for the rule.
    NoStrategy,
    /// The rule is excluded by the allow/deny policy.
    Denied,
    /// The targeted node does not exist (any more).
    LocationNotFound,
    NotApplicable { reason: String },
    /// The strategy failed unexpectedly; its edits were rolled back.
    Fault { message: String },
    /// The match was never attempted (document failed or pass cancelled).
    Skipped { reason: String },
}

impl FixStatus {
    pub fn is_fixed(&self) -> bool {
        matches!(self, FixStatus::Fixed)
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, FixStatus::Fault { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentError {
    pub kind: DocumentErrorKind,
    pub message: String,
}

impl DocumentError {
    pub fn new(kind: DocumentErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentErrorKind {
    Read,
    Parse,
    Write,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformSummary {
    pub documents_total: u64,
    pub documents_changed: u64,
    pub documents_failed: u64,
    pub documents_cancelled: u64,
    pub matches_total: u64,
    pub matches_fixed: u64,
    pub matches_unfixed: u64,
}

impl TransformSummary {
    pub fn from_results(results: &[TransformResult], matches_total: usize) -> Self {
        let mut summary = TransformSummary {
            documents_total: results.len() as u64,
            matches_total: matches_total as u64,
            ..Self::default()
        };
        for r in results {
            match r.status {
                DocumentStatus::Changed => summary.documents_changed += 1,
                DocumentStatus::Failed => summary.documents_failed += 1,
                DocumentStatus::Cancelled => summary.documents_cancelled += 1,
                DocumentStatus::Unchanged => {}
            }
            summary.matches_fixed += r.fixed.len() as u64;
        }
        summary.matches_unfixed = summary.matches_total.saturating_sub(summary.matches_fixed);
        summary
    }
}
