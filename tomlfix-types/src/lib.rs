//! Shared DTOs (schemas-as-code) for the tomlfix workspace.
//!
//! # Design constraints
//! - Match ledgers are produced by external rule engines; be tolerant when reading them.
//! - Transform reports are serialized to disk for reporting layers.
//! - Prefer adding optional fields over changing semantics.

pub mod matches;
pub mod path;
pub mod transform;

pub use matches::{
    DocumentId, FixPayload, Location, Match, MatchLedger, Severity, StringStyle, ToolInfo,
};
pub use path::{PathSegment, TomlPath};
pub use transform::{
    DocumentError, DocumentErrorKind, DocumentStatus, FixStatus, MatchOutcome, RunInfo,
    TransformReport, TransformResult, TransformSummary,
};

/// Schema identifiers.
pub mod schema {
    pub const TOMLFIX_MATCHES_V1: &str = "tomlfix.matches.v1";
    pub const TOMLFIX_REPORT_V1: &str = "tomlfix.report.v1";
}
