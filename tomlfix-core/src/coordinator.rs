//! The transform pass: matches in, rewritten documents out.
//!
//! Matches are grouped by document. Each document is owned by one worker for the whole pass,
//! loaded at most once, edited by its matches in a fixed order, and handed to the
//! [`WriteBackGuard`]. A strategy that errors or panics is rolled back and reported; it never
//! takes the rest of the batch down with it.

use crate::error::TransformError;
use crate::hash::sha256_hex;
use crate::ports::DocumentStore;
use crate::settings::{CancelToken, TransformSettings};
use crate::write_back::{CommitOutcome, WriteBackGuard};
use chrono::Utc;
use rayon::prelude::*;
use std::any::Any;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tomlfix_doc::{Document, render_patch};
use tomlfix_fixers::{FixerRegistry, StrategyOutcome};
use tomlfix_types::{
    DocumentError, DocumentErrorKind, DocumentId, DocumentStatus, FixStatus, Match, MatchOutcome,
    ToolInfo, TomlPath, TransformReport, TransformResult, TransformSummary,
};
use tracing::{debug, info, warn};

/// Result of [`Transformer::run`].
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    pub report: TransformReport,
    /// Unified diff of every changed document, in document order.
    pub patch: String,
}

impl TransformOutcome {
    /// True when any document failed to read, parse or write.
    pub fn has_failures(&self) -> bool {
        self.report.summary.documents_failed > 0
    }
}

/// Coordinates one transform pass over a set of matches.
pub struct Transformer<'a> {
    registry: &'a FixerRegistry,
    store: &'a dyn DocumentStore,
    settings: TransformSettings,
    cancel: CancelToken,
    tool: ToolInfo,
}

impl<'a> Transformer<'a> {
    pub fn new(
        registry: &'a FixerRegistry,
        store: &'a dyn DocumentStore,
        settings: TransformSettings,
    ) -> Self {
        Self {
            registry,
            store,
            settings,
            cancel: CancelToken::new(),
            tool: ToolInfo {
                name: "tomlfix".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
                repo: None,
                commit: None,
            },
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_tool(mut self, tool: ToolInfo) -> Self {
        self.tool = tool;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Run the pass. `matches` is only read; the ledger is identical afterwards.
    pub fn run(&self, matches: &[Match]) -> Result<TransformOutcome, TransformError> {
        self.store
            .check_access()
            .map_err(TransformError::StorageUnavailable)?;

        let mut report = TransformReport::new(self.tool.clone(), self.settings.dry_run);
        report.run.started_at = Some(Utc::now());

        let groups = partition(matches);
        debug!(
            documents = groups.len(),
            matches = matches.len(),
            jobs = self.settings.jobs,
            "starting transform pass"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.settings.jobs)
            .build()
            .map_err(|e| TransformError::WorkerPool(e.to_string()))?;

        let runs: Vec<DocumentRun> = pool.install(|| {
            groups
                .par_iter()
                .map(|group| self.process(group, matches))
                .collect()
        });

        let mut patch = String::new();
        for run in runs {
            patch.push_str(&run.patch);
            report.results.push(run.result);
        }

        report.summary = TransformSummary::from_results(&report.results, matches.len());
        report.run.ended_at = Some(Utc::now());
        info!(
            changed = report.summary.documents_changed,
            fixed = report.summary.matches_fixed,
            failed = report.summary.documents_failed,
            "transform pass finished"
        );
        Ok(TransformOutcome { report, patch })
    }

    fn process(&self, group: &DocumentGroup, matches: &[Match]) -> DocumentRun {
        let id = &group.document;

        if self.cancel.is_cancelled() {
            debug!(document = %id, "cancelled before start");
            let mut result = TransformResult::new(id.clone(), DocumentStatus::Cancelled);
            result.outcomes = group
                .indices
                .iter()
                .map(|&i| outcome(i, &matches[i], skipped("cancelled")))
                .collect();
            return DocumentRun::untouched(result);
        }

        // Policy and registry decide eligibility before any I/O.
        let mut statuses: HashMap<usize, FixStatus> = HashMap::new();
        let mut candidates = Vec::new();
        for &i in &group.indices {
            let m = &matches[i];
            if !self.settings.permits(&m.rule_id) {
                statuses.insert(i, FixStatus::Denied);
            } else if !self.registry.contains(&m.rule_id) {
                statuses.insert(i, FixStatus::NoStrategy);
            } else {
                candidates.push(i);
            }
        }

        let mut result = TransformResult::new(id.clone(), DocumentStatus::Unchanged);
        if candidates.is_empty() {
            debug!(document = %id, "no fixable matches; not loaded");
            result.outcomes = collect_outcomes(group, matches, statuses);
            return DocumentRun::untouched(result);
        }

        let raw = match self.store.read_to_string(id) {
            Ok(raw) => raw,
            Err(e) => {
                let message = format!("{e:#}");
                warn!(document = %id, error = %message, "read failed");
                return self.failed(
                    result,
                    group,
                    matches,
                    statuses,
                    &candidates,
                    DocumentError::new(DocumentErrorKind::Read, message),
                );
            }
        };
        result.sha256_before = Some(sha256_hex(raw.as_bytes()));

        let mut doc = match Document::load(id.clone(), raw) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(document = %id, error = %e, "parse failed");
                return self.failed(
                    result,
                    group,
                    matches,
                    statuses,
                    &candidates,
                    DocumentError::new(DocumentErrorKind::Parse, e.to_string()),
                );
            }
        };

        for (i, path) in fix_order(&doc, matches, &candidates) {
            let status = self.apply_one(&mut doc, &matches[i], path);
            statuses.insert(i, status);
        }

        let after = doc.serialize();
        if after == doc.original() {
            // Edits that cancelled out, or restored the original bytes.
            for status in statuses.values_mut() {
                if status.is_fixed() {
                    *status = FixStatus::NotApplicable {
                        reason: "edit left the document unchanged".to_string(),
                    };
                }
            }
            result.sha256_after = result.sha256_before.clone();
            result.outcomes = collect_outcomes(group, matches, statuses);
            return DocumentRun::untouched(result);
        }

        result.sha256_after = Some(sha256_hex(after.as_bytes()));
        result.outcomes = collect_outcomes(group, matches, statuses);

        let guard = WriteBackGuard::new(self.store, self.settings.dry_run);
        match guard.commit(&doc) {
            Ok(commit) => {
                result.status = DocumentStatus::Changed;
                result.written = commit == CommitOutcome::Written;
                result.fixed = result
                    .outcomes
                    .iter()
                    .filter(|o| o.status.is_fixed())
                    .map(|o| o.index)
                    .collect();
            }
            Err(e) => {
                warn!(document = %id, error = %e, "write failed");
                result.status = DocumentStatus::Failed;
                result.error = Some(DocumentError::new(
                    DocumentErrorKind::Write,
                    format!("{:#}", e.cause),
                ));
            }
        }

        DocumentRun {
            patch: render_patch(id, doc.original(), &after),
            result,
        }
    }

    fn apply_one(&self, doc: &mut Document, m: &Match, path: Option<TomlPath>) -> FixStatus {
        // Paths were resolved against the original text; earlier fixes may have renamed a key
        // on the way.
        let Some(node) = path.and_then(|p| doc.locate_path(&doc.follow(&p))) else {
            debug!(document = %m.document, rule = %m.rule_id, "location not found");
            return FixStatus::LocationNotFound;
        };
        let Some(strategy) = self.registry.lookup(&m.rule_id) else {
            return FixStatus::NoStrategy;
        };

        debug!(document = %m.document, rule = %m.rule_id, path = %node.path(), "dispatching");
        let checkpoint = doc.checkpoint();
        let attempt = catch_unwind(AssertUnwindSafe(|| strategy.fix(doc, &node, m)));

        let fault = match attempt {
            Ok(Ok(StrategyOutcome::Applied)) => return FixStatus::Fixed,
            Ok(Ok(StrategyOutcome::NotApplicable { reason })) => {
                debug!(document = %m.document, rule = %m.rule_id, %reason, "not applicable");
                return FixStatus::NotApplicable { reason };
            }
            Ok(Err(e)) => format!("{e:#}"),
            Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
        };

        doc.restore(checkpoint);
        warn!(
            document = %m.document,
            rule = %m.rule_id,
            error = %fault,
            "strategy fault; document rolled back"
        );
        FixStatus::Fault { message: fault }
    }

    fn failed(
        &self,
        mut result: TransformResult,
        group: &DocumentGroup,
        matches: &[Match],
        mut statuses: HashMap<usize, FixStatus>,
        candidates: &[usize],
        error: DocumentError,
    ) -> DocumentRun {
        let reason = match error.kind {
            DocumentErrorKind::Read => "document could not be read",
            DocumentErrorKind::Parse => "document could not be parsed",
            DocumentErrorKind::Write => "document could not be written",
        };
        for &i in candidates {
            statuses.insert(i, skipped(reason));
        }
        result.status = DocumentStatus::Failed;
        result.error = Some(error);
        result.outcomes = collect_outcomes(group, matches, statuses);
        DocumentRun::untouched(result)
    }
}

struct DocumentGroup {
    document: DocumentId,
    indices: Vec<usize>,
}

struct DocumentRun {
    result: TransformResult,
    patch: String,
}

impl DocumentRun {
    fn untouched(result: TransformResult) -> Self {
        Self {
            result,
            patch: String::new(),
        }
    }
}

/// Group ledger indices by normalized document id, keeping first-seen document order and ledger
/// order within each document. `./a.toml` and `a.toml` are one document with one owner.
fn partition(matches: &[Match]) -> Vec<DocumentGroup> {
    let mut groups: Vec<DocumentGroup> = Vec::new();
    let mut slot: HashMap<DocumentId, usize> = HashMap::new();
    for (i, m) in matches.iter().enumerate() {
        let document = m.document.normalized();
        let g = *slot.entry(document.clone()).or_insert_with(|| {
            groups.push(DocumentGroup {
                document,
                indices: Vec::new(),
            });
            groups.len() - 1
        });
        groups[g].indices.push(i);
    }
    groups
}

/// Resolve every candidate against the original text, then order them back to front.
///
/// Sort key: line descending, column descending, deeper path first, then ledger order.
/// Matches that do not resolve go last. Renames are followed at dispatch, so ledger order between
/// fixes on the same node does not change the result.
fn fix_order(
    doc: &Document,
    matches: &[Match],
    candidates: &[usize],
) -> Vec<(usize, Option<TomlPath>)> {
    let mut resolved: Vec<(usize, Option<TomlPath>, u64)> = candidates
        .iter()
        .map(|&i| {
            let location = &matches[i].location;
            let path = if location.is_unspecified() {
                Some(TomlPath::root())
            } else {
                doc.resolve(location)
            };
            let line = location
                .line
                .or_else(|| path.as_ref().and_then(|p| doc.line_of(p)))
                .unwrap_or(0);
            (i, path, line)
        })
        .collect();

    resolved.sort_by_key(|(i, path, line)| {
        let column = matches[*i].location.column.unwrap_or(0);
        (
            path.is_none(),
            Reverse(*line),
            Reverse(column),
            Reverse(path.as_ref().map_or(0, TomlPath::len)),
            *i,
        )
    });
    resolved.into_iter().map(|(i, path, _)| (i, path)).collect()
}

fn collect_outcomes(
    group: &DocumentGroup,
    matches: &[Match],
    mut statuses: HashMap<usize, FixStatus>,
) -> Vec<MatchOutcome> {
    group
        .indices
        .iter()
        .map(|&i| {
            let status = statuses
                .remove(&i)
                .unwrap_or_else(|| skipped("not attempted"));
            outcome(i, &matches[i], status)
        })
        .collect()
}

fn outcome(index: usize, m: &Match, status: FixStatus) -> MatchOutcome {
    MatchOutcome {
        index,
        rule_id: m.rule_id.clone(),
        status,
    }
}

fn skipped(reason: &str) -> FixStatus {
    FixStatus::Skipped {
        reason: reason.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
