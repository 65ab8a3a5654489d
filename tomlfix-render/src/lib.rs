//! Rendering helpers (markdown, one-liners) for human-readable artifacts.

use tomlfix_types::{
    DocumentErrorKind, DocumentStatus, FixStatus, TransformReport, TransformSummary,
};

/// "N documents modified, M matches fixed, K left unfixed, E errored".
pub fn render_summary_line(summary: &TransformSummary) -> String {
    format!(
        "{} documents modified, {} matches fixed, {} left unfixed, {} errored",
        summary.documents_changed,
        summary.matches_fixed,
        summary.matches_unfixed,
        summary.documents_failed
    )
}

pub fn render_report_md(report: &TransformReport) -> String {
    let mut out = String::new();
    out.push_str("# tomlfix report\n\n");
    if report.dry_run {
        out.push_str("_Dry run: nothing was written._\n\n");
    }
    let s = &report.summary;
    out.push_str(&format!(
        "- Documents: {} (changed {}, failed {}, cancelled {})\n",
        s.documents_total, s.documents_changed, s.documents_failed, s.documents_cancelled
    ));
    out.push_str(&format!(
        "- Matches: {} (fixed {}, unfixed {})\n\n",
        s.matches_total, s.matches_fixed, s.matches_unfixed
    ));

    out.push_str("## Documents\n\n");
    if report.results.is_empty() {
        out.push_str("_No documents referenced._\n");
        return out;
    }

    for r in &report.results {
        out.push_str(&format!(
            "### `{}` ({})\n\n",
            r.document,
            status_label(r.status)
        ));
        if r.written {
            out.push_str("- Written: `true`\n");
        }
        if let Some(err) = &r.error {
            out.push_str(&format!(
                "- Error ({}): {}\n",
                error_kind_label(err.kind),
                err.message
            ));
        }
        for o in &r.outcomes {
            out.push_str(&format!(
                "- #{} `{}`: {}\n",
                o.index,
                o.rule_id,
                fix_status_label(&o.status)
            ));
        }
        out.push('\n');
    }

    out
}

fn status_label(status: DocumentStatus) -> &'static str {
    match status {
        DocumentStatus::Unchanged => "unchanged",
        DocumentStatus::Changed => "changed",
        DocumentStatus::Failed => "failed",
        DocumentStatus::Cancelled => "cancelled",
    }
}

fn error_kind_label(kind: DocumentErrorKind) -> &'static str {
    match kind {
        DocumentErrorKind::Read => "read",
        DocumentErrorKind::Parse => "parse",
        DocumentErrorKind::Write => "write",
    }
}

fn fix_status_label(status: &FixStatus) -> String {
    match status {
        FixStatus::Fixed => "fixed".to_string(),
        FixStatus::NoStrategy => "no strategy registered".to_string(),
        FixStatus::Denied => "denied by policy".to_string(),
        FixStatus::LocationNotFound => "location not found".to_string(),
        FixStatus::NotApplicable { reason } => format!("not applicable ({reason})"),
        FixStatus::Fault { message } => format!("**fault**: {message}"),
        FixStatus::Skipped { reason } => format!("skipped ({reason})"),
    }
}
