use diffy::PatchFormatter;
use tomlfix_types::DocumentId;

/// Render a git-style unified diff for one document. Empty when nothing changed.
pub fn render_patch(document: &DocumentId, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("diff --git a/{0} b/{0}\n", document));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", document));

    let patch = diffy::create_patch(before, after);
    let formatter = PatchFormatter::new();
    out.push_str(&formatter.fmt_patch(&patch).to_string());
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
