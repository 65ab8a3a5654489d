//! Rule lookup and rendering for the `tomlfix explain` command.

use std::fmt::Write;
use tomlfix_fixers::{FixerMeta, FixerRegistry};

/// Look up a rule by id, case-insensitively.
///
/// Also accepts the part after the namespace (`string-style` for `toml.string-style`) and
/// underscores in place of hyphens.
pub fn lookup_rule(registry: &FixerRegistry, query: &str) -> Option<FixerMeta> {
    let wanted = normalize(query);
    registry.metas().into_iter().find(|meta| {
        let id = normalize(&meta.rule_id);
        id == wanted || id.rsplit_once('.').is_some_and(|(_, tail)| tail == wanted)
    })
}

fn normalize(s: &str) -> String {
    s.to_lowercase().replace('_', "-")
}

pub fn render_explanation(meta: &FixerMeta) -> String {
    let rule = "=".repeat(80);
    let thin = "-".repeat(80);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "RULE: {}", meta.title);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out);
    let _ = writeln!(out, "Rule ID:  {}", meta.rule_id);
    let payloads = if meta.payloads.is_empty() {
        "none".to_string()
    } else {
        meta.payloads.join(", ")
    };
    let _ = writeln!(out, "Payloads: {payloads}");
    let _ = writeln!(out);

    let _ = writeln!(out, "DESCRIPTION");
    let _ = writeln!(out, "{thin}");
    let _ = writeln!(out, "{}", meta.description);
    let _ = writeln!(out);

    let _ = writeln!(out, "APPLYING");
    let _ = writeln!(out, "{thin}");
    let _ = writeln!(
        out,
        "Matches for this rule are fixed by `tomlfix apply`. Without `--write` the run is a\n\
         dry run: the patch and report are produced, documents are left alone."
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_full_id() {
        let registry = FixerRegistry::builtin();
        let meta = lookup_rule(&registry, "toml.string-style").expect("builtin rule");
        assert_eq!(meta.rule_id, "toml.string-style");
    }

    #[test]
    fn test_lookup_by_suffix_and_underscores() {
        let registry = FixerRegistry::builtin();
        let meta = lookup_rule(&registry, "KEY_CASE").expect("suffix lookup");
        assert_eq!(meta.rule_id, "toml.key-case");
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup_rule(&FixerRegistry::builtin(), "no-such-rule").is_none());
    }

    #[test]
    fn test_render_lists_payloads() {
        let registry = FixerRegistry::builtin();
        let meta = lookup_rule(&registry, "toml.string-style").unwrap();
        let text = render_explanation(&meta);
        assert!(text.contains("Rule ID:  toml.string-style"));
        assert!(text.contains("Payloads: restyle"));
        assert!(text.contains("DESCRIPTION"));
    }
}
