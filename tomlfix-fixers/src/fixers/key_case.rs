use crate::strategy::{FixerMeta, FixerStrategy, StrategyOutcome};
use tomlfix_doc::{Document, NodeRef};
use tomlfix_types::{FixPayload, Match};

pub struct KeyCaseFixer;

impl KeyCaseFixer {
    pub const RULE_ID: &'static str = "toml.key-case";
    const DESCRIPTION: &'static str = "Renames snake_case or camelCase keys to kebab-case. \
         The entry keeps its position, value and comments.";
}

/// `default_features` -> `default-features`, `rustVersion` -> `rust-version`,
/// `HTTPServer` -> `http-server`.
pub fn kebab_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == ' ' {
            if !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with('-') {
                out.push('-');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

impl FixerStrategy for KeyCaseFixer {
    fn meta(&self) -> FixerMeta {
        FixerMeta::new(Self::RULE_ID, "Use kebab-case keys", Self::DESCRIPTION)
            .with_payloads(&["rename"])
    }

    fn fix(
        &self,
        doc: &mut Document,
        node: &NodeRef,
        m: &Match,
    ) -> anyhow::Result<StrategyOutcome> {
        let Some(key) = node.key() else {
            return Ok(StrategyOutcome::not_applicable("node is not addressed by a key"));
        };
        let target = match &m.fix {
            Some(FixPayload::Rename { to }) => to.clone(),
            _ => kebab_case(key),
        };
        if target == key {
            return Ok(StrategyOutcome::not_applicable("key already kebab-case"));
        }
        Ok(StrategyOutcome::from_edit(doc.rename_key(node, &target)))
    }
}
