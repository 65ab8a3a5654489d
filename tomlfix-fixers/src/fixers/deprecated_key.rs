use crate::strategy::{FixerMeta, FixerStrategy, StrategyOutcome};
use tomlfix_doc::{Document, NodeRef};
use tomlfix_types::{FixPayload, Match};

pub struct DeprecatedKeyFixer;

impl DeprecatedKeyFixer {
    pub const RULE_ID: &'static str = "toml.deprecated-key";
    const DESCRIPTION: &'static str = "Removes a deprecated key, or renames it to its replacement \
         when the match carries a rename payload.";
}

impl FixerStrategy for DeprecatedKeyFixer {
    fn meta(&self) -> FixerMeta {
        FixerMeta::new(Self::RULE_ID, "Drop or rename deprecated keys", Self::DESCRIPTION)
            .with_payloads(&["remove", "rename"])
    }

    fn fix(
        &self,
        doc: &mut Document,
        node: &NodeRef,
        m: &Match,
    ) -> anyhow::Result<StrategyOutcome> {
        if node.is_root() {
            return Ok(StrategyOutcome::not_applicable("match does not address a key"));
        }
        let edit = match &m.fix {
            Some(FixPayload::Rename { to }) => doc.rename_key(node, to),
            None | Some(FixPayload::Remove) => doc.remove_child(node),
            Some(other) => {
                return Ok(StrategyOutcome::not_applicable(format!(
                    "unsupported payload: {}",
                    other.kind()
                )));
            }
        };
        Ok(StrategyOutcome::from_edit(edit))
    }
}
