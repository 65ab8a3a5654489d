use crate::strategy::{FixerMeta, FixerStrategy, StrategyOutcome};
use tomlfix_doc::{Document, NodeKind, NodeRef};
use tomlfix_types::{FixPayload, Match, StringStyle};

pub struct StringStyleFixer;

impl StringStyleFixer {
    pub const RULE_ID: &'static str = "toml.string-style";
    const DESCRIPTION: &'static str = "Re-quotes a single-line string with the preferred quote style. \
         Only the quotes change; spacing and trailing comments stay as written.";

    fn target_style(m: &Match) -> StringStyle {
        match &m.fix {
            Some(FixPayload::Restyle { style }) => *style,
            _ => StringStyle::Basic,
        }
    }
}

impl FixerStrategy for StringStyleFixer {
    fn meta(&self) -> FixerMeta {
        FixerMeta::new(Self::RULE_ID, "Normalize string quoting", Self::DESCRIPTION)
            .with_payloads(&["restyle"])
    }

    fn fix(
        &self,
        doc: &mut Document,
        node: &NodeRef,
        m: &Match,
    ) -> anyhow::Result<StrategyOutcome> {
        if doc.kind(node) != Some(NodeKind::String) {
            return Ok(StrategyOutcome::not_applicable("not a string"));
        }
        let target = Self::target_style(m);
        if doc.string_style(node) == Some(target) {
            return Ok(StrategyOutcome::not_applicable("already in the target style"));
        }
        Ok(StrategyOutcome::from_edit(doc.restyle_string(node, target)))
    }
}
