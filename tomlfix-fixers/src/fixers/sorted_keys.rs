use crate::strategy::{FixerMeta, FixerStrategy, StrategyOutcome};
use tomlfix_doc::{Document, NodeKind, NodeRef};
use tomlfix_types::Match;

pub struct SortedKeysFixer;

impl SortedKeysFixer {
    pub const RULE_ID: &'static str = "toml.sorted-keys";
    const DESCRIPTION: &'static str = "Sorts the key/value entries of a table alphabetically. \
         Comments move with the entry they precede; sub-tables keep their place.";

    /// The table to sort: the node itself, or the table that holds it.
    fn table_for(doc: &Document, node: &NodeRef) -> Option<NodeRef> {
        match doc.kind(node)? {
            NodeKind::Table | NodeKind::InlineTable => Some(node.clone()),
            _ => {
                let parent = node.parent()?;
                matches!(
                    doc.kind(&parent)?,
                    NodeKind::Table | NodeKind::InlineTable
                )
                .then_some(parent)
            }
        }
    }
}

impl FixerStrategy for SortedKeysFixer {
    fn meta(&self) -> FixerMeta {
        FixerMeta::new(Self::RULE_ID, "Sort table keys", Self::DESCRIPTION)
    }

    fn fix(
        &self,
        doc: &mut Document,
        node: &NodeRef,
        _m: &Match,
    ) -> anyhow::Result<StrategyOutcome> {
        let Some(table) = Self::table_for(doc, node) else {
            return Ok(StrategyOutcome::not_applicable("no table to sort"));
        };
        let revision = doc.revision();
        doc.sort_keys(&table)?;
        if doc.revision() == revision {
            return Ok(StrategyOutcome::not_applicable("keys already sorted"));
        }
        Ok(StrategyOutcome::Applied)
    }
}
