use crate::strategy::{FixerMeta, FixerStrategy, StrategyOutcome};
use anyhow::Context;
use tomlfix_doc::toml_edit::Value;
use tomlfix_doc::{Document, NodeKind, NodeRef, json_to_value};
use tomlfix_types::{FixPayload, Match, TomlPath};

pub struct WorkspaceResolverFixer;

impl WorkspaceResolverFixer {
    pub const RULE_ID: &'static str = "cargo.workspace-resolver";
    const DESCRIPTION: &'static str = "Ensures `[workspace].resolver` is set (default \"2\"), \
         replacing an older value or adding the key to an existing [workspace] table.";
    const DEFAULT_RESOLVER: &'static str = "2";

    fn desired(m: &Match) -> anyhow::Result<Value> {
        match &m.fix {
            Some(FixPayload::Set { value }) => json_to_value(value)
                .with_context(|| format!("resolver payload {value} has no TOML form")),
            _ => Ok(Value::from(Self::DEFAULT_RESOLVER)),
        }
    }
}

impl FixerStrategy for WorkspaceResolverFixer {
    fn meta(&self) -> FixerMeta {
        FixerMeta::new(Self::RULE_ID, "Set the workspace resolver", Self::DESCRIPTION)
            .with_payloads(&["set"])
    }

    fn fix(
        &self,
        doc: &mut Document,
        _node: &NodeRef,
        m: &Match,
    ) -> anyhow::Result<StrategyOutcome> {
        let desired = Self::desired(m)?;

        let Some(workspace) = doc.locate_path(&TomlPath::from_keys(["workspace"])) else {
            return Ok(StrategyOutcome::not_applicable("no [workspace] table"));
        };
        if doc.kind(&workspace) != Some(NodeKind::Table) {
            return Ok(StrategyOutcome::not_applicable("`workspace` is not a table"));
        }

        let resolver = workspace.child("resolver");
        let already = doc.value(&resolver).map(|current| same_value(current, &desired));
        match already {
            Some(true) => Ok(StrategyOutcome::not_applicable("resolver already set")),
            Some(false) => Ok(StrategyOutcome::from_edit(
                doc.replace_scalar(&resolver, desired),
            )),
            None => Ok(StrategyOutcome::from_edit(
                doc.insert_child(&workspace, "resolver", desired),
            )),
        }
    }
}

/// Compare values ignoring decor and quoting style.
fn same_value(a: &Value, b: &Value) -> bool {
    if let (Some(a), Some(b)) = (a.as_str(), b.as_str()) {
        return a == b;
    }
    let bare = |v: &Value| {
        let mut v = v.clone();
        v.decor_mut().clear();
        v.to_string()
    };
    bare(a) == bare(b)
}
