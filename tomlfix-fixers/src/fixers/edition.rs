use crate::strategy::{FixerMeta, FixerStrategy, StrategyOutcome};
use anyhow::Context;
use tomlfix_doc::{Document, NodeKind, NodeRef, json_to_value};
use tomlfix_types::{FixPayload, Match, TomlPath};

pub struct EditionFixer;

impl EditionFixer {
    pub const RULE_ID: &'static str = "cargo.edition";
    const DESCRIPTION: &'static str = "Sets `package.edition` to the edition carried by the match's \
         set payload. Manifests that inherit the edition from the workspace are left alone.";
}

impl FixerStrategy for EditionFixer {
    fn meta(&self) -> FixerMeta {
        FixerMeta::new(Self::RULE_ID, "Set the package edition", Self::DESCRIPTION)
            .with_payloads(&["set"])
    }

    fn fix(
        &self,
        doc: &mut Document,
        _node: &NodeRef,
        m: &Match,
    ) -> anyhow::Result<StrategyOutcome> {
        let Some(FixPayload::Set { value }) = &m.fix else {
            return Ok(StrategyOutcome::not_applicable(
                "requires a set payload naming the edition",
            ));
        };
        let desired = json_to_value(value)
            .with_context(|| format!("edition payload {value} has no TOML form"))?;

        let Some(package) = doc.locate_path(&TomlPath::from_keys(["package"])) else {
            return Ok(StrategyOutcome::not_applicable("no [package] table"));
        };
        let edition = package.child("edition");
        match doc.kind(&edition) {
            None => Ok(StrategyOutcome::from_edit(
                doc.insert_child(&package, "edition", desired),
            )),
            Some(NodeKind::String) => {
                let current = doc.value(&edition).and_then(|v| v.as_str());
                if current == desired.as_str() {
                    return Ok(StrategyOutcome::not_applicable("edition already set"));
                }
                Ok(StrategyOutcome::from_edit(
                    doc.replace_scalar(&edition, desired),
                ))
            }
            Some(_) => Ok(StrategyOutcome::not_applicable(
                "edition is inherited or not a string",
            )),
        }
    }
}
