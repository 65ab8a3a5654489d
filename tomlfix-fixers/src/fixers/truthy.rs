use crate::strategy::{FixerMeta, FixerStrategy, StrategyOutcome};
use tomlfix_doc::toml_edit::Value;
use tomlfix_doc::{Document, NodeRef};
use tomlfix_types::Match;

pub struct TruthyFixer;

impl TruthyFixer {
    pub const RULE_ID: &'static str = "toml.truthy";
    const DESCRIPTION: &'static str =
        "Replaces boolean-looking strings (\"yes\", \"no\", \"on\", \"off\", \"true\", \"false\") with TOML booleans.";

    fn parse_truthy(s: &str) -> Option<bool> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "on" | "true" => Some(true),
            "no" | "off" | "false" => Some(false),
            _ => None,
        }
    }
}

impl FixerStrategy for TruthyFixer {
    fn meta(&self) -> FixerMeta {
        FixerMeta::new(Self::RULE_ID, "Use real booleans", Self::DESCRIPTION)
    }

    fn fix(
        &self,
        doc: &mut Document,
        node: &NodeRef,
        _m: &Match,
    ) -> anyhow::Result<StrategyOutcome> {
        let Some(text) = doc.value(node).and_then(|v| v.as_str()) else {
            return Ok(StrategyOutcome::not_applicable("not a string"));
        };
        let Some(flag) = Self::parse_truthy(text) else {
            return Ok(StrategyOutcome::not_applicable(format!(
                "{text:?} is not a boolean word"
            )));
        };
        Ok(StrategyOutcome::from_edit(
            doc.replace_scalar(node, Value::from(flag)),
        ))
    }
}
