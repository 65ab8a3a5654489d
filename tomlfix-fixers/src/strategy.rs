use serde::Serialize;
use tomlfix_doc::{Document, EditResult, NodeRef};
use tomlfix_types::Match;

/// Static description of a strategy, used by `list-fixers` and `explain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixerMeta {
    pub rule_id: String,
    pub title: String,
    pub description: String,
    /// Fix payload kinds the strategy honours, e.g. `["rename"]`.
    pub payloads: Vec<&'static str>,
}

impl FixerMeta {
    pub fn new(rule_id: &str, title: &str, description: &str) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            payloads: Vec::new(),
        }
    }

    pub fn with_payloads(mut self, payloads: &[&'static str]) -> Self {
        self.payloads = payloads.to_vec();
        self
    }
}

/// Result of a strategy invocation that did not fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Applied,
    NotApplicable { reason: String },
}

impl StrategyOutcome {
    pub fn not_applicable(reason: impl Into<String>) -> Self {
        StrategyOutcome::NotApplicable {
            reason: reason.into(),
        }
    }

    /// Map a primitive edit onto an outcome; a failed precondition means "not applicable".
    pub fn from_edit(result: EditResult<()>) -> Self {
        match result {
            Ok(()) => StrategyOutcome::Applied,
            Err(e) => StrategyOutcome::not_applicable(e.to_string()),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, StrategyOutcome::Applied)
    }
}

/// A fix for one rule.
///
/// Implementations are invoked once per match, in any order, and must tolerate the node having
/// been changed by earlier fixes. Returning `Err` (or panicking) is treated as a fault: the
/// coordinator rolls the document back to its state before the call.
pub trait FixerStrategy: Send + Sync {
    fn meta(&self) -> FixerMeta;

    fn fix(
        &self,
        doc: &mut Document,
        node: &NodeRef,
        m: &Match,
    ) -> anyhow::Result<StrategyOutcome>;
}
