use crate::fixers::BuiltinFixer;
use crate::strategy::{FixerMeta, FixerStrategy, StrategyOutcome};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tomlfix_doc::{Document, NodeRef};
use tomlfix_types::Match;
use tracing::debug;

/// A registered strategy: one of the builtins, or a caller-supplied implementation.
#[derive(Clone)]
pub enum Strategy {
    Builtin(BuiltinFixer),
    External(Arc<dyn FixerStrategy>),
}

impl Strategy {
    pub fn external(strategy: impl FixerStrategy + 'static) -> Self {
        Strategy::External(Arc::new(strategy))
    }

    pub fn meta(&self) -> FixerMeta {
        match self {
            Strategy::Builtin(b) => b.meta(),
            Strategy::External(s) => s.meta(),
        }
    }

    pub fn fix(
        &self,
        doc: &mut Document,
        node: &NodeRef,
        m: &Match,
    ) -> anyhow::Result<StrategyOutcome> {
        match self {
            Strategy::Builtin(b) => b.fix(doc, node, m),
            Strategy::External(s) => s.fix(doc, node, m),
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Builtin(b) => f.debug_tuple("Builtin").field(b).finish(),
            Strategy::External(s) => f.debug_tuple("External").field(&s.meta().rule_id).finish(),
        }
    }
}

/// Rule id -> strategy.
///
/// Built once before a transform pass and only read during it.
#[derive(Debug, Clone, Default)]
pub struct FixerRegistry {
    strategies: BTreeMap<String, Strategy>,
}

impl FixerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every builtin strategy under its own rule id.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for b in BuiltinFixer::ALL {
            registry.register(b.rule_id(), Strategy::Builtin(*b));
        }
        registry
    }

    /// Register `strategy` for `rule_id`. The last registration wins; the replaced strategy
    /// is returned.
    pub fn register(&mut self, rule_id: impl Into<String>, strategy: Strategy) -> Option<Strategy> {
        let rule_id = rule_id.into();
        let replaced = self.strategies.insert(rule_id.clone(), strategy);
        if replaced.is_some() {
            debug!(rule = %rule_id, "strategy replaced");
        }
        replaced
    }

    /// Register an external strategy under the rule id its metadata names.
    pub fn register_external(&mut self, strategy: impl FixerStrategy + 'static) -> Option<Strategy> {
        let rule_id = strategy.meta().rule_id;
        self.register(rule_id, Strategy::external(strategy))
    }

    pub fn lookup(&self, rule_id: &str) -> Option<&Strategy> {
        self.strategies.get(rule_id)
    }

    pub fn contains(&self, rule_id: &str) -> bool {
        self.strategies.contains_key(rule_id)
    }

    /// Registered rule ids, sorted.
    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }

    /// Metadata for every registered strategy, sorted by rule id.
    ///
    /// A strategy registered under an alias reports the alias as its rule id.
    pub fn metas(&self) -> Vec<FixerMeta> {
        self.strategies
            .iter()
            .map(|(rule_id, s)| {
                let mut meta = s.meta();
                meta.rule_id = rule_id.clone();
                meta
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
