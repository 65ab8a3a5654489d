//! Builtin strategies, one module per rule family.

mod deprecated_key;
#[cfg(feature = "cargo-fixers")]
mod edition;
mod key_case;
mod sorted_keys;
mod string_style;
mod truthy;
#[cfg(feature = "cargo-fixers")]
mod workspace_resolver;

pub use deprecated_key::DeprecatedKeyFixer;
#[cfg(feature = "cargo-fixers")]
pub use edition::EditionFixer;
pub use key_case::{KeyCaseFixer, kebab_case};
pub use sorted_keys::SortedKeysFixer;
pub use string_style::StringStyleFixer;
pub use truthy::TruthyFixer;
#[cfg(feature = "cargo-fixers")]
pub use workspace_resolver::WorkspaceResolverFixer;

use crate::strategy::{FixerMeta, FixerStrategy, StrategyOutcome};
use tomlfix_doc::{Document, NodeRef};
use tomlfix_types::Match;

/// Tag for each builtin strategy. Dispatch is a plain `match`, no allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFixer {
    StringStyle,
    Truthy,
    KeyCase,
    SortedKeys,
    DeprecatedKey,
    #[cfg(feature = "cargo-fixers")]
    WorkspaceResolver,
    #[cfg(feature = "cargo-fixers")]
    Edition,
}

impl BuiltinFixer {
    pub const ALL: &'static [BuiltinFixer] = &[
        BuiltinFixer::StringStyle,
        BuiltinFixer::Truthy,
        BuiltinFixer::KeyCase,
        BuiltinFixer::SortedKeys,
        BuiltinFixer::DeprecatedKey,
        #[cfg(feature = "cargo-fixers")]
        BuiltinFixer::WorkspaceResolver,
        #[cfg(feature = "cargo-fixers")]
        BuiltinFixer::Edition,
    ];

    pub fn rule_id(self) -> &'static str {
        match self {
            BuiltinFixer::StringStyle => StringStyleFixer::RULE_ID,
            BuiltinFixer::Truthy => TruthyFixer::RULE_ID,
            BuiltinFixer::KeyCase => KeyCaseFixer::RULE_ID,
            BuiltinFixer::SortedKeys => SortedKeysFixer::RULE_ID,
            BuiltinFixer::DeprecatedKey => DeprecatedKeyFixer::RULE_ID,
            #[cfg(feature = "cargo-fixers")]
            BuiltinFixer::WorkspaceResolver => WorkspaceResolverFixer::RULE_ID,
            #[cfg(feature = "cargo-fixers")]
            BuiltinFixer::Edition => EditionFixer::RULE_ID,
        }
    }

    fn strategy(self) -> &'static dyn FixerStrategy {
        match self {
            BuiltinFixer::StringStyle => &StringStyleFixer,
            BuiltinFixer::Truthy => &TruthyFixer,
            BuiltinFixer::KeyCase => &KeyCaseFixer,
            BuiltinFixer::SortedKeys => &SortedKeysFixer,
            BuiltinFixer::DeprecatedKey => &DeprecatedKeyFixer,
            #[cfg(feature = "cargo-fixers")]
            BuiltinFixer::WorkspaceResolver => &WorkspaceResolverFixer,
            #[cfg(feature = "cargo-fixers")]
            BuiltinFixer::Edition => &EditionFixer,
        }
    }

    pub fn meta(self) -> FixerMeta {
        self.strategy().meta()
    }

    pub fn fix(
        self,
        doc: &mut Document,
        node: &NodeRef,
        m: &Match,
    ) -> anyhow::Result<StrategyOutcome> {
        self.strategy().fix(doc, node, m)
    }
}
