//! Fixer strategies for tomlfix.
//!
//! This crate owns *how a single match is fixed*: a registry from rule id to strategy, and the
//! builtin strategies. It does not decide which matches run or in what order; that's
//! `tomlfix-core`.

mod fixers;
mod registry;
mod strategy;

pub use fixers::{
    BuiltinFixer, DeprecatedKeyFixer, KeyCaseFixer, SortedKeysFixer, StringStyleFixer,
    TruthyFixer, kebab_case,
};
#[cfg(feature = "cargo-fixers")]
pub use fixers::{EditionFixer, WorkspaceResolverFixer};
pub use registry::{FixerRegistry, Strategy};
pub use strategy::{FixerMeta, FixerStrategy, StrategyOutcome};
