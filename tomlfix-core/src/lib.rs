//! Embeddable core library for tomlfix.
//!
//! Provides a clap-free, I/O-abstracted transform pass suitable for linking into other tools.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`DocumentStore`](ports::DocumentStore): read and atomically replace documents
//! - [`LedgerSource`](ports::LedgerSource): load match ledgers
//! - [`WritePort`](ports::WritePort): write run artifacts
//!
//! The [`adapters`] module provides default filesystem-backed and in-memory implementations.
//!
//! # Entry points
//!
//! - [`Transformer::run`]: apply every fixable match and write back changed documents
//! - [`write_artifacts`]: persist the report and patch of a run

pub mod adapters;
mod artifacts;
mod coordinator;
mod error;
mod hash;
pub mod ports;
pub mod settings;
mod write_back;

pub use artifacts::write_artifacts;
pub use coordinator::{TransformOutcome, Transformer};
pub use error::{TransformError, WriteError};
pub use settings::{CancelToken, TransformSettings};
pub use write_back::{CommitOutcome, WriteBackGuard};

// Re-export ledger types so embedders don't need tomlfix-ledger directly.
pub use tomlfix_ledger::{LedgerLoadError, LoadedLedger, collect_matches};
