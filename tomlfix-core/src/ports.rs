//! Port traits abstracting all I/O away from the coordinator.

use camino::Utf8Path;
use tomlfix_ledger::LoadedLedger;
use tomlfix_types::DocumentId;

/// Where documents live. Paths are always [`DocumentId`]s relative to the store root.
///
/// Shared across worker threads; implementations must be `Send + Sync`.
pub trait DocumentStore: Send + Sync {
    /// Fails when the store as a whole is unusable (e.g. its root is missing).
    fn check_access(&self) -> anyhow::Result<()>;

    fn read_to_string(&self, id: &DocumentId) -> anyhow::Result<String>;

    /// Replace the document's contents. Readers never observe a partial write.
    fn replace(&self, id: &DocumentId, contents: &str) -> anyhow::Result<()>;
}

/// Source of match ledgers.
pub trait LedgerSource {
    fn load_ledgers(&self) -> anyhow::Result<Vec<LoadedLedger>>;
}

/// File-system write operations for run artifacts (reports, patches).
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
