//! Default filesystem-backed and in-memory port implementations.

use crate::ports::{DocumentStore, LedgerSource, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tomlfix_ledger::LoadedLedger;
use tomlfix_types::DocumentId;
use tracing::debug;

/// Documents on disk, addressed relative to an explicit root.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: Utf8PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn path_of(&self, id: &DocumentId) -> Utf8PathBuf {
        self.root.join(id.as_path())
    }
}

impl DocumentStore for FsDocumentStore {
    fn check_access(&self) -> anyhow::Result<()> {
        let meta = fs::metadata(&self.root).with_context(|| format!("stat {}", self.root))?;
        anyhow::ensure!(meta.is_dir(), "{} is not a directory", self.root);
        Ok(())
    }

    fn read_to_string(&self, id: &DocumentId) -> anyhow::Result<String> {
        let path = self.path_of(id);
        fs::read_to_string(&path).with_context(|| format!("read {path}"))
    }

    /// Write to a temp file next to the target, then rename over it.
    fn replace(&self, id: &DocumentId, contents: &str) -> anyhow::Result<()> {
        let path = self.path_of(id);
        let parent = path
            .parent()
            .filter(|p| !p.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("create temp file in {parent}"))?;
        temp_file
            .write_all(contents.as_bytes())
            .context("write temp file")?;

        // Keep the original file's mode; the temp file is created 0600.
        if let Ok(meta) = fs::metadata(&path) {
            temp_file
                .as_file()
                .set_permissions(meta.permissions())
                .context("copy permissions to temp file")?;
        }
        temp_file.as_file().sync_all().context("sync temp file")?;

        temp_file
            .persist(&path)
            .with_context(|| format!("persist {path}"))?;
        debug!(path = %path, bytes = contents.len(), "replaced document");
        Ok(())
    }
}

/// Documents held in memory, for embedding and tests. Counts writes.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    docs: Mutex<BTreeMap<DocumentId, String>>,
    writes: AtomicUsize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents<I, K, V>(docs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<DocumentId>,
        V: Into<String>,
    {
        let store = Self::new();
        for (k, v) in docs {
            store.insert(k, v);
        }
        store
    }

    pub fn insert(&self, id: impl Into<DocumentId>, contents: impl Into<String>) {
        self.lock().insert(id.into(), contents.into());
    }

    pub fn get(&self, id: &DocumentId) -> Option<String> {
        self.lock().get(id).cloned()
    }

    /// Number of successful `replace` calls.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<DocumentId, String>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.docs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn check_access(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn read_to_string(&self, id: &DocumentId) -> anyhow::Result<String> {
        self.get(id)
            .ok_or_else(|| anyhow::anyhow!("no such document: {id}"))
    }

    fn replace(&self, id: &DocumentId, contents: &str) -> anyhow::Result<()> {
        self.lock().insert(id.clone(), contents.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Loads ledgers from `*/matches.json` under a directory, or from a single file.
#[derive(Debug, Clone)]
pub enum FsLedgerSource {
    Dir(Utf8PathBuf),
    File(Utf8PathBuf),
}

impl FsLedgerSource {
    /// A directory is scanned; anything else is read as one ledger.
    pub fn new(path: Utf8PathBuf) -> Self {
        if path.is_dir() {
            FsLedgerSource::Dir(path)
        } else {
            FsLedgerSource::File(path)
        }
    }
}

impl LedgerSource for FsLedgerSource {
    fn load_ledgers(&self) -> anyhow::Result<Vec<LoadedLedger>> {
        match self {
            FsLedgerSource::Dir(dir) => tomlfix_ledger::load_ledgers(dir)
                .with_context(|| format!("load ledgers from {dir}")),
            FsLedgerSource::File(path) => Ok(vec![tomlfix_ledger::load_ledger(path)]),
        }
    }
}

/// In-memory ledger source for embedding and testing. Sorted by path on construction to match
/// `FsLedgerSource`'s deterministic ordering.
#[derive(Debug, Clone)]
pub struct InMemoryLedgerSource {
    ledgers: Vec<LoadedLedger>,
}

impl InMemoryLedgerSource {
    pub fn new(mut ledgers: Vec<LoadedLedger>) -> Self {
        ledgers.sort_by(|a, b| a.path.cmp(&b.path));
        Self { ledgers }
    }
}

impl LedgerSource for InMemoryLedgerSource {
    fn load_ledgers(&self) -> anyhow::Result<Vec<LoadedLedger>> {
        Ok(self.ledgers.clone())
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tomlfix_ledger::LedgerLoadError;

    fn temp_root() -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        (temp, root)
    }

    #[test]
    fn fs_store_replace_round_trips() {
        let (_temp, root) = temp_root();
        fs::create_dir_all(root.join("crates/a")).unwrap();
        fs::write(root.join("crates/a/Cargo.toml"), "[package]\n").unwrap();

        let store = FsDocumentStore::new(root.clone());
        let id = DocumentId::from("crates/a/Cargo.toml");
        store.replace(&id, "[package]\nname = \"a\"\n").unwrap();
        assert_eq!(store.read_to_string(&id).unwrap(), "[package]\nname = \"a\"\n");

        // No temp files left behind.
        let entries: Vec<_> = std::fs::read_dir(root.join("crates/a")).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn fs_store_replace_keeps_mode() {
        use std::os::unix::fs::PermissionsExt;

        let (_temp, root) = temp_root();
        let path = root.join("tool.toml");
        fs::write(&path, "a = 1\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        FsDocumentStore::new(root.clone())
            .replace(&DocumentId::from("tool.toml"), "a = 2\n")
            .unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn fs_store_missing_root_is_inaccessible() {
        let (_temp, root) = temp_root();
        let store = FsDocumentStore::new(root.join("nope"));
        assert!(store.check_access().is_err());
    }

    #[test]
    fn in_memory_store_counts_writes() {
        let store = InMemoryDocumentStore::with_documents([("a.toml", "a = 1\n")]);
        let id = DocumentId::from("a.toml");
        assert_eq!(store.writes(), 0);
        store.replace(&id, "a = 2\n").unwrap();
        assert_eq!(store.writes(), 1);
        assert_eq!(store.get(&id).as_deref(), Some("a = 2\n"));
        assert!(store.read_to_string(&DocumentId::from("b.toml")).is_err());
    }

    #[test]
    fn in_memory_ledgers_sort_by_path() {
        let make = |p: &str| LoadedLedger {
            path: Utf8PathBuf::from(p),
            source: "test".to_string(),
            ledger: Err(LedgerLoadError::Io {
                message: "stub".to_string(),
            }),
        };
        let source = InMemoryLedgerSource::new(vec![make("z/matches.json"), make("a/matches.json")]);
        let loaded = source.load_ledgers().unwrap();
        let paths: Vec<&str> = loaded.iter().map(|l| l.path.as_str()).collect();
        assert_eq!(paths, vec!["a/matches.json", "z/matches.json"]);
    }
}
