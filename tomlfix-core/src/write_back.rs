//! The only place documents are persisted.

use crate::error::WriteError;
use crate::ports::DocumentStore;
use tomlfix_doc::Document;
use tracing::info;

/// What [`WriteBackGuard::commit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Serialized text equals the original; no I/O happened.
    Unchanged,
    /// Changed, but the guard is in dry-run mode.
    WouldWrite,
    Written,
}

impl CommitOutcome {
    pub fn is_changed(self) -> bool {
        !matches!(self, CommitOutcome::Unchanged)
    }
}

/// Writes a document back only when its text actually changed.
pub struct WriteBackGuard<'a> {
    store: &'a dyn DocumentStore,
    dry_run: bool,
}

impl<'a> WriteBackGuard<'a> {
    pub fn new(store: &'a dyn DocumentStore, dry_run: bool) -> Self {
        Self { store, dry_run }
    }

    pub fn commit(&self, doc: &Document) -> Result<CommitOutcome, WriteError> {
        let after = doc.serialize();
        if after == doc.original() {
            return Ok(CommitOutcome::Unchanged);
        }
        if self.dry_run {
            return Ok(CommitOutcome::WouldWrite);
        }
        self.store
            .replace(doc.id(), &after)
            .map_err(|cause| WriteError {
                document: doc.id().clone(),
                cause,
            })?;
        info!(document = %doc.id(), "wrote document");
        Ok(CommitOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDocumentStore;
    use tomlfix_doc::toml_edit::Value;
    use tomlfix_types::{DocumentId, TomlPath};

    fn edited(store: &InMemoryDocumentStore) -> Document {
        let id = DocumentId::from("a.toml");
        let mut doc = Document::load(id.clone(), store.get(&id).unwrap()).unwrap();
        let node = doc.locate_path(&TomlPath::from_keys(["a"])).unwrap();
        doc.replace_scalar(&node, Value::from(2i64)).unwrap();
        doc
    }

    #[test]
    fn unchanged_document_is_not_written() {
        let store = InMemoryDocumentStore::with_documents([("a.toml", "a = 1\n")]);
        let doc = Document::load("a.toml".into(), "a = 1\n").unwrap();
        let outcome = WriteBackGuard::new(&store, false).commit(&doc).unwrap();
        assert_eq!(outcome, CommitOutcome::Unchanged);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn edit_that_restores_the_original_is_not_written() {
        let store = InMemoryDocumentStore::with_documents([("a.toml", "a = 1\n")]);
        let mut doc = edited(&store);
        let node = doc.locate_path(&TomlPath::from_keys(["a"])).unwrap();
        doc.replace_scalar(&node, Value::from(1i64)).unwrap();
        let outcome = WriteBackGuard::new(&store, false).commit(&doc).unwrap();
        assert_eq!(outcome, CommitOutcome::Unchanged);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn dry_run_reports_would_write() {
        let store = InMemoryDocumentStore::with_documents([("a.toml", "a = 1\n")]);
        let doc = edited(&store);
        let outcome = WriteBackGuard::new(&store, true).commit(&doc).unwrap();
        assert_eq!(outcome, CommitOutcome::WouldWrite);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn changed_document_is_written_once() {
        let store = InMemoryDocumentStore::with_documents([("a.toml", "a = 1\n")]);
        let doc = edited(&store);
        let outcome = WriteBackGuard::new(&store, false).commit(&doc).unwrap();
        assert_eq!(outcome, CommitOutcome::Written);
        assert_eq!(store.writes(), 1);
        assert_eq!(store.get(&DocumentId::from("a.toml")).as_deref(), Some("a = 2\n"));
    }
}
