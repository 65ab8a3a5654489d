use thiserror::Error;
use tomlfix_types::DocumentId;

/// Errors that abort a whole transform pass. Everything else is reported per document.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("document store unavailable: {0:#}")]
    StorageUnavailable(anyhow::Error),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}

/// Persisting a changed document failed. The original is left in place.
#[derive(Debug, Error)]
#[error("{document}: write failed: {cause:#}")]
pub struct WriteError {
    pub document: DocumentId,
    pub cause: anyhow::Error,
}
