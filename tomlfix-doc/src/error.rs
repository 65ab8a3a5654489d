//! Error types for tomlfix-doc.
//!
//! Loading distinguishes one failure (the text is not TOML). Edits fail with a precondition
//! error that strategies usually demote to "not applicable".

use thiserror::Error;
use tomlfix_types::{DocumentId, TomlPath};

/// Failure to load a document.
#[derive(Debug, Error)]
pub enum DocError {
    #[error("{document}: parse error: {message}")]
    Parse {
        document: DocumentId,
        message: String,
    },
}

/// A primitive edit whose preconditions do not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("no node at {path}")]
    NotFound { path: TomlPath },

    #[error("node at {path} is not a value")]
    NotAValue { path: TomlPath },

    #[error("node at {path} is not a string")]
    NotAString { path: TomlPath },

    #[error("node at {path} has no children")]
    NotAContainer { path: TomlPath },

    #[error("node at {path} is not addressed by a key")]
    NotAKey { path: TomlPath },

    #[error("key {key:?} already exists under {path}")]
    KeyExists { path: TomlPath, key: String },

    #[error("index {index} out of bounds under {path}")]
    IndexOutOfBounds { path: TomlPath, index: usize },

    #[error("cannot represent value at {path}: {reason}")]
    Unrepresentable { path: TomlPath, reason: String },

    #[error("the document root cannot be {action}")]
    Root { action: &'static str },
}

impl EditError {
    /// True when the edit failed because its target is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EditError::NotFound { .. })
    }
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;
