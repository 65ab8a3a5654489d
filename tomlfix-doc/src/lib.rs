//! Document model for tomlfix.
//!
//! Responsibilities:
//! - Load raw TOML into an editable tree that keeps comments, spacing and scalar reprs.
//! - Resolve match locations (structural paths or lines) to node handles.
//! - Expose the primitive edits every fixer strategy composes from.
//! - Serialize back, byte-for-byte when nothing changed, and render unified diffs.

mod convert;
mod document;
mod error;
mod layout;
mod lines;
mod node;
mod patch;
mod strings;

pub use convert::json_to_value;
pub use document::{Checkpoint, Document, NodeKind, NodeRef};
pub use error::{DocError, EditError, EditResult};
pub use layout::LineEnding;
pub use patch::render_patch;
pub use strings::{is_literal_representable, quote_basic, quote_literal, string_style};

// Strategies build replacement values with toml_edit directly.
pub use toml_edit;
