//! Error types for the template model.
//!
//! Model edits never fail. These errors only surface from the strict decode
//! path and from parsing user-supplied block kinds.

use smol_str::SmolStr;
use thiserror::Error;

/// Why embedded builder state could not be recovered from saved HTML.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StateError {
    /// The HTML has no `BUILDER_STATE` comment.
    #[error("no BUILDER_STATE comment found")]
    Missing,

    /// The comment payload is not a JSON array of blocks.
    #[error("BUILDER_STATE payload is not a valid block list: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// A block type name outside the known set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown block type `{0}`")]
pub struct UnknownBlockKind(pub SmolStr);
