//! Error types for the merge crate.

use docsync_classify::ClassifyError;
use docsync_diff::DiffError;

/// Errors that abort a whole reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// One of the three documents is malformed.
    #[error("validation error: {0}")]
    Validation(#[from] DiffError),

    /// An edit address could not be classified.
    #[error("classification error: {0}")]
    Classification(#[from] ClassifyError),
}

/// Convenience alias for reconciliation results.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Failure to apply a single change. Never aborts a batch; the applier
/// records it against the change and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    /// Changes must address something below the document root.
    #[error("cannot apply a change at the document root")]
    EmptyAddress,

    /// The walk reached a scalar where a container was needed.
    #[error("cannot descend into scalar at '{at}'")]
    DescendIntoScalar { at: String },

    /// A sequence was addressed with a non-numeric segment.
    #[error("sequence at '{at}' cannot be addressed by key '{key}'")]
    KeyOnSequence { at: String, key: String },

    /// A sequence position past the end (appending at `len` is allowed).
    #[error("index {index} is out of bounds for sequence of length {len} at '{at}'")]
    IndexOutOfBounds { at: String, index: usize, len: usize },
}
