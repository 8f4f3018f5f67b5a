//! Error types for the diff crate.

/// Errors that can occur during diff operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// A document root was not a mapping.
    #[error("invalid {side} document: root must be a mapping, got {actual}")]
    InvalidRoot {
        side: &'static str,
        actual: &'static str,
    },
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
