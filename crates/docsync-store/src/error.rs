/// Errors from document and baseline storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document is stored under the requested id.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The id cannot be used as a storage key.
    #[error("invalid document id '{id}': {reason}")]
    InvalidId { id: String, reason: String },

    /// Document text could not be parsed or rendered.
    #[error("codec error: {0}")]
    Codec(String),

    /// A stored baseline does not match its recorded content hash.
    #[error("hash mismatch for baseline '{id}': expected {expected}, computed {computed}")]
    HashMismatch {
        id: String,
        expected: String,
        computed: String,
    },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Check that `id` is usable as a single file name.
///
/// Ids are limited to ASCII letters, digits, `-`, `_` and `.`, and may not
/// start with a dot.
pub fn validate_id(id: &str) -> StoreResult<()> {
    let invalid = |reason: &str| StoreError::InvalidId {
        id: id.to_string(),
        reason: reason.to_string(),
    };
    if id.is_empty() {
        return Err(invalid("id is empty"));
    }
    if id.starts_with('.') {
        return Err(invalid("id may not start with '.'"));
    }
    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(invalid(&format!("character '{c}' is not allowed")));
    }
    Ok(())
}
