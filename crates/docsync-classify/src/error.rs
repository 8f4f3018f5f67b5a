/// Errors that can occur while building or running a classifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    /// Classification needs at least one address segment.
    #[error("cannot classify the empty address")]
    EmptyAddress,

    /// A rule pattern could not be compiled.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClassifyError {
    pub(crate) fn pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for classifier results.
pub type ClassifyResult<T> = Result<T, ClassifyError>;
