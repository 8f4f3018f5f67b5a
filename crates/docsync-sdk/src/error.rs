use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("sync of '{id}' left {skipped} change(s) unapplied")]
    Incomplete { id: String, skipped: usize },

    #[error("store error: {0}")]
    Store(#[from] docsync_store::StoreError),

    #[error("reconcile error: {0}")]
    Reconcile(#[from] docsync_merge::ReconcileError),

    #[error("classifier error: {0}")]
    Classify(#[from] docsync_classify::ClassifyError),
}

pub type SdkResult<T> = Result<T, SdkError>;
