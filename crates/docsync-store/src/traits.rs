use docsync_types::Node;

use crate::error::StoreResult;
use crate::snapshot::BaselineSnapshot;

/// Source of remote document text, keyed by document id.
///
/// Implementations never interpret the text; parsing belongs to a
/// [`DocumentCodec`].
pub trait RemoteStore: Send + Sync {
    /// Fetch the current text of a document.
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) if no
    /// document has that id.
    fn fetch(&self, id: &str) -> StoreResult<String>;

    /// Check whether a document exists.
    fn exists(&self, id: &str) -> StoreResult<bool>;
}

/// Converts between document text and trees.
pub trait DocumentCodec: Send + Sync {
    fn parse(&self, text: &str) -> StoreResult<Node>;

    fn serialize(&self, document: &Node) -> StoreResult<String>;
}

/// Persists the common-ancestor snapshot used by the next reconciliation.
pub trait BaselineStore: Send + Sync {
    /// Load the baseline for `id`, verifying its content hash.
    ///
    /// Returns `Ok(None)` if no baseline has been saved yet.
    fn load(&self, id: &str) -> StoreResult<Option<BaselineSnapshot>>;

    /// Replace the baseline for `id` with `document`.
    fn save(&self, id: &str, document: &Node) -> StoreResult<BaselineSnapshot>;

    /// Remove the baseline for `id`. Returns `true` if one existed.
    fn delete(&self, id: &str) -> StoreResult<bool>;
}
