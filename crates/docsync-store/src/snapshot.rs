use docsync_types::Node;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Domain tag mixed into every baseline hash.
pub const BASELINE_DOMAIN: &str = "docsync-baseline-v1";

/// Hex BLAKE3 hash of a document's compact JSON form, domain-separated by
/// [`BASELINE_DOMAIN`]. Key order is part of the hashed content.
pub fn content_hash(document: &Node) -> StoreResult<String> {
    let data = serde_json::to_vec(document).map_err(|e| StoreError::Codec(e.to_string()))?;
    let mut hasher = blake3::Hasher::new();
    hasher.update(BASELINE_DOMAIN.as_bytes());
    hasher.update(b":");
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize().as_bytes()))
}

/// A saved common ancestor for one document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaselineSnapshot {
    pub document_id: String,
    pub document: Node,
    pub content_hash: String,
}

impl BaselineSnapshot {
    /// Snapshot `document` and compute its hash.
    pub fn new(document_id: impl Into<String>, document: Node) -> StoreResult<Self> {
        let content_hash = content_hash(&document)?;
        Ok(Self {
            document_id: document_id.into(),
            document,
            content_hash,
        })
    }

    /// Recompute the hash and compare it with the recorded one.
    pub fn verify(&self) -> StoreResult<()> {
        let computed = content_hash(&self.document)?;
        if computed != self.content_hash {
            return Err(StoreError::HashMismatch {
                id: self.document_id.clone(),
                expected: self.content_hash.clone(),
                computed,
            });
        }
        Ok(())
    }
}
