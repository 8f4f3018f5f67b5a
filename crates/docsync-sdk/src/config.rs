use docsync_classify::ClassifierConfig;
use docsync_merge::ConflictStrategy;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Settings for a [`SyncSession`](crate::SyncSession).
///
/// Loaded from TOML; every key is optional:
///
/// ```toml
/// strategy = "local-wins"
/// include_review = false
/// require_clean = false
///
/// [classifier]
/// mode = "strict"
/// enrichment = ["info.description", "tags"]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Rules used to classify remote changes.
    pub classifier: ClassifierConfig,
    /// How conflicting records are treated when applied.
    pub strategy: ConflictStrategy,
    /// Also apply `needs_review` records, subject to `strategy`.
    pub include_review: bool,
    /// Fail the sync, and keep the old baseline, if any selected change was
    /// skipped.
    pub require_clean: bool,
}

impl SyncConfig {
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))
    }
}
