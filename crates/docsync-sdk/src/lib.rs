//! High-level SDK for docsync.
//!
//! Wraps the reconciliation core and the storage collaborators into a
//! single [`SyncSession`]: fetch the remote revision, reconcile it with the
//! local revision against the stored baseline, apply what is safe, and
//! record the new baseline.
//!
//! # Quick Start
//!
//! ```rust
//! use docsync_sdk::{
//!     InMemoryBaselineStore, InMemoryRemoteStore, JsonCodec, Node, SyncConfig, SyncSession,
//! };
//!
//! let remote = InMemoryRemoteStore::new();
//! remote.insert("api", r#"{"info":{"description":"from the portal"}}"#);
//!
//! let session = SyncSession::new(
//!     remote,
//!     InMemoryBaselineStore::new(),
//!     JsonCodec::new(),
//!     SyncConfig::default(),
//! )
//! .unwrap();
//!
//! let local: Node = serde_json::from_str(r#"{"info":{"description":""}}"#).unwrap();
//! let outcome = session.sync("api", &local).unwrap();
//! assert_eq!(outcome.merge.applied.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod session;

pub use config::SyncConfig;
pub use error::{SdkError, SdkResult};
pub use session::{SyncOutcome, SyncPlan, SyncSession};

// Re-export key types
pub use docsync_classify::{ClassifierConfig, ClassifierMode, Direction, PathClassifier};
pub use docsync_diff::{diff_documents, TreeDiff};
pub use docsync_merge::{
    ChangeRecord, ChangeSet, ChangeSummary, ConflictStrategy, MergeApplier, MergeResult,
    ReconciliationEngine, SkippedChange,
};
pub use docsync_store::{
    BaselineSnapshot, BaselineStore, DirRemoteStore, DocumentCodec, FsBaselineStore,
    InMemoryBaselineStore, InMemoryRemoteStore, JsonCodec, RemoteStore,
};
pub use docsync_types::{EditKind, Node, PathAddress};
