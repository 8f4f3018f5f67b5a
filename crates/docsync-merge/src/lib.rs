//! Merge engine for docsync.
//!
//! Reconciles a local document and a remote document against their common
//! baseline, then applies the approved remote changes onto the local side.
//!
//! # Quick Start
//!
//! ```rust
//! use docsync_merge::{ConflictStrategy, MergeApplier, ReconciliationEngine};
//! use docsync_classify::ClassifierConfig;
//! use docsync_types::Node;
//! use serde_json::json;
//!
//! let engine = ReconciliationEngine::from_config(&ClassifierConfig::default()).unwrap();
//! let baseline = Node::from(json!({"info": {"description": "v1"}}));
//! let remote = Node::from(json!({"info": {"description": "v2"}}));
//!
//! let changes = engine.reconcile(&baseline, &baseline, &remote).unwrap();
//! let merged = MergeApplier::apply(&baseline, &changes.safe_to_sync, ConflictStrategy::LocalWins);
//! assert!(merged.is_clean());
//! assert_eq!(merged.document, remote);
//! ```

pub mod apply;
pub mod engine;
pub mod error;

pub use apply::{ConflictStrategy, MergeApplier, MergeResult, SkippedChange, LOCAL_WINS_REASON};
pub use engine::{summarize, ChangeRecord, ChangeSet, ChangeSummary, ReconciliationEngine};
pub use error::{ApplyError, ReconcileError, ReconcileResult};
