//! Path classifier for docsync.
//!
//! Every change the reconciliation engine sees is labelled with a
//! [`Direction`] by matching its address against an ordered list of wildcard
//! rules. The direction decides whether the change can be merged
//! automatically, needs review, must be blocked, or belongs to the artifact
//! side-channel.
//!
//! # Quick Start
//!
//! ```rust
//! use docsync_classify::{ClassifierConfig, Direction, PathClassifier};
//! use docsync_types::PathAddress;
//!
//! let classifier = PathClassifier::new(&ClassifierConfig::default()).unwrap();
//! let verdict = classifier
//!     .classify(&PathAddress::decode("paths./users/{id}.get.summary"))
//!     .unwrap();
//! assert_eq!(verdict.direction, Direction::Enrichment);
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod pattern;

pub use classifier::{Classification, ClassificationRule, Direction, PathClassifier};
pub use config::{ClassifierConfig, ClassifierMode};
pub use error::{ClassifyError, ClassifyResult};
pub use pattern::PathPattern;
