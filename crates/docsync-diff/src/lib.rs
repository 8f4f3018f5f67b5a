//! Diff engine for docsync.
//!
//! Compares two document trees and produces the flat list of atomic
//! [`Edit`](docsync_types::Edit)s that turns one into the other. Comparison
//! is purely positional and structural: mappings are compared key by key,
//! sequences index by index, and there is no rename or move detection.
//!
//! # Key Types
//!
//! - [`TreeDiff`] -- Ordered edit list with per-kind counters
//! - [`diff_documents`] -- Entry point; validates both roots
//! - [`diff_nodes`] -- Recursive comparison anchored at any address

pub mod error;
pub mod tree_diff;

pub use error::{DiffError, DiffResult};
pub use tree_diff::{diff_documents, diff_nodes, TreeDiff};
