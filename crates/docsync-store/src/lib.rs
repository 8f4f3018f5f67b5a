//! Storage collaborators for docsync.
//!
//! The reconciliation core never does I/O. This crate supplies the pieces a
//! sync run needs around it: a [`RemoteStore`] to fetch the authoritative
//! document text, a [`DocumentCodec`] to turn text into trees, and a
//! [`BaselineStore`] that keeps the common ancestor between runs.
//!
//! # Backends
//!
//! - [`InMemoryRemoteStore`], [`InMemoryBaselineStore`] -- `HashMap`-based,
//!   for tests and embedding
//! - [`DirRemoteStore`], [`FsBaselineStore`] -- one file per document id
//!
//! Baselines carry a domain-separated BLAKE3 [`content_hash`] that is
//! checked on every load.

pub mod codec;
pub mod error;
pub mod fs;
pub mod memory;
pub mod snapshot;
pub mod traits;

pub use codec::JsonCodec;
pub use error::{validate_id, StoreError, StoreResult};
pub use fs::{DirRemoteStore, FsBaselineStore};
pub use memory::{InMemoryBaselineStore, InMemoryRemoteStore};
pub use snapshot::{content_hash, BaselineSnapshot, BASELINE_DOMAIN};
pub use traits::{BaselineStore, DocumentCodec, RemoteStore};
