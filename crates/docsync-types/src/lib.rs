//! Foundation types for docsync.
//!
//! This crate provides the document model and addressing types shared by
//! every other docsync crate.
//!
//! # Key Types
//!
//! - [`Node`] / [`Scalar`] / [`Mapping`] -- Untyped document tree with ordered mappings
//! - [`PathAddress`] / [`Segment`] -- Reversible addressing of tree locations
//! - [`Edit`] / [`EditKind`] -- A single atomic change between two trees

pub mod address;
pub mod edit;
pub mod error;
pub mod node;

pub use address::{PathAddress, Segment};
pub use edit::{Edit, EditKind};
pub use error::TypeError;
pub use node::{Document, Mapping, Node, Scalar};
