//! Apply approved changes onto a target document.
//!
//! The applier works on a deep copy of the target and isolates failures per
//! change: a change whose address cannot be written is recorded in
//! [`MergeResult::skipped`] with the error text and the batch continues.

use std::fmt;
use std::str::FromStr;

use docsync_types::{EditKind, Node, PathAddress, Segment};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::engine::ChangeRecord;
use crate::error::ApplyError;

/// Skip reason recorded for conflicting changes under [`ConflictStrategy::LocalWins`].
pub const LOCAL_WINS_REASON: &str = "conflict — local wins";

// ---------------------------------------------------------------------------
// ConflictStrategy
// ---------------------------------------------------------------------------

/// How the applier treats changes flagged as conflicting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictStrategy {
    /// Skip conflicting changes; the target keeps its own value.
    #[default]
    LocalWins,
    /// Apply every change, conflicting or not.
    RemoteWins,
    /// The caller has already filtered the list; apply what is given.
    Interactive,
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalWins => write!(f, "local-wins"),
            Self::RemoteWins => write!(f, "remote-wins"),
            Self::Interactive => write!(f, "interactive"),
        }
    }
}

impl FromStr for ConflictStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local-wins" => Ok(Self::LocalWins),
            "remote-wins" => Ok(Self::RemoteWins),
            "interactive" => Ok(Self::Interactive),
            other => Err(format!(
                "unknown conflict strategy '{other}' (expected local-wins, remote-wins, or interactive)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// MergeResult
// ---------------------------------------------------------------------------

/// A change the applier did not apply, with the reason.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkippedChange {
    pub record: ChangeRecord,
    pub reason: String,
}

/// The merged document and what happened to each change.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MergeResult {
    pub document: Node,
    /// Changes written to `document`, in input order.
    pub applied: Vec<ChangeRecord>,
    /// Changes left out, in input order.
    pub skipped: Vec<SkippedChange>,
}

impl MergeResult {
    /// Returns `true` if every change was applied.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

// ---------------------------------------------------------------------------
// MergeApplier
// ---------------------------------------------------------------------------

/// Sequence element removal postponed until the end of a batch.
type PendingRemoval = (PathAddress, usize);

/// Writes change records onto documents.
pub struct MergeApplier;

impl MergeApplier {
    /// Apply `records` in order onto a copy of `target`.
    ///
    /// Missing intermediate containers are created on the way down: a
    /// sequence when the next segment is an index, a mapping otherwise. A
    /// change that fails leaves the document exactly as it found it.
    /// `Delete` removes the key or element; `Add` and `Edit` set the value.
    ///
    /// Sequence elements are removed after every other change in the batch,
    /// highest index first, so each index in `records` refers to the
    /// position it had before the merge.
    pub fn apply(target: &Node, records: &[ChangeRecord], strategy: ConflictStrategy) -> MergeResult {
        let mut document = target.clone();
        let mut applied = Vec::new();
        let mut skipped = Vec::new();
        let mut removals = Vec::new();

        for record in records {
            if record.has_conflict && strategy == ConflictStrategy::LocalWins {
                debug!(address = %record.address, "conflicting change skipped");
                skipped.push(SkippedChange {
                    record: record.clone(),
                    reason: LOCAL_WINS_REASON.to_string(),
                });
                continue;
            }

            let outcome = match (record.kind, &record.new_value) {
                (EditKind::Delete, _) | (_, None) => {
                    remove_at(&mut document, &record.address, &mut removals)
                }
                (_, Some(value)) => set_at(&mut document, &record.address, value.clone()),
            };

            match outcome {
                Ok(()) => applied.push(record.clone()),
                Err(e) => {
                    warn!(address = %record.address, error = %e, "change skipped");
                    skipped.push(SkippedChange {
                        record: record.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        flush_removals(&mut document, removals);

        info!(
            applied = applied.len(),
            skipped = skipped.len(),
            strategy = %strategy,
            "merge applied"
        );
        MergeResult {
            document,
            applied,
            skipped,
        }
    }
}

/// Encoded form of the first `len` segments of `address`, for error messages.
fn prefix(address: &PathAddress, len: usize) -> String {
    PathAddress::new(address.segments()[..len].to_vec()).encode()
}

fn empty_container_for(next: &Segment) -> Node {
    if next.is_index() {
        Node::sequence()
    } else {
        Node::mapping()
    }
}

fn sequence_index(
    segment: &Segment,
    address: &PathAddress,
    depth: usize,
) -> Result<usize, ApplyError> {
    segment.as_index().ok_or_else(|| ApplyError::KeyOnSequence {
        at: prefix(address, depth),
        key: segment.to_string(),
    })
}

/// Step from `node` to its child at `address[depth]`, creating the child if
/// it is missing.
fn descend_or_create<'a>(
    node: &'a mut Node,
    address: &PathAddress,
    depth: usize,
) -> Result<&'a mut Node, ApplyError> {
    let segments = address.segments();
    let segment = &segments[depth];
    let next = &segments[depth + 1];

    match node {
        Node::Mapping(mapping) => {
            Ok(mapping.entry_or_insert_with(&segment.as_text(), || empty_container_for(next)))
        }
        Node::Sequence(items) => {
            let index = sequence_index(segment, address, depth)?;
            let len = items.len();
            if index == len {
                items.push(empty_container_for(next));
            }
            items.get_mut(index).ok_or_else(|| ApplyError::IndexOutOfBounds {
                at: prefix(address, depth),
                index,
                len,
            })
        }
        Node::Scalar(_) => Err(ApplyError::DescendIntoScalar {
            at: prefix(address, depth),
        }),
    }
}

/// Step from `node` to an existing child; `Ok(None)` if it is absent.
fn descend_existing<'a>(
    node: &'a mut Node,
    address: &PathAddress,
    depth: usize,
) -> Result<Option<&'a mut Node>, ApplyError> {
    let segment = &address.segments()[depth];
    match node {
        Node::Mapping(mapping) => Ok(mapping.get_mut(&segment.as_text())),
        Node::Sequence(items) => {
            let index = sequence_index(segment, address, depth)?;
            Ok(items.get_mut(index))
        }
        Node::Scalar(_) => Err(ApplyError::DescendIntoScalar {
            at: prefix(address, depth),
        }),
    }
}

/// Number of leading parent segments of `address` that already resolve in
/// `document`. Fails if an existing node on the way cannot be descended.
fn existing_depth(document: &Node, address: &PathAddress, parents: usize) -> Result<usize, ApplyError> {
    let segments = address.segments();
    let mut node = document;
    for (depth, segment) in segments[..parents].iter().enumerate() {
        let child = match node {
            Node::Mapping(mapping) => mapping.get(&segment.as_text()),
            Node::Sequence(items) => items.get(sequence_index(segment, address, depth)?),
            Node::Scalar(_) => {
                return Err(ApplyError::DescendIntoScalar {
                    at: prefix(address, depth),
                })
            }
        };
        match child {
            Some(child) => node = child,
            None => return Ok(depth),
        }
    }
    Ok(parents)
}

/// Build the subtree that `address[from..]` describes, holding `value` at
/// its end, without touching any document.
fn detached(address: &PathAddress, from: usize, value: Node) -> Result<Node, ApplyError> {
    let segments = address.segments();
    let last = segments.len() - 1;
    let mut root = empty_container_for(&segments[from]);
    let mut node = &mut root;
    for depth in from..last {
        node = descend_or_create(node, address, depth)?;
    }
    write_child(node, address, last, value)?;
    Ok(root)
}

/// Write `value` as the child of `node` at `address[depth]`.
fn write_child(node: &mut Node, address: &PathAddress, depth: usize, value: Node) -> Result<(), ApplyError> {
    let segment = &address.segments()[depth];
    match node {
        Node::Mapping(mapping) => {
            mapping.insert(segment.as_text().into_owned(), value);
            Ok(())
        }
        Node::Sequence(items) => {
            let index = sequence_index(segment, address, depth)?;
            let len = items.len();
            if index < len {
                items[index] = value;
                Ok(())
            } else if index == len {
                items.push(value);
                Ok(())
            } else {
                Err(ApplyError::IndexOutOfBounds {
                    at: prefix(address, depth),
                    index,
                    len,
                })
            }
        }
        Node::Scalar(_) => Err(ApplyError::DescendIntoScalar {
            at: prefix(address, depth),
        }),
    }
}

/// Set the value at `address`. Either the whole write lands or `document`
/// is left as it was.
fn set_at(document: &mut Node, address: &PathAddress, value: Node) -> Result<(), ApplyError> {
    let parents = address
        .segments()
        .len()
        .checked_sub(1)
        .ok_or(ApplyError::EmptyAddress)?;

    // Missing containers are assembled off to the side and attached last.
    let depth = existing_depth(document, address, parents)?;
    let value = if depth < parents {
        detached(address, depth + 1, value)?
    } else {
        value
    };

    let mut node = document;
    for d in 0..depth {
        node = descend_or_create(node, address, d)?;
    }
    write_child(node, address, depth, value)
}

/// Remove the value at `address`. A location that is already absent counts
/// as removed.
fn remove_at(
    document: &mut Node,
    address: &PathAddress,
    removals: &mut Vec<PendingRemoval>,
) -> Result<(), ApplyError> {
    let (last, parents) = address
        .segments()
        .split_last()
        .ok_or(ApplyError::EmptyAddress)?;

    let mut node = document;
    for depth in 0..parents.len() {
        match descend_existing(node, address, depth)? {
            Some(child) => node = child,
            None => return Ok(()),
        }
    }

    let depth = parents.len();
    match node {
        Node::Mapping(mapping) => {
            mapping.remove(&last.as_text());
            Ok(())
        }
        Node::Sequence(items) => {
            let index = sequence_index(last, address, depth)?;
            if index < items.len() {
                let parent = PathAddress::new(parents.to_vec());
                removals.push((parent, index));
            }
            Ok(())
        }
        Node::Scalar(_) => Err(ApplyError::DescendIntoScalar {
            at: prefix(address, depth),
        }),
    }
}

fn flush_removals(document: &mut Node, mut removals: Vec<PendingRemoval>) {
    // Deepest parents first, then highest index first, so earlier removals
    // never shift a position a later one depends on.
    removals.sort_by(|a, b| b.cmp(a));
    removals.dedup();

    for (parent, index) in removals {
        if let Some(Node::Sequence(items)) = document.get_path_mut(&parent) {
            if index < items.len() {
                items.remove(index);
            }
        }
    }
}
