use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::PathAddress;
use crate::node::Node;

/// The kind of an [`Edit`], derived from which side is absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EditKind {
    /// The location is absent before and present after.
    Add,
    /// The location is present on both sides with different values.
    Edit,
    /// The location is present before and absent after.
    Delete,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "ADD"),
            Self::Edit => write!(f, "EDIT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// One atomic change between two trees.
///
/// `kind == Add` iff `before` is absent and `kind == Delete` iff `after` is
/// absent. The constructors are the only way to build an edit, so the
/// invariant always holds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Edit {
    address: PathAddress,
    kind: EditKind,
    before: Option<Node>,
    after: Option<Node>,
}

impl Edit {
    /// Build the edit that turns `before` into `after` at `address`.
    ///
    /// Returns `None` when both sides are absent or equal.
    pub fn between(address: PathAddress, before: Option<Node>, after: Option<Node>) -> Option<Self> {
        let kind = match (&before, &after) {
            (None, None) => return None,
            (Some(b), Some(a)) if b == a => return None,
            (None, Some(_)) => EditKind::Add,
            (Some(_), None) => EditKind::Delete,
            (Some(_), Some(_)) => EditKind::Edit,
        };
        Some(Self {
            address,
            kind,
            before,
            after,
        })
    }

    pub fn added(address: PathAddress, value: Node) -> Self {
        Self {
            address,
            kind: EditKind::Add,
            before: None,
            after: Some(value),
        }
    }

    pub fn deleted(address: PathAddress, value: Node) -> Self {
        Self {
            address,
            kind: EditKind::Delete,
            before: Some(value),
            after: None,
        }
    }

    pub fn address(&self) -> &PathAddress {
        &self.address
    }

    pub fn kind(&self) -> EditKind {
        self.kind
    }

    pub fn before(&self) -> Option<&Node> {
        self.before.as_ref()
    }

    pub fn after(&self) -> Option<&Node> {
        self.after.as_ref()
    }

    /// Split into `(address, kind, before, after)`.
    pub fn into_parts(self) -> (PathAddress, EditKind, Option<Node>, Option<Node>) {
        (self.address, self.kind, self.before, self.after)
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.address)
    }
}
