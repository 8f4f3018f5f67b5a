//! Tree-level diff: compare two document trees and produce a list of edits.
//!
//! Mappings are compared over the union of their keys (base order first,
//! then keys new in `compare` in their own order). Sequences are compared
//! positionally. A change of shape at a location (mapping to sequence,
//! scalar to mapping, ...) is reported as one edit replacing the whole value.

use docsync_types::{Edit, EditKind, Mapping, Node, PathAddress, Segment};
use tracing::trace;

use crate::error::{DiffError, DiffResult};

/// The result of comparing two documents.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeDiff {
    /// Edits in discovery order.
    pub edits: Vec<Edit>,
}

impl TreeDiff {
    /// Create an empty tree diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Number of edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Number of added locations.
    pub fn additions(&self) -> usize {
        self.count(EditKind::Add)
    }

    /// Number of deleted locations.
    pub fn deletions(&self) -> usize {
        self.count(EditKind::Delete)
    }

    /// Number of changed locations.
    pub fn modifications(&self) -> usize {
        self.count(EditKind::Edit)
    }

    fn count(&self, kind: EditKind) -> usize {
        self.edits.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Edit> {
        self.edits.iter()
    }

    pub fn into_edits(self) -> Vec<Edit> {
        self.edits
    }
}

impl IntoIterator for TreeDiff {
    type Item = Edit;
    type IntoIter = std::vec::IntoIter<Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.into_iter()
    }
}

/// Compare two whole documents.
///
/// Both roots must be mappings; otherwise [`DiffError::InvalidRoot`] is
/// returned. Every edit is anchored at least one level below the root.
pub fn diff_documents(base: &Node, compare: &Node) -> DiffResult<TreeDiff> {
    let base_root = require_mapping("base", base)?;
    let compare_root = require_mapping("compare", compare)?;

    let mut edits = Vec::new();
    diff_mappings(&PathAddress::root(), base_root, compare_root, &mut edits);

    trace!(edits = edits.len(), "documents compared");
    Ok(TreeDiff { edits })
}

fn require_mapping<'a>(side: &'static str, node: &'a Node) -> DiffResult<&'a Mapping> {
    node.as_mapping().ok_or(DiffError::InvalidRoot {
        side,
        actual: node.kind(),
    })
}

/// Compare two optional nodes at `address`, appending edits to `out`.
///
/// An absent side turns the comparison into an `Add` or `Delete` of the
/// whole value on the other side.
pub fn diff_nodes(
    address: &PathAddress,
    base: Option<&Node>,
    compare: Option<&Node>,
    out: &mut Vec<Edit>,
) {
    match (base, compare) {
        (Some(Node::Mapping(b)), Some(Node::Mapping(c))) => diff_mappings(address, b, c, out),
        (Some(Node::Sequence(b)), Some(Node::Sequence(c))) => diff_sequences(address, b, c, out),
        _ => out.extend(Edit::between(
            address.clone(),
            base.cloned(),
            compare.cloned(),
        )),
    }
}

fn diff_mappings(address: &PathAddress, base: &Mapping, compare: &Mapping, out: &mut Vec<Edit>) {
    for (key, base_value) in base.iter() {
        diff_nodes(
            &address.child(Segment::key(key)),
            Some(base_value),
            compare.get(key),
            out,
        );
    }

    for (key, compare_value) in compare.iter() {
        if !base.contains_key(key) {
            diff_nodes(&address.child(Segment::key(key)), None, Some(compare_value), out);
        }
    }
}

fn diff_sequences(address: &PathAddress, base: &[Node], compare: &[Node], out: &mut Vec<Edit>) {
    for i in 0..base.len().max(compare.len()) {
        diff_nodes(&address.child(i), base.get(i), compare.get(i), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Node {
        Node::from(value)
    }

    fn addresses(diff: &TreeDiff) -> Vec<String> {
        diff.iter().map(|e| e.address().encode()).collect()
    }

    #[test]
    fn identical_documents_no_edits() {
        let a = doc(json!({"info": {"title": "x"}, "tags": [1, 2, {"n": null}]}));
        let b = a.clone();
        assert!(diff_documents(&a, &b).unwrap().is_empty());
    }

    #[test]
    fn scalar_change_is_single_edit() {
        let a = doc(json!({"info": {"description": "v1"}}));
        let b = doc(json!({"info": {"description": "v2"}}));

        let diff = diff_documents(&a, &b).unwrap();
        assert_eq!(diff.len(), 1);
        let edit = &diff.edits[0];
        assert_eq!(edit.address().encode(), "info.description");
        assert_eq!(edit.kind(), EditKind::Edit);
        assert_eq!(edit.before(), Some(&Node::from("v1")));
        assert_eq!(edit.after(), Some(&Node::from("v2")));
    }

    #[test]
    fn key_rename_is_delete_plus_add() {
        let a = doc(json!({"components": {"schemas": {"User": {"type": "object"}}}}));
        let b = doc(json!({"components": {"schemas": {"Account": {"type": "object"}}}}));

        let diff = diff_documents(&a, &b).unwrap();
        assert_eq!(diff.len(), 2);
        assert_eq!(diff.deletions(), 1);
        assert_eq!(diff.additions(), 1);

        assert_eq!(diff.edits[0].kind(), EditKind::Delete);
        assert_eq!(diff.edits[0].address().encode(), "components.schemas.User");
        assert_eq!(diff.edits[0].before(), Some(&doc(json!({"type": "object"}))));

        assert_eq!(diff.edits[1].kind(), EditKind::Add);
        assert_eq!(diff.edits[1].address().encode(), "components.schemas.Account");
        assert_eq!(diff.edits[1].after(), Some(&doc(json!({"type": "object"}))));
    }

    #[test]
    fn new_container_is_one_add() {
        let a = doc(json!({"paths": {"/a": {"get": {}}}}));
        let b = doc(json!({"paths": {"/a": {"get": {}, "post": {"description": "d"}}}}));

        let diff = diff_documents(&a, &b).unwrap();
        assert_eq!(addresses(&diff), vec!["paths./a.post"]);
        assert_eq!(diff.edits[0].kind(), EditKind::Add);
        assert_eq!(
            diff.edits[0].address().segments()[1],
            Segment::Literal("/a".into())
        );
    }

    #[test]
    fn sequences_compare_positionally() {
        let a = doc(json!({"tags": ["a", "b", "c"]}));
        let b = doc(json!({"tags": ["a", "x"]}));

        let diff = diff_documents(&a, &b).unwrap();
        assert_eq!(addresses(&diff), vec!["tags.1", "tags.2"]);
        assert_eq!(diff.edits[0].kind(), EditKind::Edit);
        assert_eq!(diff.edits[1].kind(), EditKind::Delete);

        let diff = diff_documents(&b, &a).unwrap();
        assert_eq!(diff.edits[1].kind(), EditKind::Add);
    }

    #[test]
    fn reordered_sequence_is_reported_as_changes() {
        let a = doc(json!({"tags": ["a", "b"]}));
        let b = doc(json!({"tags": ["b", "a"]}));
        assert_eq!(diff_documents(&a, &b).unwrap().modifications(), 2);
    }

    #[test]
    fn shape_change_replaces_whole_value() {
        let a = doc(json!({"servers": [{"url": "a"}], "x": {"k": 1}}));
        let b = doc(json!({"servers": {"url": "a"}, "x": "flat"}));

        let diff = diff_documents(&a, &b).unwrap();
        assert_eq!(addresses(&diff), vec!["servers", "x"]);
        assert!(diff.iter().all(|e| e.kind() == EditKind::Edit));
        assert_eq!(diff.edits[1].after(), Some(&Node::from("flat")));
    }

    #[test]
    fn enumeration_order_is_base_then_new_keys() {
        let a = doc(json!({"b": 1, "a": 1, "gone": 1}));
        let b = doc(json!({"z": 2, "a": 2, "b": 2, "y": 2}));

        let diff = diff_documents(&a, &b).unwrap();
        assert_eq!(addresses(&diff), vec!["b", "a", "gone", "z", "y"]);
    }

    #[test]
    fn null_to_value_is_an_edit() {
        let a = doc(json!({"n": null}));
        let b = doc(json!({"n": 0}));
        let diff = diff_documents(&a, &b).unwrap();
        assert_eq!(diff.modifications(), 1);
    }

    #[test]
    fn numeric_keys_stay_keys() {
        let a = doc(json!({"responses": {"200": {"description": "ok"}}}));
        let b = doc(json!({"responses": {"200": {"description": "fine"}}}));
        let diff = diff_documents(&a, &b).unwrap();
        assert_eq!(diff.edits[0].address().segments()[1], Segment::Key("200".into()));
    }

    #[test]
    fn non_mapping_root_is_rejected() {
        let ok = doc(json!({}));
        let err = diff_documents(&doc(json!([1, 2])), &ok).unwrap_err();
        assert_eq!(
            err,
            DiffError::InvalidRoot {
                side: "base",
                actual: "sequence"
            }
        );
        assert!(diff_documents(&ok, &doc(json!("text"))).is_err());
    }

    fn arb_node() -> impl Strategy<Value = Node> {
        let leaf = prop_oneof![
            Just(Node::null()),
            any::<bool>().prop_map(Node::from),
            any::<i64>().prop_map(Node::from),
            "[a-z ]{0,8}".prop_map(Node::from),
        ];
        leaf.prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..5).prop_map(Node::Sequence),
                proptest::collection::vec(("[a-z/]{1,6}", inner), 0..5)
                    .prop_map(|entries| Node::Mapping(entries.into_iter().collect())),
            ]
        })
    }

    fn arb_document() -> impl Strategy<Value = Node> {
        proptest::collection::vec(("[a-z]{1,6}", arb_node()), 0..6)
            .prop_map(|entries| Node::Mapping(entries.into_iter().collect()))
    }

    proptest! {
        #[test]
        fn diff_of_a_document_with_its_copy_is_empty(a in arb_document()) {
            let copy = a.clone();
            prop_assert!(diff_documents(&a, &copy).unwrap().is_empty());
        }

        #[test]
        fn every_edit_sits_below_the_root(a in arb_document(), b in arb_document()) {
            let diff = diff_documents(&a, &b).unwrap();
            prop_assert!(diff.iter().all(|e| !e.address().is_empty()));
        }
    }
}
