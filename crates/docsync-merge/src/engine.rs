//! Three-way reconciliation.
//!
//! The engine diffs the baseline against each side, labels every remote
//! edit with the classifier, flags it as conflicting when the local side
//! edited the exact same address, and sorts the result into four buckets.

use std::collections::HashSet;

use docsync_classify::{Classification, ClassifierConfig, Direction, PathClassifier};
use docsync_diff::diff_documents;
use docsync_types::{Edit, EditKind, Node, PathAddress};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ReconcileResult;

// ---------------------------------------------------------------------------
// ChangeRecord
// ---------------------------------------------------------------------------

/// A remote edit together with its classification and conflict status.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub address: PathAddress,
    pub kind: EditKind,
    pub old_value: Option<Node>,
    pub new_value: Option<Node>,
    pub direction: Direction,
    pub reason: String,
    pub has_conflict: bool,
}

impl ChangeRecord {
    pub fn new(edit: Edit, classification: Classification, has_conflict: bool) -> Self {
        let (address, kind, old_value, new_value) = edit.into_parts();
        Self {
            address,
            kind,
            old_value,
            new_value,
            direction: classification.direction,
            reason: classification.reason,
            has_conflict,
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeSet / ChangeSummary
// ---------------------------------------------------------------------------

/// Remote changes partitioned by where they may flow.
///
/// Each bucket keeps the differ's discovery order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChangeSet {
    /// Enrichment changes the local side did not touch.
    pub safe_to_sync: Vec<ChangeRecord>,
    /// Enrichment changes at an address the local side also edited.
    pub needs_review: Vec<ChangeRecord>,
    /// Structural changes, never merged automatically.
    pub blocked: Vec<ChangeRecord>,
    /// Changes to the artifact side-channel.
    pub artifacts: Vec<ChangeRecord>,
}

impl ChangeSet {
    /// Total number of records across all buckets.
    pub fn len(&self) -> usize {
        self.safe_to_sync.len() + self.needs_review.len() + self.blocked.len() + self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records, bucket by bucket.
    pub fn all(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.safe_to_sync
            .iter()
            .chain(&self.needs_review)
            .chain(&self.blocked)
            .chain(&self.artifacts)
    }

    fn route(&mut self, record: ChangeRecord) {
        let bucket = match (record.direction, record.has_conflict) {
            (Direction::Enrichment, false) => &mut self.safe_to_sync,
            (Direction::Enrichment, true) => &mut self.needs_review,
            (Direction::Structural, _) => &mut self.blocked,
            (Direction::Artifact, _) => &mut self.artifacts,
        };
        bucket.push(record);
    }
}

/// Per-bucket counts of a [`ChangeSet`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub safe_to_sync: usize,
    pub needs_review: usize,
    pub blocked: usize,
    pub artifacts: usize,
    /// `true` iff some record in `needs_review` is flagged as conflicting.
    pub has_conflicts: bool,
}

/// Count the records in each bucket.
pub fn summarize(changes: &ChangeSet) -> ChangeSummary {
    ChangeSummary {
        safe_to_sync: changes.safe_to_sync.len(),
        needs_review: changes.needs_review.len(),
        blocked: changes.blocked.len(),
        artifacts: changes.artifacts.len(),
        has_conflicts: changes.needs_review.iter().any(|r| r.has_conflict),
    }
}

// ---------------------------------------------------------------------------
// ReconciliationEngine
// ---------------------------------------------------------------------------

/// Orchestrates diffing, classification, and conflict detection.
///
/// Holds only the compiled classifier, so one engine can serve any number of
/// concurrent reconciliations.
#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    classifier: PathClassifier,
}

impl ReconciliationEngine {
    pub fn new(classifier: PathClassifier) -> Self {
        Self { classifier }
    }

    /// Build an engine from a rule configuration.
    pub fn from_config(config: &ClassifierConfig) -> ReconcileResult<Self> {
        Ok(Self::new(PathClassifier::new(config)?))
    }

    pub fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    /// Compare `local` and `remote` against their common `baseline`.
    ///
    /// Only remote edits end up in the change set; local edits are used to
    /// detect conflicts. Conflict detection compares exact addresses: a
    /// local edit to a parent container does not conflict with a remote
    /// edit to one of its children.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Validation`](crate::ReconcileError::Validation)
    /// if any document root is not a mapping.
    pub fn reconcile(&self, baseline: &Node, local: &Node, remote: &Node) -> ReconcileResult<ChangeSet> {
        let remote_edits = diff_documents(baseline, remote)?;
        let local_edits = diff_documents(baseline, local)?;

        let local_addresses: HashSet<String> =
            local_edits.iter().map(|e| e.address().encode()).collect();

        let mut changes = ChangeSet::default();
        for edit in remote_edits {
            let classification = self.classifier.classify(edit.address())?;
            let has_conflict = local_addresses.contains(&edit.address().encode());
            debug!(
                address = %edit.address(),
                kind = %edit.kind(),
                direction = %classification.direction,
                has_conflict,
                "remote change classified"
            );
            changes.route(ChangeRecord::new(edit, classification, has_conflict));
        }

        let summary = summarize(&changes);
        info!(
            safe = summary.safe_to_sync,
            review = summary.needs_review,
            blocked = summary.blocked,
            artifacts = summary.artifacts,
            local_edits = local_edits.len(),
            "reconciliation complete"
        );
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconcileError;
    use serde_json::json;

    fn engine() -> ReconciliationEngine {
        ReconciliationEngine::from_config(&ClassifierConfig::default()).unwrap()
    }

    fn doc(value: serde_json::Value) -> Node {
        Node::from(value)
    }

    fn addresses(records: &[ChangeRecord]) -> Vec<String> {
        records.iter().map(|r| r.address.encode()).collect()
    }

    #[test]
    fn untouched_remote_yields_empty_change_set() {
        let base = doc(json!({"info": {"description": "v1"}}));
        let local = doc(json!({"info": {"description": "mine"}}));
        let changes = engine().reconcile(&base, &local, &base).unwrap();
        assert!(changes.is_empty());
        assert_eq!(summarize(&changes), ChangeSummary::default());
    }

    #[test]
    fn conflicting_enrichment_goes_to_review() {
        let base = doc(json!({"info": {"description": "v1"}}));
        let local = doc(json!({"info": {"description": "local"}}));
        let remote = doc(json!({"info": {"description": "remote"}}));

        let changes = engine().reconcile(&base, &local, &remote).unwrap();
        assert!(changes.safe_to_sync.is_empty());
        assert_eq!(addresses(&changes.needs_review), vec!["info.description"]);
        assert!(changes.needs_review[0].has_conflict);
        assert!(summarize(&changes).has_conflicts);
    }

    #[test]
    fn conflict_does_not_change_direction() {
        let base = doc(json!({"paths": {"/a": {"get": {"operationId": "a"}}}}));
        let remote = doc(json!({"paths": {"/a": {"get": {"operationId": "b"}}}}));
        let local_conflicting = doc(json!({"paths": {"/a": {"get": {"operationId": "c"}}}}));

        let e = engine();
        let quiet = e.reconcile(&base, &base, &remote).unwrap();
        let noisy = e.reconcile(&base, &local_conflicting, &remote).unwrap();

        assert_eq!(quiet.blocked.len(), 1);
        assert_eq!(noisy.blocked.len(), 1);
        assert!(!quiet.blocked[0].has_conflict);
        assert!(noisy.blocked[0].has_conflict);
        assert_eq!(quiet.blocked[0].direction, noisy.blocked[0].direction);
        assert_eq!(quiet.blocked[0].reason, noisy.blocked[0].reason);
        // Blocked conflicts do not count towards `has_conflicts`.
        assert!(!summarize(&noisy).has_conflicts);
    }

    #[test]
    fn ancestor_edit_does_not_conflict_with_child_edit() {
        let base = doc(json!({"tags": [{"name": "a", "description": "x"}]}));
        let local = doc(json!({"tags": []}));
        let remote = doc(json!({"tags": [{"name": "a", "description": "y"}]}));

        let changes = engine().reconcile(&base, &local, &remote).unwrap();
        assert_eq!(addresses(&changes.safe_to_sync), vec!["tags.0.description"]);
        assert!(!changes.safe_to_sync[0].has_conflict);
    }

    #[test]
    fn new_endpoint_is_blocked_despite_documentation_children() {
        let base = doc(json!({"paths": {}}));
        let remote = doc(json!({"paths": {"/new": {"get": {"description": "d", "summary": "s"}}}}));

        let changes = engine().reconcile(&base, &base, &remote).unwrap();
        assert_eq!(addresses(&changes.blocked), vec!["paths./new"]);
        assert_eq!(changes.blocked[0].kind, EditKind::Add);
        assert!(changes.safe_to_sync.is_empty());

        let lenient = ReconciliationEngine::from_config(&ClassifierConfig::lenient()).unwrap();
        let changes = lenient.reconcile(&base, &base, &remote).unwrap();
        assert_eq!(addresses(&changes.blocked), vec!["paths./new"]);
        assert!(changes.safe_to_sync.is_empty());
    }

    #[test]
    fn new_paths_container_is_blocked_in_lenient_mode() {
        let lenient = ReconciliationEngine::from_config(&ClassifierConfig::lenient()).unwrap();
        let base = doc(json!({"info": {"title": "T"}}));
        let remote = doc(json!({
            "info": {"title": "T"},
            "paths": {"/admin": {"delete": {"description": "drop everything"}}}
        }));

        let changes = lenient.reconcile(&base, &base, &remote).unwrap();
        assert_eq!(addresses(&changes.blocked), vec!["paths"]);
        assert_eq!(changes.blocked[0].direction, Direction::Structural);
        assert_eq!(changes.blocked[0].reason, "structural rule 'paths'");
        assert!(changes.safe_to_sync.is_empty());

        // Dropping the whole surface is just as structural.
        let changes = lenient.reconcile(&remote, &remote, &base).unwrap();
        assert_eq!(addresses(&changes.blocked), vec!["paths"]);
        assert_eq!(changes.blocked[0].kind, EditKind::Delete);
    }

    #[test]
    fn artifacts_are_bucketed_separately() {
        let base = doc(json!({"x-docsync-artifacts": {"tests": {}}}));
        let remote = doc(json!({"x-docsync-artifacts": {"tests": {"/a": "pm.test()"}}}));

        let changes = engine().reconcile(&base, &base, &remote).unwrap();
        assert_eq!(addresses(&changes.artifacts), vec!["x-docsync-artifacts.tests./a"]);
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn buckets_keep_discovery_order() {
        let base = doc(json!({"info": {"description": "a", "summary": "b"}, "tags": []}));
        let remote = doc(json!({"tags": ["t"], "info": {"summary": "B", "description": "A"}}));

        let changes = engine().reconcile(&base, &base, &remote).unwrap();
        assert_eq!(
            addresses(&changes.safe_to_sync),
            vec!["info.description", "info.summary", "tags.0"]
        );
    }

    #[test]
    fn malformed_root_is_a_validation_error() {
        let ok = doc(json!({}));
        let bad = doc(json!(["not", "a", "document"]));
        let err = engine().reconcile(&ok, &ok, &bad).unwrap_err();
        assert!(matches!(err, ReconcileError::Validation(_)));
        let err = engine().reconcile(&ok, &bad, &ok).unwrap_err();
        assert!(matches!(err, ReconcileError::Validation(_)));
    }

    #[test]
    fn all_iterates_every_bucket() {
        let base = doc(json!({"info": {"description": "a"}, "openapi": "3.0.0"}));
        let remote = doc(json!({"info": {"description": "b"}, "openapi": "3.1.0"}));
        let changes = engine().reconcile(&base, &base, &remote).unwrap();
        assert_eq!(changes.all().count(), 2);
    }
}
