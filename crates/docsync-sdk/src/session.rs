use docsync_merge::{
    summarize, ChangeRecord, ChangeSet, ChangeSummary, MergeApplier, MergeResult,
    ReconciliationEngine,
};
use docsync_store::{BaselineSnapshot, BaselineStore, DocumentCodec, RemoteStore};
use docsync_types::Node;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::SyncConfig;
use crate::error::{SdkError, SdkResult};

/// What a sync would do, before anything is applied.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SyncPlan {
    pub document_id: String,
    /// Hash of the baseline used, or `None` on a first sync.
    pub baseline_hash: Option<String>,
    pub remote: Node,
    pub changes: ChangeSet,
    pub summary: ChangeSummary,
}

impl SyncPlan {
    /// Records the session would hand to the applier.
    pub fn selected(&self, include_review: bool) -> Vec<ChangeRecord> {
        let mut records = self.changes.safe_to_sync.clone();
        if include_review {
            records.extend(self.changes.needs_review.iter().cloned());
        }
        records
    }
}

/// Result of [`SyncSession::sync`] or [`SyncSession::preview`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SyncOutcome {
    pub plan: SyncPlan,
    pub merge: MergeResult,
    /// The remote revision saved as the next baseline; `None` for a preview.
    pub baseline: Option<BaselineSnapshot>,
}

/// One document source, one baseline store, one rule set.
///
/// A session pulls the remote revision of a document, reconciles it with the
/// caller's local revision against the stored baseline, and applies the
/// selected changes onto the local revision. The remote revision it merged
/// from becomes the next baseline: every remote change up to that point has
/// been either taken or declined, and local edits stay local edits.
///
/// With no stored baseline (first sync), the local revision serves as the
/// common ancestor: every remote difference is a remote change and nothing
/// conflicts.
pub struct SyncSession<R, B, C> {
    remote: R,
    baselines: B,
    codec: C,
    engine: ReconciliationEngine,
    config: SyncConfig,
}

impl<R, B, C> SyncSession<R, B, C>
where
    R: RemoteStore,
    B: BaselineStore,
    C: DocumentCodec,
{
    pub fn new(remote: R, baselines: B, codec: C, config: SyncConfig) -> SdkResult<Self> {
        let engine = ReconciliationEngine::from_config(&config.classifier)?;
        Ok(Self {
            remote,
            baselines,
            codec,
            engine,
            config,
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    pub fn remote_store(&self) -> &R {
        &self.remote
    }

    pub fn baseline_store(&self) -> &B {
        &self.baselines
    }

    /// Fetch, parse, and reconcile without applying anything.
    pub fn plan(&self, id: &str, local: &Node) -> SdkResult<SyncPlan> {
        let text = self.remote.fetch(id)?;
        let remote = self.codec.parse(&text)?;

        let stored = self.baselines.load(id)?;
        let baseline_hash = stored.as_ref().map(|s| s.content_hash.clone());
        let baseline = match &stored {
            Some(snapshot) => &snapshot.document,
            None => {
                info!(id, "no baseline stored, using local document as ancestor");
                local
            }
        };

        let changes = self.engine.reconcile(baseline, local, &remote)?;
        let summary = summarize(&changes);
        Ok(SyncPlan {
            document_id: id.to_string(),
            baseline_hash,
            remote,
            changes,
            summary,
        })
    }

    /// Plan and merge, but leave the stored baseline alone.
    pub fn preview(&self, id: &str, local: &Node) -> SdkResult<SyncOutcome> {
        let plan = self.plan(id, local)?;
        let merge = self.merge(&plan, local);
        Ok(SyncOutcome {
            plan,
            merge,
            baseline: None,
        })
    }

    /// Plan, merge, and save the remote revision as the new baseline.
    ///
    /// # Errors
    ///
    /// With `require_clean` set, returns [`SdkError::Incomplete`] and keeps
    /// the previous baseline if any selected change was skipped.
    pub fn sync(&self, id: &str, local: &Node) -> SdkResult<SyncOutcome> {
        let plan = self.plan(id, local)?;
        let merge = self.merge(&plan, local);

        if self.config.require_clean && !merge.is_clean() {
            warn!(id, skipped = merge.skipped.len(), "merge incomplete, baseline kept");
            return Err(SdkError::Incomplete {
                id: id.to_string(),
                skipped: merge.skipped.len(),
            });
        }

        let baseline = self.baselines.save(id, &plan.remote)?;
        info!(
            id,
            applied = merge.applied.len(),
            skipped = merge.skipped.len(),
            blocked = plan.summary.blocked,
            baseline = %baseline.content_hash,
            "sync complete"
        );
        Ok(SyncOutcome {
            plan,
            merge,
            baseline: Some(baseline),
        })
    }

    /// Render a document with the session's codec.
    pub fn render(&self, document: &Node) -> SdkResult<String> {
        Ok(self.codec.serialize(document)?)
    }

    fn merge(&self, plan: &SyncPlan, local: &Node) -> MergeResult {
        let selected = plan.selected(self.config.include_review);
        MergeApplier::apply(local, &selected, self.config.strategy)
    }
}
