//! Per-invocation working set of the reconciliation engine.
//!
//! All state the engine carries across the items of one batch lives here.
//! The context is created by one `write` call, owned by it, and discarded
//! when the call returns; nothing in it is shared between batches, so
//! concurrent engines over disjoint datasets cannot interfere.

use crate::reconciler::{LinkPatch, ReconcileOutcome, WriteCounts};
use cairn_core::types::{
    Accession, ClusteredVariantOperation, ClusteredVariantRecord, OperationKey,
    SubmittedVariantOperation, SubmittedVariantRecord, VariantHash,
};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub(crate) struct BatchContext {
    /// Submitted hash -> surviving accession, for hashes first seen this batch
    pub seen_submitted: HashMap<VariantHash, Accession>,
    /// Clustered hash -> surviving accession, for hashes first seen this batch
    pub seen_clustered: HashMap<VariantHash, Accession>,
    /// Clustered hash -> accession routed to the archive this batch
    pub seen_archived: HashMap<VariantHash, Accession>,

    /// Records staged for insertion, mutable until commit so that
    /// cross-reference repair can patch links in place
    pub pending_submitted: Vec<SubmittedVariantRecord>,
    pub pending_clustered: Vec<ClusteredVariantRecord>,
    pub pending_archive: Vec<ClusteredVariantRecord>,

    /// Operations staged this batch, with their dedup identities
    pub submitted_ops: Vec<SubmittedVariantOperation>,
    pub clustered_ops: Vec<ClusteredVariantOperation>,
    pub submitted_op_keys: HashSet<OperationKey>,
    /// (losing, surviving) pairs already merged, per entity kind; at most
    /// one merge operation is ever recorded per pair
    pub submitted_merge_pairs: HashSet<(Accession, Accession)>,
    pub clustered_merge_pairs: HashSet<(Accession, Accession)>,

    /// In-place link repairs of records persisted by earlier batches
    pub patches: Vec<LinkPatch>,
    pub patched_hashes: HashSet<VariantHash>,
}

impl BatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze the working set into the invocation's output
    pub fn into_outcome(self) -> ReconcileOutcome {
        ReconcileOutcome {
            inserted_clustered: self.pending_clustered,
            inserted_submitted: self.pending_submitted,
            archived_clustered: self.pending_archive,
            patches: self.patches,
            clustered_operations: self.clustered_ops,
            submitted_operations: self.submitted_ops,
            counts: WriteCounts::default(),
        }
    }
}
