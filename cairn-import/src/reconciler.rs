//! The accession reconciliation engine.
//!
//! One `write` call reconciles an ordered batch of items against the active
//! collections: deduplicating submitted and clustered variants by content
//! hash, merging duplicate accessions into the surviving one with an audit
//! operation, repairing clustered-variant cross-references on submitted
//! variants, and routing clustered variants without any surviving
//! allele-consistent member into the declustered archive.
//!
//! Survivor choice is order-dependent and must stay that way: the first
//! claim of a hash in processing order wins, and records persisted by
//! earlier batches outrank anything arriving in the current one.

use crate::batch::VariantBatchItem;
use crate::context::BatchContext;
use crate::counts::ImportCounts;
use cairn_core::types::{
    Accession, ClusteredVariantOperation, ClusteredVariantRecord, SubmittedVariantOperation,
    SubmittedVariantRecord, VariantHash,
};
use cairn_core::{CairnError, CairnResult};
use cairn_storage::{OperationLog, SubmittedVariantCollection, VariantCollection};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

pub const CLUSTERED_MERGE_REASON: &str =
    "Identical clustered variant received multiple RS identifiers";
pub const SUBMITTED_MERGE_REASON: &str =
    "Identical submitted variant received multiple SS identifiers";

fn repair_reason(old: Accession, new: Accession) -> String {
    format!(
        "Original clustered variant accession was {}, merged into {}",
        old, new
    )
}

/// In-place link repair of a record persisted by an earlier batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPatch {
    pub hash: VariantHash,
    pub accession: Accession,
    pub old_link: Option<Accession>,
    pub new_link: Option<Accession>,
}

/// What one invocation actually wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteCounts {
    pub clustered_variants: usize,
    pub submitted_variants: usize,
    pub operations: usize,
}

/// Full output of one reconciliation invocation
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub inserted_clustered: Vec<ClusteredVariantRecord>,
    pub inserted_submitted: Vec<SubmittedVariantRecord>,
    pub archived_clustered: Vec<ClusteredVariantRecord>,
    pub patches: Vec<LinkPatch>,
    pub clustered_operations: Vec<ClusteredVariantOperation>,
    pub submitted_operations: Vec<SubmittedVariantOperation>,
    pub counts: WriteCounts,
}

/// The engine entry point consumed by the import pipeline
pub struct VariantReconciler<C, S, A, LC, LS> {
    active_clustered: C,
    active_submitted: S,
    declustered_archive: A,
    clustered_operations: LC,
    submitted_operations: LS,
    counts: Arc<ImportCounts>,
}

impl<C, S, A, LC, LS> VariantReconciler<C, S, A, LC, LS>
where
    C: VariantCollection<ClusteredVariantRecord>,
    S: SubmittedVariantCollection,
    A: VariantCollection<ClusteredVariantRecord>,
    LC: OperationLog<ClusteredVariantRecord>,
    LS: OperationLog<SubmittedVariantRecord>,
{
    pub fn new(
        active_clustered: C,
        active_submitted: S,
        declustered_archive: A,
        clustered_operations: LC,
        submitted_operations: LS,
        counts: Arc<ImportCounts>,
    ) -> Self {
        Self {
            active_clustered,
            active_submitted,
            declustered_archive,
            clustered_operations,
            submitted_operations,
            counts,
        }
    }

    /// Reconcile one batch and commit its output as a unit.
    ///
    /// Re-running a batch that was already fully applied is a no-op: no
    /// duplicate records are inserted and no duplicate operations appended.
    pub fn write(&self, batch: &[VariantBatchItem]) -> CairnResult<ReconcileOutcome> {
        for item in batch {
            item.validate()?;
        }

        let mut ctx = BatchContext::new();
        for item in batch {
            self.process_item(item, &mut ctx)?;
        }

        let mut outcome = ctx.into_outcome();
        self.check_invariants(&outcome)?;
        self.commit(&mut outcome)?;
        Ok(outcome)
    }

    fn process_item(&self, item: &VariantBatchItem, ctx: &mut BatchContext) -> CairnResult<()> {
        // decluster updates first: they decide which links are still live
        for operation in &item.operations {
            self.stage_submitted_update(operation.clone(), ctx)?;
        }
        for record in &item.submitted_variants {
            self.process_submitted(record, item.clustered_variant.accession, ctx)?;
        }
        // the clustered variant is finalized only after its members, so a
        // decluster above can still change its routing below
        self.process_clustered(item, ctx)
    }

    // ----- submitted variants --------------------------------------------

    fn process_submitted(
        &self,
        record: &SubmittedVariantRecord,
        item_clustered: Accession,
        ctx: &mut BatchContext,
    ) -> CairnResult<()> {
        match self.resolve_submitted(&record.hash, ctx)? {
            None => {
                let mut record = record.clone();
                // a link to an accession merged away in an earlier batch is
                // repaired transitively before the record is first persisted
                if let Some(link) = record.clustered_link() {
                    if link != item_clustered {
                        if let Some(target) = self.persisted_merge_target(link)? {
                            let snapshot = record.clone();
                            let operation = SubmittedVariantOperation::updated(
                                record.accession,
                                repair_reason(link, target),
                                vec![snapshot],
                            );
                            self.stage_submitted_update(operation, ctx)?;
                            record = record.with_clustered_link(Some(target));
                        }
                    }
                }
                if record.variant.created_date.is_none() {
                    record.variant.created_date = Some(Utc::now());
                }
                ctx.seen_submitted.insert(record.hash, record.accession);
                ctx.pending_submitted.push(record);
            }
            Some(surviving) if surviving == record.accession => {
                // exact repeat of an already-reconciled record
            }
            Some(surviving) => {
                self.stage_submitted_merge(record, surviving, ctx)?;
            }
        }
        Ok(())
    }

    /// Surviving accession for a submitted hash. Entries persisted by
    /// earlier batches outrank the current batch; a hash claimed by both
    /// with different accessions is a corrupted working set and aborts the
    /// batch.
    fn resolve_submitted(
        &self,
        hash: &VariantHash,
        ctx: &BatchContext,
    ) -> CairnResult<Option<Accession>> {
        let staged = ctx.seen_submitted.get(hash).copied();
        let persisted = self
            .active_submitted
            .find_by_hash(hash)?
            .map(|r| r.accession);
        match (staged, persisted) {
            (Some(staged), Some(persisted)) if staged != persisted => {
                Err(CairnError::Reconciliation(format!(
                    "submitted hash {} resolves to accessions {} and {}",
                    hash, staged, persisted
                )))
            }
            (staged, persisted) => Ok(persisted.or(staged)),
        }
    }

    fn stage_submitted_merge(
        &self,
        losing: &SubmittedVariantRecord,
        surviving: Accession,
        ctx: &mut BatchContext,
    ) -> CairnResult<()> {
        let pair = (losing.accession, surviving);
        if ctx.submitted_merge_pairs.contains(&pair)
            || self.submitted_operations.exists_merge(pair.0, pair.1)?
        {
            return Ok(());
        }

        tracing::debug!(
            losing = %losing.accession,
            surviving = %surviving,
            hash = %losing.hash,
            "merging duplicate submitted variant"
        );

        let operation = SubmittedVariantOperation::merged(
            losing.accession,
            surviving,
            SUBMITTED_MERGE_REASON,
            vec![losing.clone()],
        );
        ctx.submitted_op_keys.insert(operation.key());
        ctx.submitted_merge_pairs.insert(pair);
        ctx.submitted_ops.push(operation);
        Ok(())
    }

    /// Stage an update operation unless an identical one was already staged
    /// this batch or persisted by an earlier one. Returns whether it was
    /// staged.
    fn stage_submitted_update(
        &self,
        operation: SubmittedVariantOperation,
        ctx: &mut BatchContext,
    ) -> CairnResult<bool> {
        let key = operation.key();
        if ctx.submitted_op_keys.contains(&key) {
            return Ok(false);
        }
        let persisted = self.submitted_operations.find_updates_for(operation.accession)?;
        if persisted.iter().any(|existing| existing.key() == key) {
            return Ok(false);
        }
        ctx.submitted_op_keys.insert(key);
        ctx.submitted_ops.push(operation);
        Ok(true)
    }

    // ----- clustered variants --------------------------------------------

    fn process_clustered(&self, item: &VariantBatchItem, ctx: &mut BatchContext) -> CairnResult<()> {
        let rs = &item.clustered_variant;

        // once archived, never resurrected or duplicated by a later batch
        if self.declustered_archive.find_by_hash(&rs.hash)?.is_some() {
            tracing::debug!(
                accession = %rs.accession,
                hash = %rs.hash,
                "clustered variant already archived, skipping"
            );
            return Ok(());
        }

        let has_member = self.has_surviving_member(item, ctx)?;

        if ctx.seen_archived.contains_key(&rs.hash) {
            if has_member {
                // a surviving member arrived later in the same batch; the
                // archive insert is still pending, so the variant moves to
                // the active set and the exclusivity invariant holds
                ctx.pending_archive.retain(|r| r.hash != rs.hash);
                ctx.seen_archived.remove(&rs.hash);
                tracing::debug!(
                    accession = %rs.accession,
                    "promoting archive-routed clustered variant to active"
                );
            } else {
                return Ok(());
            }
        }

        if !has_member {
            // no surviving member anywhere: archive it, and never write the
            // active collection even if a duplicate of this hash is active
            if ctx.seen_clustered.contains_key(&rs.hash)
                || self.active_clustered.find_by_hash(&rs.hash)?.is_some()
            {
                return Ok(());
            }
            let mut record = rs.clone();
            if record.variant.created_date.is_none() {
                record.variant.created_date = Some(Utc::now());
            }
            tracing::debug!(
                accession = %record.accession,
                hash = %record.hash,
                "archiving clustered variant with no surviving member"
            );
            ctx.seen_archived.insert(record.hash, record.accession);
            ctx.pending_archive.push(record);
            return Ok(());
        }

        match self.resolve_clustered(&rs.hash, ctx)? {
            None => {
                let mut record = rs.clone();
                if record.variant.created_date.is_none() {
                    record.variant.created_date = Some(Utc::now());
                }
                ctx.seen_clustered.insert(record.hash, record.accession);
                ctx.pending_clustered.push(record);
            }
            Some(surviving) if surviving == rs.accession => {
                // exact repeat of an already-reconciled record
            }
            Some(surviving) => {
                self.stage_clustered_merge(rs, surviving, ctx)?;
                self.repair_cross_references(rs.accession, surviving, ctx)?;
            }
        }
        Ok(())
    }

    /// Whether any submitted variant still holds a live link to this item's
    /// clustered variant: the item's own members as reconciled, members
    /// staged earlier in the batch, or members persisted by earlier batches.
    fn has_surviving_member(
        &self,
        item: &VariantBatchItem,
        ctx: &BatchContext,
    ) -> CairnResult<bool> {
        for record in &item.submitted_variants {
            if self.surviving_link(record, ctx)?.is_some() {
                return Ok(true);
            }
        }
        let accession = item.clustered_variant.accession;
        if ctx
            .pending_submitted
            .iter()
            .any(|r| r.clustered_link() == Some(accession))
        {
            return Ok(true);
        }
        Ok(!self
            .active_submitted
            .find_by_clustered_accession(accession)?
            .is_empty())
    }

    /// Current link of the surviving copy of a submitted record
    fn surviving_link(
        &self,
        record: &SubmittedVariantRecord,
        ctx: &BatchContext,
    ) -> CairnResult<Option<Accession>> {
        if let Some(staged) = ctx.pending_submitted.iter().find(|r| r.hash == record.hash) {
            return Ok(staged.clustered_link());
        }
        if let Some(patch) = ctx.patches.iter().rev().find(|p| p.hash == record.hash) {
            return Ok(patch.new_link);
        }
        if let Some(persisted) = self.active_submitted.find_by_hash(&record.hash)? {
            return Ok(persisted.clustered_link());
        }
        Ok(record.clustered_link())
    }

    fn resolve_clustered(
        &self,
        hash: &VariantHash,
        ctx: &BatchContext,
    ) -> CairnResult<Option<Accession>> {
        let staged = ctx.seen_clustered.get(hash).copied();
        let persisted = self
            .active_clustered
            .find_by_hash(hash)?
            .map(|r| r.accession);
        match (staged, persisted) {
            (Some(staged), Some(persisted)) if staged != persisted => {
                Err(CairnError::Reconciliation(format!(
                    "clustered hash {} resolves to accessions {} and {}",
                    hash, staged, persisted
                )))
            }
            (staged, persisted) => Ok(persisted.or(staged)),
        }
    }

    fn stage_clustered_merge(
        &self,
        losing: &ClusteredVariantRecord,
        surviving: Accession,
        ctx: &mut BatchContext,
    ) -> CairnResult<()> {
        let pair = (losing.accession, surviving);
        if ctx.clustered_merge_pairs.contains(&pair)
            || self.clustered_operations.exists_merge(pair.0, pair.1)?
        {
            return Ok(());
        }

        tracing::debug!(
            losing = %losing.accession,
            surviving = %surviving,
            hash = %losing.hash,
            "merging duplicate clustered variant"
        );

        let operation = ClusteredVariantOperation::merged(
            losing.accession,
            surviving,
            CLUSTERED_MERGE_REASON,
            vec![losing.clone()],
        );
        ctx.clustered_merge_pairs.insert(pair);
        ctx.clustered_ops.push(operation);
        Ok(())
    }

    /// Repoint every submitted variant still linked to the losing accession
    /// at the survivor, recording one update operation per repaired record
    fn repair_cross_references(
        &self,
        losing: Accession,
        surviving: Accession,
        ctx: &mut BatchContext,
    ) -> CairnResult<()> {
        // records staged for insertion this batch
        let mut staged = Vec::new();
        for record in ctx
            .pending_submitted
            .iter_mut()
            .filter(|r| r.clustered_link() == Some(losing))
        {
            let snapshot = record.clone();
            record.variant.clustered_variant_accession = Some(surviving);
            staged.push(SubmittedVariantOperation::updated(
                snapshot.accession,
                repair_reason(losing, surviving),
                vec![snapshot],
            ));
        }
        for operation in staged {
            self.stage_submitted_update(operation, ctx)?;
        }

        // records persisted by earlier batches
        for persisted in self.active_submitted.find_by_clustered_accession(losing)? {
            if ctx.patched_hashes.contains(&persisted.hash) {
                continue;
            }
            let operation = SubmittedVariantOperation::updated(
                persisted.accession,
                repair_reason(losing, surviving),
                vec![persisted.clone()],
            );
            if self.stage_submitted_update(operation, ctx)? {
                tracing::debug!(
                    accession = %persisted.accession,
                    old = %losing,
                    new = %surviving,
                    "repairing clustered link of persisted submitted variant"
                );
                ctx.patched_hashes.insert(persisted.hash);
                ctx.patches.push(LinkPatch {
                    hash: persisted.hash,
                    accession: persisted.accession,
                    old_link: Some(losing),
                    new_link: Some(surviving),
                });
            }
        }
        Ok(())
    }

    /// Terminal survivor of a merge chain recorded by earlier batches
    fn persisted_merge_target(&self, accession: Accession) -> CairnResult<Option<Accession>> {
        let mut current = accession;
        let mut hops = 0;
        while let Some(target) = self.clustered_operations.merge_target_of(current)? {
            current = target;
            hops += 1;
            if hops > 64 {
                return Err(CairnError::Reconciliation(format!(
                    "merge chain starting at {} does not terminate",
                    accession
                )));
            }
        }
        Ok((current != accession).then_some(current))
    }

    // ----- commit ---------------------------------------------------------

    /// A hash resolving to two survivors, or a clustered variant bound for
    /// both collections, means the batch input was self-contradictory:
    /// abort instead of silently picking a side
    fn check_invariants(&self, outcome: &ReconcileOutcome) -> CairnResult<()> {
        let mut submitted = HashSet::new();
        for record in &outcome.inserted_submitted {
            if !submitted.insert(record.hash) {
                return Err(CairnError::Reconciliation(format!(
                    "submitted hash {} staged for insertion twice",
                    record.hash
                )));
            }
        }
        let mut clustered = HashSet::new();
        for record in outcome
            .inserted_clustered
            .iter()
            .chain(&outcome.archived_clustered)
        {
            if !clustered.insert(record.hash) {
                return Err(CairnError::Reconciliation(format!(
                    "clustered hash {} staged for both active and archive",
                    record.hash
                )));
            }
        }
        Ok(())
    }

    fn commit(&self, outcome: &mut ReconcileOutcome) -> CairnResult<()> {
        let submitted_variants = self
            .active_submitted
            .insert_many(outcome.inserted_submitted.clone())?;
        let clustered_variants = self
            .active_clustered
            .insert_many(outcome.inserted_clustered.clone())?;
        self.declustered_archive
            .insert_many(outcome.archived_clustered.clone())?;

        for patch in &outcome.patches {
            self.active_submitted
                .update_clustered_accession(&patch.hash, patch.new_link)?;
        }

        let mut operations = 0;
        for operation in &outcome.clustered_operations {
            if self.clustered_operations.append(operation.clone())? {
                operations += 1;
            }
        }
        for operation in &outcome.submitted_operations {
            if self.submitted_operations.append(operation.clone())? {
                operations += 1;
            }
        }

        outcome.counts = WriteCounts {
            clustered_variants,
            submitted_variants,
            operations,
        };
        self.counts.add_clustered_variants(clustered_variants as u64);
        self.counts.add_submitted_variants(submitted_variants as u64);
        self.counts.add_operations(operations as u64);

        tracing::info!(
            clustered = clustered_variants,
            submitted = submitted_variants,
            archived = outcome.archived_clustered.len(),
            patches = outcome.patches.len(),
            operations,
            "batch committed"
        );
        Ok(())
    }
}
