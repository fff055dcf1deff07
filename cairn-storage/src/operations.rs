//! Operation-log adapter trait.
//!
//! The log is the audit trail of reconciliation: every merge and every
//! in-place update is recorded once, with the superseded state attached.
//! Entries are never mutated or deleted.

use cairn_core::types::operation::InactiveSnapshot;
use cairn_core::types::{Accession, VariantOperation};
use cairn_core::CairnResult;

pub trait OperationLog<S: InactiveSnapshot + Clone> {
    /// Append an operation. Returns `false` (and appends nothing) when an
    /// operation with the same identity key already exists: repeating a
    /// batch that produces an identical operation is a no-op.
    fn append(&self, operation: VariantOperation<S>) -> CairnResult<bool>;

    /// Whether a merge of `accession` into `merged_into` has been recorded
    fn exists_merge(&self, accession: Accession, merged_into: Accession) -> CairnResult<bool>;

    /// Every operation affecting the accession
    fn find_by_accession(&self, accession: Accession) -> CairnResult<Vec<VariantOperation<S>>>;

    /// Update operations affecting the accession
    fn find_updates_for(&self, accession: Accession) -> CairnResult<Vec<VariantOperation<S>>>;

    /// Operations whose surviving accession is `accession`
    fn find_by_merged_into(&self, accession: Accession) -> CairnResult<Vec<VariantOperation<S>>>;

    /// Surviving accession this accession was merged into, if any.
    ///
    /// A multiply-mapped accession can have several merge targets; the
    /// earliest recorded one is returned.
    fn merge_target_of(&self, accession: Accession) -> CairnResult<Option<Accession>>;
}

impl<S: InactiveSnapshot + Clone, T: OperationLog<S>> OperationLog<S> for std::sync::Arc<T> {
    fn append(&self, operation: VariantOperation<S>) -> CairnResult<bool> {
        (**self).append(operation)
    }

    fn exists_merge(&self, accession: Accession, merged_into: Accession) -> CairnResult<bool> {
        (**self).exists_merge(accession, merged_into)
    }

    fn find_by_accession(&self, accession: Accession) -> CairnResult<Vec<VariantOperation<S>>> {
        (**self).find_by_accession(accession)
    }

    fn find_updates_for(&self, accession: Accession) -> CairnResult<Vec<VariantOperation<S>>> {
        (**self).find_updates_for(accession)
    }

    fn find_by_merged_into(&self, accession: Accession) -> CairnResult<Vec<VariantOperation<S>>> {
        (**self).find_by_merged_into(accession)
    }

    fn merge_target_of(&self, accession: Accession) -> CairnResult<Option<Accession>> {
        (**self).merge_target_of(accession)
    }
}
