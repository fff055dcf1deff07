//! Collection adapter traits.
//!
//! Each entity kind lives in its own collection: active clustered variants,
//! active submitted variants, and the declustered clustered-variant archive.
//! The caller is responsible for consistency across collections; adapters
//! only offer point lookups, batch insert and delete.

use cairn_core::types::{
    Accession, ClusteredVariantRecord, SubmittedVariantRecord, VariantHash,
};
use cairn_core::CairnResult;

/// A record addressable by content hash and by accession
pub trait StoredRecord: Clone {
    fn accession(&self) -> Accession;
    fn content_hash(&self) -> VariantHash;
}

impl StoredRecord for ClusteredVariantRecord {
    fn accession(&self) -> Accession {
        self.accession
    }

    fn content_hash(&self) -> VariantHash {
        self.hash
    }
}

impl StoredRecord for SubmittedVariantRecord {
    fn accession(&self) -> Accession {
        self.accession
    }

    fn content_hash(&self) -> VariantHash {
        self.hash
    }
}

/// One active or archival collection of accessioned records
pub trait VariantCollection<R: StoredRecord> {
    /// Point lookup by content hash
    fn find_by_hash(&self, hash: &VariantHash) -> CairnResult<Option<R>>;

    /// Point lookup by accession.
    ///
    /// When an accession historically maps to several hashes (an
    /// already-applied merge of a multiply-mapped accession), the first
    /// record in insertion order is returned.
    fn find_by_accession(&self, accession: Accession) -> CairnResult<Option<R>>;

    /// Batch insert; returns the number of records written
    fn insert_many(&self, records: Vec<R>) -> CairnResult<usize>;

    /// Delete every record carrying the accession; returns the number removed
    fn delete_by_accession(&self, accession: Accession) -> CairnResult<usize>;
}

/// Extra queries the cross-reference repair step needs on the active
/// submitted-variant collection
pub trait SubmittedVariantCollection: VariantCollection<SubmittedVariantRecord> {
    /// All submitted variants whose clustered link equals `accession`
    fn find_by_clustered_accession(
        &self,
        accession: Accession,
    ) -> CairnResult<Vec<SubmittedVariantRecord>>;

    /// Patch the clustered link of the record with this hash in place
    fn update_clustered_accession(
        &self,
        hash: &VariantHash,
        link: Option<Accession>,
    ) -> CairnResult<()>;
}

// Shared handles: the engine and the surrounding pipeline usually hold the
// same collection through an Arc.
impl<R: StoredRecord, T: VariantCollection<R>> VariantCollection<R> for std::sync::Arc<T> {
    fn find_by_hash(&self, hash: &VariantHash) -> CairnResult<Option<R>> {
        (**self).find_by_hash(hash)
    }

    fn find_by_accession(&self, accession: Accession) -> CairnResult<Option<R>> {
        (**self).find_by_accession(accession)
    }

    fn insert_many(&self, records: Vec<R>) -> CairnResult<usize> {
        (**self).insert_many(records)
    }

    fn delete_by_accession(&self, accession: Accession) -> CairnResult<usize> {
        (**self).delete_by_accession(accession)
    }
}

impl<T: SubmittedVariantCollection> SubmittedVariantCollection for std::sync::Arc<T> {
    fn find_by_clustered_accession(
        &self,
        accession: Accession,
    ) -> CairnResult<Vec<SubmittedVariantRecord>> {
        (**self).find_by_clustered_accession(accession)
    }

    fn update_clustered_accession(
        &self,
        hash: &VariantHash,
        link: Option<Accession>,
    ) -> CairnResult<()> {
        (**self).update_clustered_accession(hash, link)
    }
}
