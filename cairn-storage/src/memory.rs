//! In-memory collection and operation-log backends.
//!
//! Backed by `DashMap` keyed on content hash with a secondary accession
//! index, mirroring how the persistent store indexes its documents. Used by
//! the test suites and by dry-run imports.

use crate::collection::{StoredRecord, SubmittedVariantCollection, VariantCollection};
use crate::operations::OperationLog;
use cairn_core::types::operation::InactiveSnapshot;
use cairn_core::types::{
    Accession, ClusteredVariantRecord, OperationKey, SubmittedVariantRecord, VariantHash,
    VariantOperation,
};
use cairn_core::{CairnError, CairnResult};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashSet;

/// Hash-keyed record collection with an accession index
#[derive(Debug)]
pub struct InMemoryCollection<R: StoredRecord> {
    records: DashMap<VariantHash, R>,
    /// Accession -> hashes in insertion order; an accession may map to
    /// several hashes as the historical result of an applied merge
    by_accession: DashMap<Accession, Vec<VariantHash>>,
}

pub type InMemoryClusteredCollection = InMemoryCollection<ClusteredVariantRecord>;
pub type InMemorySubmittedCollection = InMemoryCollection<SubmittedVariantRecord>;

impl<R: StoredRecord> Default for InMemoryCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: StoredRecord> InMemoryCollection<R> {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            by_accession: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, ordered by (accession, hash) for deterministic assertions
    pub fn all(&self) -> Vec<R> {
        let mut records: Vec<R> = self.records.iter().map(|e| e.value().clone()).collect();
        records.sort_by_key(|r| (r.accession(), r.content_hash()));
        records
    }
}

impl<R: StoredRecord> VariantCollection<R> for InMemoryCollection<R> {
    fn find_by_hash(&self, hash: &VariantHash) -> CairnResult<Option<R>> {
        Ok(self.records.get(hash).map(|e| e.value().clone()))
    }

    fn find_by_accession(&self, accession: Accession) -> CairnResult<Option<R>> {
        let Some(hashes) = self.by_accession.get(&accession) else {
            return Ok(None);
        };
        let Some(first) = hashes.first() else {
            return Ok(None);
        };
        Ok(self.records.get(first).map(|e| e.value().clone()))
    }

    fn insert_many(&self, records: Vec<R>) -> CairnResult<usize> {
        let mut written = 0;
        for record in records {
            let hash = record.content_hash();
            let accession = record.accession();
            if self.records.insert(hash, record).is_none() {
                self.by_accession.entry(accession).or_default().push(hash);
            }
            written += 1;
        }
        Ok(written)
    }

    fn delete_by_accession(&self, accession: Accession) -> CairnResult<usize> {
        let Some((_, hashes)) = self.by_accession.remove(&accession) else {
            return Ok(0);
        };
        let mut removed = 0;
        for hash in hashes {
            if self.records.remove(&hash).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl SubmittedVariantCollection for InMemorySubmittedCollection {
    fn find_by_clustered_accession(
        &self,
        accession: Accession,
    ) -> CairnResult<Vec<SubmittedVariantRecord>> {
        let mut matches: Vec<SubmittedVariantRecord> = self
            .records
            .iter()
            .filter(|e| e.value().clustered_link() == Some(accession))
            .map(|e| e.value().clone())
            .collect();
        matches.sort_by_key(|r| (r.accession, r.hash));
        Ok(matches)
    }

    fn update_clustered_accession(
        &self,
        hash: &VariantHash,
        link: Option<Accession>,
    ) -> CairnResult<()> {
        let mut record = self.records.get_mut(hash).ok_or_else(|| {
            CairnError::NotFound(format!("submitted variant with hash {}", hash))
        })?;
        record.variant.clustered_variant_accession = link;
        Ok(())
    }
}

/// Append-only operation log with idempotent appends
#[derive(Debug)]
pub struct InMemoryOperationLog<S> {
    entries: RwLock<Vec<VariantOperation<S>>>,
    keys: RwLock<HashSet<OperationKey>>,
}

impl<S> Default for InMemoryOperationLog<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> InMemoryOperationLog<S> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            keys: RwLock::new(HashSet::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<S: InactiveSnapshot + Clone> InMemoryOperationLog<S> {
    /// All entries in append order
    pub fn all(&self) -> Vec<VariantOperation<S>> {
        self.entries.read().clone()
    }
}

impl<S: InactiveSnapshot + Clone> OperationLog<S> for InMemoryOperationLog<S> {
    fn append(&self, operation: VariantOperation<S>) -> CairnResult<bool> {
        let key = operation.key();
        let mut keys = self.keys.write();
        if keys.contains(&key) {
            return Ok(false);
        }
        keys.insert(key);
        self.entries.write().push(operation);
        Ok(true)
    }

    fn exists_merge(&self, accession: Accession, merged_into: Accession) -> CairnResult<bool> {
        Ok(self.entries.read().iter().any(|op| {
            op.event == cairn_core::types::EventType::Merged
                && op.accession == accession
                && op.merged_into == Some(merged_into)
        }))
    }

    fn find_by_accession(&self, accession: Accession) -> CairnResult<Vec<VariantOperation<S>>> {
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|op| op.accession == accession)
            .cloned()
            .collect())
    }

    fn find_updates_for(&self, accession: Accession) -> CairnResult<Vec<VariantOperation<S>>> {
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|op| {
                op.event == cairn_core::types::EventType::Updated && op.accession == accession
            })
            .cloned()
            .collect())
    }

    fn find_by_merged_into(&self, accession: Accession) -> CairnResult<Vec<VariantOperation<S>>> {
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|op| op.merged_into == Some(accession))
            .cloned()
            .collect())
    }

    fn merge_target_of(&self, accession: Accession) -> CairnResult<Option<Accession>> {
        Ok(self
            .entries
            .read()
            .iter()
            .find(|op| {
                op.event == cairn_core::types::EventType::Merged && op.accession == accession
            })
            .and_then(|op| op.merged_into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::types::{SubmittedVariant, SubmittedVariantOperation, VariantType};
    use cairn_core::types::{ClusteredVariant, EventType};
    use pretty_assertions::assert_eq;

    fn submitted_record(accession: u64, start: u64, link: Option<u64>) -> SubmittedVariantRecord {
        let variant = SubmittedVariant::new(
            "GCA_000002305.1",
            9796,
            "PRJEB1234",
            "NW_001868106.1",
            start,
            "A",
            "C",
            link.map(Accession),
        )
        .unwrap();
        SubmittedVariantRecord::new(Accession(accession), variant)
    }

    fn clustered_record(accession: u64, start: u64) -> ClusteredVariantRecord {
        let variant = ClusteredVariant::new(
            "GCA_000002305.1",
            9796,
            "NW_001868106.1",
            start,
            VariantType::Snv,
            false,
        )
        .unwrap();
        ClusteredVariantRecord::new(Accession(accession), variant)
    }

    #[test]
    fn test_find_by_hash_and_accession() {
        let collection = InMemorySubmittedCollection::new();
        let record = submitted_record(15, 124459, Some(12));
        collection.insert_many(vec![record.clone()]).unwrap();

        let by_hash = collection.find_by_hash(&record.hash).unwrap().unwrap();
        assert_eq!(by_hash.accession, Accession(15));

        let by_accession = collection.find_by_accession(Accession(15)).unwrap().unwrap();
        assert_eq!(by_accession.hash, record.hash);

        assert!(collection.find_by_accession(Accession(99)).unwrap().is_none());
    }

    #[test]
    fn test_accession_may_hold_several_hashes() {
        let collection = InMemorySubmittedCollection::new();
        let first = submitted_record(15, 124459, None);
        let second = submitted_record(15, 200000, None);
        collection.insert_many(vec![first.clone(), second]).unwrap();

        assert_eq!(collection.len(), 2);
        // first insertion order wins for the singular lookup
        let found = collection.find_by_accession(Accession(15)).unwrap().unwrap();
        assert_eq!(found.hash, first.hash);

        assert_eq!(collection.delete_by_accession(Accession(15)).unwrap(), 2);
        assert!(collection.is_empty());
    }

    #[test]
    fn test_find_by_clustered_accession() {
        let collection = InMemorySubmittedCollection::new();
        collection
            .insert_many(vec![
                submitted_record(15, 124459, Some(12)),
                submitted_record(16, 200000, Some(12)),
                submitted_record(17, 300000, Some(13)),
                submitted_record(18, 400000, None),
            ])
            .unwrap();

        let linked = collection.find_by_clustered_accession(Accession(12)).unwrap();
        assert_eq!(linked.len(), 2);
        assert_eq!(linked[0].accession, Accession(15));
        assert_eq!(linked[1].accession, Accession(16));
    }

    #[test]
    fn test_update_clustered_accession_in_place() {
        let collection = InMemorySubmittedCollection::new();
        let record = submitted_record(15, 124459, Some(13));
        collection.insert_many(vec![record.clone()]).unwrap();

        collection
            .update_clustered_accession(&record.hash, Some(Accession(12)))
            .unwrap();

        let patched = collection.find_by_hash(&record.hash).unwrap().unwrap();
        assert_eq!(patched.clustered_link(), Some(Accession(12)));
        // the link is not part of the identity, so the hash is unchanged
        assert_eq!(patched.hash, record.hash);
    }

    #[test]
    fn test_clustered_collection_roundtrip() {
        let collection = InMemoryClusteredCollection::new();
        let record = clustered_record(12, 124459);
        collection.insert_many(vec![record.clone()]).unwrap();
        assert_eq!(
            collection
                .find_by_hash(&record.hash)
                .unwrap()
                .unwrap()
                .accession,
            Accession(12)
        );
    }

    #[test]
    fn test_append_is_idempotent() {
        let log: InMemoryOperationLog<SubmittedVariantRecord> = InMemoryOperationLog::new();
        let op = SubmittedVariantOperation::merged(
            Accession(16),
            Accession(15),
            "duplicate submission",
            vec![submitted_record(16, 124459, Some(12))],
        );

        assert!(log.append(op.clone()).unwrap());
        assert!(!log.append(op).unwrap());
        assert_eq!(log.len(), 1);
        assert!(log.exists_merge(Accession(16), Accession(15)).unwrap());
        assert!(!log.exists_merge(Accession(15), Accession(16)).unwrap());
    }

    #[test]
    fn test_update_lookup_and_merge_target() {
        let log: InMemoryOperationLog<SubmittedVariantRecord> = InMemoryOperationLog::new();
        log.append(SubmittedVariantOperation::updated(
            Accession(15),
            "declustered",
            vec![submitted_record(15, 124459, Some(12))],
        ))
        .unwrap();
        log.append(SubmittedVariantOperation::merged(
            Accession(16),
            Accession(15),
            "duplicate submission",
            vec![submitted_record(16, 124459, Some(12))],
        ))
        .unwrap();

        let updates = log.find_updates_for(Accession(15)).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].event, EventType::Updated);

        assert_eq!(log.merge_target_of(Accession(16)).unwrap(), Some(Accession(15)));
        assert_eq!(log.merge_target_of(Accession(15)).unwrap(), None);
        assert_eq!(log.find_by_merged_into(Accession(15)).unwrap().len(), 1);
    }
}
