//! Accessioned persistence records.
//!
//! A record pairs an entity with its pre-assigned accession and the content
//! hash of its identity fields. Records are what the collections store and
//! what operation-log snapshots capture.

use crate::summary;
use crate::types::{Accession, ClusteredVariant, SubmittedVariant, VariantHash};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteredVariantRecord {
    pub accession: Accession,
    pub hash: VariantHash,
    #[serde(flatten)]
    pub variant: ClusteredVariant,
}

impl ClusteredVariantRecord {
    /// Wrap a variant with its accession, hashing the identity fields
    pub fn new(accession: Accession, variant: ClusteredVariant) -> Self {
        let hash = summary::hash_clustered(&variant);
        Self {
            accession,
            hash,
            variant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedVariantRecord {
    pub accession: Accession,
    pub hash: VariantHash,
    #[serde(flatten)]
    pub variant: SubmittedVariant,
    /// Document revision counter, carried through snapshots
    pub version: u32,
}

impl SubmittedVariantRecord {
    /// Wrap a variant with its accession, hashing the identity fields
    pub fn new(accession: Accession, variant: SubmittedVariant) -> Self {
        let hash = summary::hash_submitted(&variant);
        Self {
            accession,
            hash,
            variant,
            version: 1,
        }
    }

    /// Current clustered-variant link
    pub fn clustered_link(&self) -> Option<Accession> {
        self.variant.clustered_variant_accession
    }

    /// Copy of this record pointing at a different clustered variant.
    ///
    /// The hash is unchanged: the link is not part of the identity.
    pub fn with_clustered_link(&self, link: Option<Accession>) -> Self {
        let mut patched = self.clone();
        patched.variant.clustered_variant_accession = link;
        patched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VariantType;

    #[test]
    fn test_link_change_keeps_hash() {
        let variant = SubmittedVariant::new(
            "GCA_000002305.1",
            9796,
            "PRJEB1234",
            "NW_001868106.1",
            124459,
            "A",
            "C",
            Some(Accession(12)),
        )
        .unwrap();
        let record = SubmittedVariantRecord::new(Accession(15), variant);
        let relinked = record.with_clustered_link(Some(Accession(13)));
        assert_eq!(record.hash, relinked.hash);
        assert_eq!(relinked.clustered_link(), Some(Accession(13)));
    }

    #[test]
    fn test_clustered_record_hash_matches_summary() {
        let variant = ClusteredVariant::new(
            "GCA_000002305.1",
            9796,
            "NW_001868106.1",
            124459,
            VariantType::Snv,
            false,
        )
        .unwrap();
        let record = ClusteredVariantRecord::new(Accession(12), variant.clone());
        assert_eq!(record.hash, summary::hash_clustered(&variant));
    }
}
