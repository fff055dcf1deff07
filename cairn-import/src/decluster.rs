//! Decluster classifier.
//!
//! A submitted variant whose alleles do not match its clustered variant may
//! not stay linked to it: the link is detached before the record reaches the
//! reconciliation engine, and an update operation preserves the prior linked
//! state. Whether the clustered variant itself stays active depends on its
//! remaining members and is decided later, by the engine.

use crate::batch::VariantBatchItem;
use cairn_core::types::{SubmittedVariantOperation, SubmittedVariantRecord};

pub const DECLUSTERED_REASON: &str =
    "Declustered: alleles of the submitted variant do not match the clustered variant";

#[derive(Debug, Default)]
pub struct DeclusterProcessor;

impl DeclusterProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Detach the clustered link of an allele-mismatched record.
    ///
    /// Returns the record to persist and, when declustering happened, the
    /// update operation carrying the prior state as inactive snapshot.
    pub fn decluster(
        &self,
        record: SubmittedVariantRecord,
    ) -> (SubmittedVariantRecord, Option<SubmittedVariantOperation>) {
        let Some(link) = record.clustered_link() else {
            return (record, None);
        };
        if record.variant.alleles_match {
            return (record, None);
        }

        tracing::debug!(
            accession = %record.accession,
            clustered = %link,
            "declustering submitted variant with mismatching alleles"
        );

        let snapshot = record.clone();
        let operation =
            SubmittedVariantOperation::updated(record.accession, DECLUSTERED_REASON, vec![snapshot]);
        (record.with_clustered_link(None), Some(operation))
    }

    /// Run the classifier over every submitted variant of a batch item,
    /// collecting the produced operations onto the item
    pub fn apply(&self, item: VariantBatchItem) -> VariantBatchItem {
        let mut operations = item.operations;
        let mut submitted = Vec::with_capacity(item.submitted_variants.len());
        for record in item.submitted_variants {
            let (record, operation) = self.decluster(record);
            if let Some(operation) = operation {
                operations.push(operation);
            }
            submitted.push(record);
        }
        VariantBatchItem {
            clustered_variant: item.clustered_variant,
            submitted_variants: submitted,
            operations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::types::{Accession, EventType, SubmittedVariant, SubmittedVariantRecord};

    fn record(alleles_match: bool, link: Option<u64>) -> SubmittedVariantRecord {
        let mut variant = SubmittedVariant::new(
            "GCA_000002305.1",
            9796,
            "PRJEB1234",
            "NW_001868106.1",
            124459,
            "A",
            "C",
            link.map(Accession),
        )
        .unwrap();
        variant.alleles_match = alleles_match;
        SubmittedVariantRecord::new(Accession(15), variant)
    }

    #[test]
    fn test_matching_alleles_pass_through() {
        let (result, operation) = DeclusterProcessor::new().decluster(record(true, Some(12)));
        assert_eq!(result.clustered_link(), Some(Accession(12)));
        assert!(operation.is_none());
    }

    #[test]
    fn test_mismatching_alleles_are_detached() {
        let (result, operation) = DeclusterProcessor::new().decluster(record(false, Some(12)));
        assert_eq!(result.clustered_link(), None);

        let operation = operation.unwrap();
        assert_eq!(operation.event, EventType::Updated);
        assert_eq!(operation.accession, Accession(15));
        assert_eq!(operation.inactive.len(), 1);
        // the snapshot preserves the link that was removed
        assert_eq!(operation.inactive[0].clustered_link(), Some(Accession(12)));
    }

    #[test]
    fn test_unlinked_record_is_left_alone() {
        let (result, operation) = DeclusterProcessor::new().decluster(record(false, None));
        assert_eq!(result.clustered_link(), None);
        assert!(operation.is_none());
    }
}
