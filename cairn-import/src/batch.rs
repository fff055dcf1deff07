//! Batch input model.
//!
//! One batch item groups a clustered variant with the submitted variants
//! reported against it, plus any decluster operations precomputed for those
//! submitted variants. The reconciliation engine consumes an ordered list of
//! items and treats the order as authoritative for survivor selection.

use cairn_core::types::{
    ClusteredVariantRecord, SubmittedVariantOperation, SubmittedVariantRecord,
};
use cairn_core::CairnResult;

#[derive(Debug, Clone)]
pub struct VariantBatchItem {
    pub clustered_variant: ClusteredVariantRecord,
    pub submitted_variants: Vec<SubmittedVariantRecord>,
    /// Decluster updates produced upstream for this item's submitted variants
    pub operations: Vec<SubmittedVariantOperation>,
}

impl VariantBatchItem {
    pub fn new(
        clustered_variant: ClusteredVariantRecord,
        submitted_variants: Vec<SubmittedVariantRecord>,
    ) -> Self {
        Self {
            clustered_variant,
            submitted_variants,
            operations: Vec::new(),
        }
    }

    pub fn with_operations(mut self, operations: Vec<SubmittedVariantOperation>) -> Self {
        self.operations = operations;
        self
    }

    /// Reject items containing a record with a missing identity field.
    ///
    /// Validation failures surface before the engine runs; the engine itself
    /// assumes well-formed input.
    pub fn validate(&self) -> CairnResult<()> {
        self.clustered_variant.variant.validate()?;
        for submitted in &self.submitted_variants {
            submitted.variant.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::types::{Accession, ClusteredVariant, SubmittedVariant, VariantType};

    #[test]
    fn test_malformed_member_is_rejected() {
        let clustered = ClusteredVariantRecord::new(
            Accession(12),
            ClusteredVariant::new("GCA_000002305.1", 9796, "NW_001868106.1", 100, VariantType::Snv, false)
                .unwrap(),
        );
        let mut submitted = SubmittedVariant::new(
            "GCA_000002305.1",
            9796,
            "PRJEB1234",
            "NW_001868106.1",
            100,
            "A",
            "C",
            Some(Accession(12)),
        )
        .unwrap();
        submitted.contig = String::new();

        let item = VariantBatchItem::new(
            clustered,
            vec![SubmittedVariantRecord::new(Accession(15), submitted)],
        );
        assert!(item.validate().is_err());
    }
}
