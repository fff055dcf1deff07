//! Deterministic identity summaries.
//!
//! Each entity kind reduces to a canonical summary string of its identity
//! fields, which is then hashed to produce the content fingerprint used for
//! deduplication. Attributes (links, flags, timestamps) never appear in a
//! summary, so records that differ only in attributes collide on hash.

use crate::types::{ClusteredVariant, SubmittedVariant, VariantHash};

const FIELD_SEPARATOR: char = '_';

/// Canonical summary of a clustered variant's identity
pub fn summarize_clustered(variant: &ClusteredVariant) -> String {
    let mut summary = String::new();
    push_field(&mut summary, &variant.assembly_accession);
    push_field(&mut summary, &variant.taxonomy_accession.to_string());
    push_field(&mut summary, &variant.contig);
    push_field(&mut summary, &variant.start.to_string());
    push_field(&mut summary, variant.variant_type.as_str());
    summary
}

/// Canonical summary of a submitted variant's identity
pub fn summarize_submitted(variant: &SubmittedVariant) -> String {
    let mut summary = String::new();
    push_field(&mut summary, &variant.assembly_accession);
    push_field(&mut summary, &variant.taxonomy_accession.to_string());
    push_field(&mut summary, &variant.project_accession);
    push_field(&mut summary, &variant.contig);
    push_field(&mut summary, &variant.start.to_string());
    push_field(&mut summary, &variant.reference_allele);
    push_field(&mut summary, &variant.alternate_allele);
    summary
}

/// Content hash of a clustered variant
pub fn hash_clustered(variant: &ClusteredVariant) -> VariantHash {
    VariantHash::compute(summarize_clustered(variant).as_bytes())
}

/// Content hash of a submitted variant
pub fn hash_submitted(variant: &SubmittedVariant) -> VariantHash {
    VariantHash::compute(summarize_submitted(variant).as_bytes())
}

fn push_field(summary: &mut String, field: &str) {
    if !summary.is_empty() {
        summary.push(FIELD_SEPARATOR);
    }
    summary.push_str(field);
}
