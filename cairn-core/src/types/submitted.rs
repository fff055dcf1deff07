//! Submitted (submission-level) variant model

use crate::error::{CairnError, CairnResult};
use crate::types::Accession;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default attribute flags for submitted variants arriving without explicit
/// values, matching the archive's conventions.
pub const DEFAULT_SUPPORTED_BY_EVIDENCE: bool = true;
pub const DEFAULT_ASSEMBLY_MATCH: bool = true;
pub const DEFAULT_ALLELES_MATCH: bool = true;
pub const DEFAULT_VALIDATED: bool = false;

/// One submitter's report of a variant at a site.
///
/// Identity is (assembly, taxonomy, project, contig, start, reference allele,
/// alternate allele). The clustered-variant link is an attribute, not part of
/// the identity: two submitted variants differing only in which clustered
/// variant they point to collide on hash and are dedup candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedVariant {
    pub assembly_accession: String,
    pub taxonomy_accession: u32,
    pub project_accession: String,
    pub contig: String,
    pub start: u64,
    pub reference_allele: String,
    pub alternate_allele: String,
    /// Link to a clustered variant; `None` means not linked / declustered
    pub clustered_variant_accession: Option<Accession>,
    pub supported_by_evidence: bool,
    pub assembly_match: bool,
    pub alleles_match: bool,
    pub validated: bool,
    /// Set once at first persistence, immutable afterwards
    pub created_date: Option<DateTime<Utc>>,
}

impl SubmittedVariant {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        assembly_accession: impl Into<String>,
        taxonomy_accession: u32,
        project_accession: impl Into<String>,
        contig: impl Into<String>,
        start: u64,
        reference_allele: impl Into<String>,
        alternate_allele: impl Into<String>,
        clustered_variant_accession: Option<Accession>,
    ) -> CairnResult<Self> {
        let variant = Self {
            assembly_accession: assembly_accession.into(),
            taxonomy_accession,
            project_accession: project_accession.into(),
            contig: contig.into(),
            start,
            reference_allele: reference_allele.into(),
            alternate_allele: alternate_allele.into(),
            clustered_variant_accession,
            supported_by_evidence: DEFAULT_SUPPORTED_BY_EVIDENCE,
            assembly_match: DEFAULT_ASSEMBLY_MATCH,
            alleles_match: DEFAULT_ALLELES_MATCH,
            validated: DEFAULT_VALIDATED,
            created_date: None,
        };
        variant.validate()?;
        Ok(variant)
    }

    /// Reject records missing a required identity field.
    ///
    /// Alleles may legitimately be empty strings (context-trimmed
    /// insertions/deletions), so only the naming fields are checked.
    pub fn validate(&self) -> CairnResult<()> {
        if self.assembly_accession.is_empty() {
            return Err(CairnError::InvalidInput(
                "assembly accession is required".to_string(),
            ));
        }
        if self.project_accession.is_empty() {
            return Err(CairnError::InvalidInput(
                "project accession is required".to_string(),
            ));
        }
        if self.contig.is_empty() {
            return Err(CairnError::InvalidInput("contig is required".to_string()));
        }
        Ok(())
    }
}
