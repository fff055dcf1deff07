//! Clustered (site-level) variant model

use crate::error::{CairnError, CairnResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sequence change category of a variant site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantType {
    Snv,
    Mnv,
    Ins,
    Del,
    Indel,
    TandemRepeat,
    SequenceAlteration,
}

impl VariantType {
    /// Stable label used in summaries and diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantType::Snv => "SNV",
            VariantType::Mnv => "MNV",
            VariantType::Ins => "INS",
            VariantType::Del => "DEL",
            VariantType::Indel => "INDEL",
            VariantType::TandemRepeat => "TANDEM_REPEAT",
            VariantType::SequenceAlteration => "SEQUENCE_ALTERATION",
        }
    }
}

/// A site-level variant identity shared by one or more submissions.
///
/// Identity is (assembly, taxonomy, contig, start, type); the validated flag
/// and creation timestamp are attributes and never participate in hashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteredVariant {
    pub assembly_accession: String,
    pub taxonomy_accession: u32,
    pub contig: String,
    pub start: u64,
    #[serde(rename = "type")]
    pub variant_type: VariantType,
    pub validated: bool,
    /// Set once at first persistence, immutable afterwards
    pub created_date: Option<DateTime<Utc>>,
}

impl ClusteredVariant {
    pub fn new(
        assembly_accession: impl Into<String>,
        taxonomy_accession: u32,
        contig: impl Into<String>,
        start: u64,
        variant_type: VariantType,
        validated: bool,
    ) -> CairnResult<Self> {
        let variant = Self {
            assembly_accession: assembly_accession.into(),
            taxonomy_accession,
            contig: contig.into(),
            start,
            variant_type,
            validated,
            created_date: None,
        };
        variant.validate()?;
        Ok(variant)
    }

    /// Reject records missing a required identity field
    pub fn validate(&self) -> CairnResult<()> {
        if self.assembly_accession.is_empty() {
            return Err(CairnError::InvalidInput(
                "assembly accession is required".to_string(),
            ));
        }
        if self.contig.is_empty() {
            return Err(CairnError::InvalidInput("contig is required".to_string()));
        }
        Ok(())
    }
}
