//! Shared fixtures for reconciliation scenario tests

use cairn_core::types::{
    Accession, ClusteredVariant, ClusteredVariantRecord, SubmittedVariant, SubmittedVariantRecord,
    VariantType,
};
use cairn_import::{ImportCounts, VariantBatchItem, VariantReconciler};
use cairn_storage::{
    InMemoryClusteredCollection, InMemoryOperationLog, InMemorySubmittedCollection,
};
use std::sync::Arc;

pub const TAXONOMY_1: u32 = 3880;
pub const TAXONOMY_2: u32 = 3882;

pub const START_1: u64 = 100;
pub const START_2: u64 = 200;

/// Accession of the clustered variant used by `simple_item`
pub const SITE_ACCESSION: u64 = 10_000_000_000;

pub const CLUSTERED_ACCESSION_1: u64 = 12;
pub const CLUSTERED_ACCESSION_2: u64 = 13;
pub const CLUSTERED_ACCESSION_3: u64 = 14;

pub const SUBMITTED_ACCESSION_1: u64 = 15;
pub const SUBMITTED_ACCESSION_2: u64 = 16;
pub const SUBMITTED_ACCESSION_3: u64 = 17;

pub const PROJECT_1: &str = "project_1";
pub const PROJECT_2: &str = "project_2";

pub type TestReconciler = VariantReconciler<
    Arc<InMemoryClusteredCollection>,
    Arc<InMemorySubmittedCollection>,
    Arc<InMemoryClusteredCollection>,
    Arc<InMemoryOperationLog<ClusteredVariantRecord>>,
    Arc<InMemoryOperationLog<SubmittedVariantRecord>>,
>;

/// In-memory collections, logs and counters wired into a reconciler
pub struct Harness {
    pub active_clustered: Arc<InMemoryClusteredCollection>,
    pub active_submitted: Arc<InMemorySubmittedCollection>,
    pub archive: Arc<InMemoryClusteredCollection>,
    pub clustered_log: Arc<InMemoryOperationLog<ClusteredVariantRecord>>,
    pub submitted_log: Arc<InMemoryOperationLog<SubmittedVariantRecord>>,
    pub counts: Arc<ImportCounts>,
    pub reconciler: TestReconciler,
}

impl Harness {
    pub fn new() -> Self {
        cairn_core::logging::init("warn");

        let active_clustered = Arc::new(InMemoryClusteredCollection::new());
        let active_submitted = Arc::new(InMemorySubmittedCollection::new());
        let archive = Arc::new(InMemoryClusteredCollection::new());
        let clustered_log = Arc::new(InMemoryOperationLog::new());
        let submitted_log = Arc::new(InMemoryOperationLog::new());
        let counts = Arc::new(ImportCounts::new());

        let reconciler = VariantReconciler::new(
            Arc::clone(&active_clustered),
            Arc::clone(&active_submitted),
            Arc::clone(&archive),
            Arc::clone(&clustered_log),
            Arc::clone(&submitted_log),
            Arc::clone(&counts),
        );

        Self {
            active_clustered,
            active_submitted,
            archive,
            clustered_log,
            submitted_log,
            counts,
            reconciler,
        }
    }
}

pub fn submitted_variant(
    taxonomy: u32,
    project: &str,
    start: u64,
    alternate: &str,
    link: Option<u64>,
) -> SubmittedVariant {
    SubmittedVariant::new(
        "assembly",
        taxonomy,
        project,
        "contig",
        start,
        "reference",
        alternate,
        link.map(Accession),
    )
    .unwrap()
}

pub fn submitted_record(accession: u64, variant: SubmittedVariant) -> SubmittedVariantRecord {
    SubmittedVariantRecord::new(Accession(accession), variant)
}

/// The default submitted variant of the original import fixtures: taxonomy
/// 3880, project_1, start 100, linked to clustered accession 12
pub fn default_submitted_record(accession: u64) -> SubmittedVariantRecord {
    submitted_record(
        accession,
        submitted_variant(
            TAXONOMY_1,
            PROJECT_1,
            START_1,
            "alternate",
            Some(CLUSTERED_ACCESSION_1),
        ),
    )
}

pub fn clustered_record(accession: u64, start: u64) -> ClusteredVariantRecord {
    let variant =
        ClusteredVariant::new("assembly", TAXONOMY_1, "contig", start, VariantType::Snv, false)
            .unwrap();
    ClusteredVariantRecord::new(Accession(accession), variant)
}

/// One batch item at the default site, clustered accession `SITE_ACCESSION`
pub fn simple_item(submitted: Vec<SubmittedVariantRecord>) -> VariantBatchItem {
    VariantBatchItem::new(clustered_record(SITE_ACCESSION, START_1), submitted)
}

/// Flip the alleles-match flag off; the hash is unaffected since flags are
/// not identity fields
pub fn mismatching(mut record: SubmittedVariantRecord) -> SubmittedVariantRecord {
    record.variant.alleles_match = false;
    record
}
