//! Accession reconciliation for bulk variant imports.
//!
//! The importer receives batches of accessioned variant records from the
//! upstream archive and reconciles them against the active collections:
//! deduplicating by content hash, merging duplicate accessions with an audit
//! trail, repairing clustered-variant cross-references, and routing
//! clustered variants that lost every allele-consistent member into the
//! declustered archive.

pub mod batch;
pub mod context;
pub mod counts;
pub mod decluster;
pub mod reconciler;

pub use batch::VariantBatchItem;
pub use counts::ImportCounts;
pub use decluster::{DeclusterProcessor, DECLUSTERED_REASON};
pub use reconciler::{LinkPatch, ReconcileOutcome, VariantReconciler, WriteCounts};
