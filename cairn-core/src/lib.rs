//! Core types and utilities shared across all Cairn crates

pub mod config;
pub mod error;
pub mod logging;
pub mod summary;
pub mod types;

// Re-export commonly used types
pub use config::{load_config, save_config, Config};
pub use error::{CairnError, CairnResult};

pub use types::{
    Accession, ClusteredVariant, ClusteredVariantOperation, ClusteredVariantRecord, EventType,
    OperationKey, SubmittedVariant, SubmittedVariantOperation, SubmittedVariantRecord, VariantHash,
    VariantOperation, VariantType,
};

/// Version information for the Cairn project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
