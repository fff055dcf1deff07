/// Core types shared across all Cairn modules
pub mod accession;
pub mod clustered;
pub mod hash;
pub mod operation;
pub mod record;
pub mod submitted;

// Re-export commonly used types at module level
pub use accession::Accession;
pub use clustered::{ClusteredVariant, VariantType};
pub use hash::VariantHash;
pub use operation::{
    ClusteredVariantOperation, EventType, OperationKey, SubmittedVariantOperation,
    VariantOperation,
};
pub use record::{ClusteredVariantRecord, SubmittedVariantRecord};
pub use submitted::SubmittedVariant;
