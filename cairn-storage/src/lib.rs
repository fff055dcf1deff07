//! Store adapters for Cairn collections and operation logs.
//!
//! The reconciliation engine only speaks to the traits in this crate; the
//! in-memory backends here back tests and dry runs, and a document-store
//! backend can implement the same traits without touching the engine.

pub mod collection;
pub mod memory;
pub mod operations;

pub use collection::{StoredRecord, SubmittedVariantCollection, VariantCollection};
pub use memory::{
    InMemoryClusteredCollection, InMemoryOperationLog, InMemorySubmittedCollection,
};
pub use operations::OperationLog;
