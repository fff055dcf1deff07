//! Core error types for Cairn

use thiserror::Error;

/// Main error type for Cairn operations
#[derive(Error, Debug)]
pub enum CairnError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A batch resolved one content hash to two different surviving
    /// accessions. The batch must be aborted: picking a side silently would
    /// corrupt merge provenance.
    #[error("Reconciliation invariant violated: {0}")]
    Reconciliation(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for Cairn operations
pub type CairnResult<T> = Result<T, CairnError>;

// Conversion implementations for common error types
impl From<serde_json::Error> for CairnError {
    fn from(err: serde_json::Error) -> Self {
        CairnError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CairnError {
    fn from(err: toml::de::Error) -> Self {
        CairnError::Configuration(err.to_string())
    }
}

impl From<toml::ser::Error> for CairnError {
    fn from(err: toml::ser::Error) -> Self {
        CairnError::Configuration(err.to_string())
    }
}

impl From<anyhow::Error> for CairnError {
    fn from(err: anyhow::Error) -> Self {
        CairnError::Other(err.to_string())
    }
}
