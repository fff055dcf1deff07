/// Accession identifier type
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable numeric identifier assigned to a canonical variant identity.
///
/// Accessions are opaque and pre-assigned by the upstream archive; Cairn
/// never generates them, it only reconciles which accession survives for a
/// given content hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Accession(pub u64);

impl Accession {
    /// Create a new accession
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Accession {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<Accession> for u64 {
    fn from(accession: Accession) -> Self {
        accession.0
    }
}
