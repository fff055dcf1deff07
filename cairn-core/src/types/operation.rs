//! Operation-log history entries.
//!
//! Every change that supersedes record state is recorded as an operation:
//! `Merged` when a duplicate accession is absorbed into the canonical one,
//! `Updated` when a field of an active record changes (most commonly its
//! clustered-variant link). Operations carry the superseded state as
//! inactive snapshots and are never mutated or deleted once appended.

use crate::types::{Accession, ClusteredVariantRecord, SubmittedVariantRecord, VariantHash};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Merged,
    Updated,
}

/// Superseded record state captured inside an operation
pub trait InactiveSnapshot {
    fn snapshot_hash(&self) -> VariantHash;
    /// Clustered link held at snapshot time, for entities that carry one
    fn snapshot_link(&self) -> Option<Accession>;
}

impl InactiveSnapshot for ClusteredVariantRecord {
    fn snapshot_hash(&self) -> VariantHash {
        self.hash
    }

    fn snapshot_link(&self) -> Option<Accession> {
        None
    }
}

impl InactiveSnapshot for SubmittedVariantRecord {
    fn snapshot_hash(&self) -> VariantHash {
        self.hash
    }

    fn snapshot_link(&self) -> Option<Accession> {
        self.clustered_link()
    }
}

/// One entry in the append-only history of an entity kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantOperation<S> {
    pub event: EventType,
    /// The accession this operation affects (the losing accession for a
    /// merge, the updated accession for an update)
    pub accession: Accession,
    /// The surviving accession, for merges
    pub merged_into: Option<Accession>,
    pub reason: String,
    /// Snapshots of the superseded state
    pub inactive: Vec<S>,
    pub created_date: DateTime<Utc>,
}

pub type ClusteredVariantOperation = VariantOperation<ClusteredVariantRecord>;
pub type SubmittedVariantOperation = VariantOperation<SubmittedVariantRecord>;

impl<S: InactiveSnapshot> VariantOperation<S> {
    /// A duplicate accession absorbed into the canonical one
    pub fn merged(
        accession: Accession,
        merged_into: Accession,
        reason: impl Into<String>,
        inactive: Vec<S>,
    ) -> Self {
        Self {
            event: EventType::Merged,
            accession,
            merged_into: Some(merged_into),
            reason: reason.into(),
            inactive,
            created_date: Utc::now(),
        }
    }

    /// A field of an active record changed
    pub fn updated(accession: Accession, reason: impl Into<String>, inactive: Vec<S>) -> Self {
        Self {
            event: EventType::Updated,
            accession,
            merged_into: None,
            reason: reason.into(),
            inactive,
            created_date: Utc::now(),
        }
    }

    /// Identity under which duplicate appends are suppressed.
    ///
    /// Two operations with the same key describe the same resulting state:
    /// appending both would double-record one event.
    pub fn key(&self) -> OperationKey {
        OperationKey {
            event: self.event,
            accession: self.accession,
            merged_into: self.merged_into,
            inactive: self
                .inactive
                .iter()
                .map(|s| (s.snapshot_hash(), s.snapshot_link()))
                .collect(),
        }
    }
}

/// Dedup identity of an operation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationKey {
    pub event: EventType,
    pub accession: Accession,
    pub merged_into: Option<Accession>,
    pub inactive: Vec<(VariantHash, Option<Accession>)>,
}
