//! Running totals for external reporting

use std::sync::atomic::{AtomicU64, Ordering};

/// Totals of variants and operations written across all batches of a job.
///
/// Shared (via `Arc`) between the reconciler and the surrounding job's
/// progress reporting; archive inserts are deliberately not counted as
/// written clustered variants.
#[derive(Debug, Default)]
pub struct ImportCounts {
    clustered_variants_written: AtomicU64,
    submitted_variants_written: AtomicU64,
    operations_written: AtomicU64,
}

impl ImportCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_clustered_variants(&self, count: u64) {
        self.clustered_variants_written
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_submitted_variants(&self, count: u64) {
        self.submitted_variants_written
            .fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_operations(&self, count: u64) {
        self.operations_written.fetch_add(count, Ordering::Relaxed);
    }

    pub fn clustered_variants_written(&self) -> u64 {
        self.clustered_variants_written.load(Ordering::Relaxed)
    }

    pub fn submitted_variants_written(&self) -> u64 {
        self.submitted_variants_written.load(Ordering::Relaxed)
    }

    pub fn operations_written(&self) -> u64 {
        self.operations_written.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let counts = ImportCounts::new();
        counts.add_clustered_variants(2);
        counts.add_clustered_variants(1);
        counts.add_submitted_variants(5);
        counts.add_operations(3);

        assert_eq!(counts.clustered_variants_written(), 3);
        assert_eq!(counts.submitted_variants_written(), 5);
        assert_eq!(counts.operations_written(), 3);
    }
}
