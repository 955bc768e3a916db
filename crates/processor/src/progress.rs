use netweather_models::ProgressSnapshot;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free run counters shared by the workers.
///
/// Snapshots read each counter independently, so they are only consistent
/// once the run is over.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    total: u64,
    processed: AtomicU64,
    scanned: AtomicU64,
    excluded: AtomicU64,
    skipped: AtomicU64,
    errored: AtomicU64,
}

impl ProgressTracker {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn increment_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_scanned(&self) {
        self.scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_excluded(&self) {
        self.excluded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errored(&self) {
        self.errored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            total: self.total,
            processed: self.processed.load(Ordering::Relaxed),
            scanned: self.scanned.load(Ordering::Relaxed),
            excluded: self.excluded.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            errored: self.errored.load(Ordering::Relaxed),
        }
    }
}
