//! Archive statistics and usage reporting.
//!
//! # Usage
//!
//! ```rust
//! use archive_core::{ArchiveStore, RecordId, RecordIndex};
//!
//! let mut store = ArchiveStore::new();
//! store.write_record(RecordId::new(1), &[0x12, 0x34]).unwrap();
//! store.read_record(RecordIndex::new(0)).unwrap();
//!
//! let stats = store.stats();
//! assert_eq!(stats.writes, 1);
//! assert_eq!(stats.reads, 1);
//!
//! let usage = store.usage_report();
//! assert_eq!(usage.records, 1);
//! assert_eq!(usage.used_bytes, 134);
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Operation counters for one store.
///
/// Counters are atomic so they can be bumped from `&self` read paths. They
/// cover the lifetime of the store value and survive `initialize`.
#[derive(Debug, Default)]
pub struct ArchiveStats {
    /// Successful writes.
    writes: AtomicU64,
    /// Successful reads.
    reads: AtomicU64,
    /// Writes rejected for lack of capacity.
    full_rejections: AtomicU64,
    /// Calls rejected for bad arguments.
    invalid_parameters: AtomicU64,
    /// Reads past the write frontier.
    not_found: AtomicU64,
    /// Reads that detected corruption.
    integrity_failures: AtomicU64,
    /// Envelope bytes written.
    bytes_written: AtomicU64,
    /// Calls to `initialize`.
    initializations: AtomicU64,
}

impl ArchiveStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_write(&self, bytes: u64) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_full(&self) {
        self.full_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_invalid_parameter(&self) {
        self.invalid_parameters.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_integrity_failure(&self) {
        self.integrity_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_initialize(&self) {
        self.initializations.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a snapshot of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            writes: self.writes.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
            full_rejections: self.full_rejections.load(Ordering::Relaxed),
            invalid_parameters: self.invalid_parameters.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            integrity_failures: self.integrity_failures.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            initializations: self.initializations.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`ArchiveStats`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    /// Successful writes.
    pub writes: u64,
    /// Successful reads.
    pub reads: u64,
    /// Writes rejected for lack of capacity.
    pub full_rejections: u64,
    /// Calls rejected for bad arguments.
    pub invalid_parameters: u64,
    /// Reads past the write frontier.
    pub not_found: u64,
    /// Reads that detected corruption.
    pub integrity_failures: u64,
    /// Envelope bytes written.
    pub bytes_written: u64,
    /// Calls to `initialize`.
    pub initializations: u64,
}

/// Space accounting for one store at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Usage {
    /// Bytes consumed (the cursor).
    pub used_bytes: u64,
    /// Region capacity in bytes.
    pub capacity_bytes: u64,
    /// Records written.
    pub records: u32,
    /// Records that fit in an empty region.
    pub max_records: u32,
}

impl Usage {
    /// Records that can still be written.
    #[must_use]
    pub fn remaining_records(&self) -> u32 {
        self.max_records - self.records
    }

    /// Fraction of the region consumed, in `0.0..=1.0`.
    #[must_use]
    pub fn fill_ratio(&self) -> f64 {
        if self.capacity_bytes == 0 {
            return 0.0;
        }
        self.used_bytes as f64 / self.capacity_bytes as f64
    }
}
