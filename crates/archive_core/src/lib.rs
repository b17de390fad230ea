//! # Archive Core
//!
//! Fixed-capacity, append-only record archive with integrity checking.
//!
//! This crate provides:
//! - Fixed-size envelopes with an explicit little-endian byte layout
//! - Sequential writes into a bounded region
//! - Checksum verification on every read
//! - Usage accounting, statistics, and whole-archive verification
//! - A lock-guarded handle for sharing a store between threads
//!
//! ## Example
//!
//! ```rust
//! use archive_core::{ArchiveError, ArchiveStore, RecordId, RecordIndex};
//!
//! let mut store = ArchiveStore::new();
//! store.write_record(RecordId::new(0xAA), &[0x12, 0x34, 0x56]).unwrap();
//!
//! let envelope = store.read_record(RecordIndex::new(0)).unwrap();
//! assert_eq!(envelope.data(), &[0x12, 0x34, 0x56]);
//!
//! assert!(matches!(
//!     store.read_record(RecordIndex::new(1)),
//!     Err(ArchiveError::NotFound { .. })
//! ));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod checksum;
mod config;
mod envelope;
mod error;
#[cfg(any(test, feature = "fault-injection"))]
mod fault;
mod scan;
mod shared;
mod stats;
mod store;
mod types;

pub use checksum::{Checksum, ChecksumKind, Crc16, XorChecksum};
pub use config::{ArchiveConfig, DEFAULT_CAPACITY};
pub use envelope::{
    Envelope, TagScope, ENVELOPE_SIZE, LENGTH_OFFSET, MAX_PAYLOAD, PAYLOAD_OFFSET,
    RECORD_ID_OFFSET, TAG_OFFSET,
};
pub use error::{ArchiveError, ArchiveResult, Status};
#[cfg(any(test, feature = "fault-injection"))]
pub use fault::FaultInjection;
pub use scan::{CorruptRecord, Records, VerifyReport};
pub use shared::SharedArchive;
pub use stats::{ArchiveStats, StatsSnapshot, Usage};
pub use store::ArchiveStore;
pub use types::{RecordId, RecordIndex, StoreState};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
