//! # Archive Testkit
//!
//! Test utilities for the record archive.
//!
//! This crate provides:
//! - Test fixtures and store helpers
//! - Record-relative fault injection
//! - Property-based test generators using proptest
//! - Golden byte-layout vectors
//! - Fuzz and stress harnesses
//!
//! ## Usage
//!
//! ```rust
//! use archive_testkit::prelude::*;
//!
//! let mut archive = TestArchive::filled(10);
//! corrupt_payload_byte(&mut archive, RecordIndex::new(0), 0);
//! assert!(archive.read_record(RecordIndex::new(0)).is_err());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod faults;
pub mod fixtures;
pub mod fuzz;
pub mod generators;
pub mod stress;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::faults::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use archive_core::{
        ArchiveConfig, ArchiveError, ArchiveStore, ChecksumKind, Envelope, FaultInjection,
        RecordId, RecordIndex, TagScope, ENVELOPE_SIZE, MAX_PAYLOAD,
    };
}

pub use faults::*;
pub use fixtures::*;
pub use fuzz::*;
pub use generators::*;
pub use stress::*;
pub use vectors::*;
