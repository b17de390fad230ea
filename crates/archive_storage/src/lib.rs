//! # Archive Storage
//!
//! Fixed-capacity byte regions for the record archive.
//!
//! This crate provides the lowest-level storage abstraction of the archive.
//! A region is an **opaque, bounded byte area** - it does not interpret the
//! bytes it holds.
//!
//! ## Design Principles
//!
//! - Regions have a capacity fixed at construction and never grow
//! - Reads and writes are positional and bounds-checked
//! - No knowledge of envelopes, checksums, or cursors
//! - Must be `Send + Sync` so a store can sit behind a lock
//!
//! ## Available Backends
//!
//! - [`InMemoryRegion`] - Volatile region simulating non-volatile memory
//!
//! ## Example
//!
//! ```rust
//! use archive_storage::{InMemoryRegion, RegionBackend};
//!
//! let mut region = InMemoryRegion::new(64);
//! region.write_at(8, b"hello").unwrap();
//! assert_eq!(region.read_at(8, 5).unwrap(), b"hello");
//! assert_eq!(region.capacity(), 64);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod memory;

pub use backend::RegionBackend;
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryRegion;
