//! Thread-safe handle to a store.

use crate::config::ArchiveConfig;
use crate::envelope::Envelope;
use crate::error::ArchiveResult;
use crate::scan::VerifyReport;
use crate::stats::{StatsSnapshot, Usage};
use crate::store::ArchiveStore;
use crate::types::{RecordId, RecordIndex};
use parking_lot::RwLock;
use std::sync::Arc;

/// A cloneable, lock-guarded [`ArchiveStore`].
///
/// Writers are serialized against each other and against readers, so a
/// reader never observes a half-written envelope. Any number of readers may
/// run at once.
///
/// # Example
///
/// ```rust
/// use archive_core::{RecordId, RecordIndex, SharedArchive};
/// use std::thread;
///
/// let archive = SharedArchive::new();
/// let writer = archive.clone();
/// thread::spawn(move || writer.write_record(RecordId::new(1), b"hk").unwrap())
///     .join()
///     .unwrap();
///
/// assert_eq!(archive.read_record(RecordIndex::new(0)).unwrap().data(), b"hk");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedArchive {
    inner: Arc<RwLock<ArchiveStore>>,
}

impl SharedArchive {
    /// Creates a shared store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_store(ArchiveStore::new())
    }

    /// Creates a shared store from a configuration.
    ///
    /// # Errors
    ///
    /// See [`ArchiveStore::with_config`].
    pub fn with_config(config: ArchiveConfig) -> ArchiveResult<Self> {
        ArchiveStore::with_config(config).map(Self::from_store)
    }

    /// Wraps an existing store.
    #[must_use]
    pub fn from_store(store: ArchiveStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// See [`ArchiveStore::initialize`].
    pub fn initialize(&self) {
        self.inner.write().initialize();
    }

    /// See [`ArchiveStore::write_record`].
    ///
    /// # Errors
    ///
    /// As for [`ArchiveStore::write_record`].
    pub fn write_record(&self, id: RecordId, data: &[u8]) -> ArchiveResult<RecordIndex> {
        self.inner.write().write_record(id, data)
    }

    /// See [`ArchiveStore::read_record`].
    ///
    /// # Errors
    ///
    /// As for [`ArchiveStore::read_record`].
    pub fn read_record(&self, index: RecordIndex) -> ArchiveResult<Envelope> {
        self.inner.read().read_record(index)
    }

    /// See [`ArchiveStore::usage`].
    #[must_use]
    pub fn usage(&self) -> u64 {
        self.inner.read().usage()
    }

    /// See [`ArchiveStore::usage_report`].
    #[must_use]
    pub fn usage_report(&self) -> Usage {
        self.inner.read().usage_report()
    }

    /// See [`ArchiveStore::verify`].
    #[must_use]
    pub fn verify(&self) -> VerifyReport {
        self.inner.read().verify()
    }

    /// See [`ArchiveStore::stats`].
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.read().stats()
    }

    /// Runs `f` with shared access to the store.
    pub fn with_read<T>(&self, f: impl FnOnce(&ArchiveStore) -> T) -> T {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access to the store.
    ///
    /// Use this to make several operations atomic with respect to other
    /// handles.
    pub fn with_write<T>(&self, f: impl FnOnce(&mut ArchiveStore) -> T) -> T {
        f(&mut self.inner.write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArchiveError;
    use std::thread;

    #[test]
    fn concurrent_writers_fill_exactly() {
        let archive = SharedArchive::new();
        let mut handles = vec![];

        for t in 0..4u16 {
            let a = archive.clone();
            handles.push(thread::spawn(move || {
                let mut written = 0u32;
                for i in 0..20u16 {
                    match a.write_record(RecordId::new(t * 100 + i), &[t as u8; 16]) {
                        Ok(_) => written += 1,
                        Err(ArchiveError::Full { .. }) => {}
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
                written
            }));
        }

        let total: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 30);
        assert_eq!(archive.usage(), 30 * 134);
        assert!(archive.verify().is_ok());
    }

    #[test]
    fn readers_see_complete_records() {
        let archive = SharedArchive::new();
        let writer = archive.clone();

        let handle = thread::spawn(move || {
            for i in 0..30u16 {
                writer.write_record(RecordId::new(i), &[0xA5; 64]).unwrap();
            }
        });

        for _ in 0..200 {
            let count = archive.usage_report().records;
            for i in 0..count {
                let env = archive.read_record(RecordIndex::new(i)).unwrap();
                assert_eq!(env.data(), &[0xA5; 64]);
            }
        }
        handle.join().unwrap();
    }

    #[test]
    fn with_write_batches_operations() {
        let archive = SharedArchive::new();
        let indices = archive.with_write(|store| {
            let a = store.write_record(RecordId::new(1), b"a").unwrap();
            let b = store.write_record(RecordId::new(2), b"b").unwrap();
            (a, b)
        });
        assert_eq!(indices, (RecordIndex::new(0), RecordIndex::new(1)));
        assert_eq!(archive.with_read(|s| s.record_count()), 2);

        archive.initialize();
        assert_eq!(archive.usage(), 0);
    }
}
