//! Test fixtures and store helpers.
//!
//! Provides convenience constructors for stores in common test states.

use archive_core::{ArchiveConfig, ArchiveStore, ChecksumKind, RecordId, TagScope, MAX_PAYLOAD};

/// A store prepared for a test.
///
/// Derefs to [`ArchiveStore`], so every store operation and the
/// [`archive_core::FaultInjection`] hooks are available directly.
#[derive(Debug)]
pub struct TestArchive {
    /// The store instance.
    pub store: ArchiveStore,
}

impl TestArchive {
    /// Creates an empty store with the given configuration.
    pub fn with_config(config: ArchiveConfig) -> Self {
        Self {
            store: ArchiveStore::with_config(config).expect("Invalid test configuration"),
        }
    }

    /// Creates an empty store with the default configuration.
    pub fn new() -> Self {
        Self {
            store: ArchiveStore::new(),
        }
    }

    /// Creates an empty store sealing with [`archive_core::XorChecksum`].
    pub fn xor() -> Self {
        Self::with_config(ArchiveConfig::new().checksum(ChecksumKind::Xor))
    }

    /// Creates an empty store whose tags cover whole envelopes.
    pub fn envelope_scope() -> Self {
        Self::with_config(ArchiveConfig::new().tag_scope(TagScope::Envelope))
    }

    /// Creates a default store filled to capacity.
    ///
    /// Record `i` has id `i` and a payload of `payload_len` bytes produced by
    /// [`sample_payload`].
    pub fn filled(payload_len: usize) -> Self {
        let mut archive = Self::new();
        fill(&mut archive.store, payload_len);
        archive
    }
}

impl Default for TestArchive {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestArchive {
    type Target = ArchiveStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl std::ops::DerefMut for TestArchive {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

/// Writes records until the store reports no room left.
///
/// Returns the number of records written.
pub fn fill(store: &mut ArchiveStore, payload_len: usize) -> u32 {
    let mut written = 0;
    while store.remaining_records() > 0 {
        let id = RecordId::new(store.record_count() as u16);
        store
            .write_record(id, &sample_payload(payload_len, id.as_u16()))
            .expect("Failed to fill archive");
        written += 1;
    }
    written
}

/// Deterministic payload of `len` bytes (capped at [`MAX_PAYLOAD`]).
///
/// Different seeds give different contents.
pub fn sample_payload(len: usize, seed: u16) -> Vec<u8> {
    (0..len.min(MAX_PAYLOAD))
        .map(|i| (i as u16).wrapping_mul(31).wrapping_add(seed) as u8)
        .collect()
}

/// Runs a test with a fresh default store.
///
/// # Example
///
/// ```rust
/// use archive_testkit::with_archive;
/// use archive_core::RecordId;
///
/// with_archive(|store| {
///     store.write_record(RecordId::new(1), b"hk").unwrap();
///     assert_eq!(store.usage(), 134);
/// });
/// ```
pub fn with_archive<F, T>(f: F) -> T
where
    F: FnOnce(&mut ArchiveStore) -> T,
{
    let mut archive = TestArchive::new();
    f(&mut archive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use archive_core::RecordIndex;

    #[test]
    fn filled_store_is_at_capacity() {
        let archive = TestArchive::filled(10);
        assert_eq!(archive.record_count(), 30);
        assert_eq!(archive.remaining_records(), 0);
        assert_eq!(archive.usage(), 30 * 134);
    }

    #[test]
    fn filled_records_are_readable() {
        let archive = TestArchive::filled(MAX_PAYLOAD);
        let env = archive.read_record(RecordIndex::new(29)).unwrap();
        assert_eq!(env.record_id, RecordId::new(29));
        assert_eq!(env.data(), sample_payload(MAX_PAYLOAD, 29).as_slice());
    }

    #[test]
    fn sample_payload_is_capped_and_seeded() {
        assert_eq!(sample_payload(500, 0).len(), MAX_PAYLOAD);
        assert_ne!(sample_payload(8, 1), sample_payload(8, 2));
        assert_eq!(sample_payload(8, 3), sample_payload(8, 3));
    }

    #[test]
    fn fixture_variants() {
        assert_eq!(TestArchive::xor().checksum_name(), "xor");
        assert_eq!(
            TestArchive::envelope_scope().config().tag_scope,
            TagScope::Envelope
        );
    }
}
