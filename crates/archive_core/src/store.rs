//! The archive store engine.

use crate::checksum::Checksum;
use crate::config::ArchiveConfig;
use crate::envelope::{Envelope, ENVELOPE_SIZE, MAX_PAYLOAD};
use crate::error::{ArchiveError, ArchiveResult};
use crate::scan::{Records, VerifyReport};
use crate::stats::{ArchiveStats, StatsSnapshot, Usage};
use crate::types::{RecordId, RecordIndex, StoreState};
use archive_storage::{InMemoryRegion, RegionBackend};
use tracing::{debug, warn};

/// A fixed-capacity, append-only record archive.
///
/// The store owns one region and one write cursor. Records are sealed into
/// fixed-size envelopes and appended in order; a record's index is its
/// position in write order.
///
/// # Invariants
///
/// - `0 <= usage() <= capacity()`, and `usage()` is a multiple of
///   [`ENVELOPE_SIZE`]
/// - The cursor only moves forward, except on [`ArchiveStore::initialize`]
/// - A rejected write leaves the region and cursor untouched
///
/// # Threading
///
/// Mutation takes `&mut self`. Wrap the store in a
/// [`crate::SharedArchive`] to share it between threads.
///
/// # Example
///
/// ```rust
/// use archive_core::{ArchiveStore, RecordId, RecordIndex};
///
/// let mut store = ArchiveStore::new();
/// let index = store.write_record(RecordId::new(0xAA), &[0x12, 0x34, 0x56]).unwrap();
/// assert_eq!(index, RecordIndex::new(0));
///
/// let envelope = store.read_record(index).unwrap();
/// assert_eq!(envelope.data(), &[0x12, 0x34, 0x56]);
/// assert_eq!(store.usage(), 134);
/// ```
pub struct ArchiveStore {
    config: ArchiveConfig,
    region: Box<dyn RegionBackend>,
    checksum: Box<dyn Checksum>,
    cursor: usize,
    stats: ArchiveStats,
}

impl ArchiveStore {
    /// Creates an empty store with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        let config = ArchiveConfig::default();
        Self {
            region: Box::new(InMemoryRegion::new(config.capacity)),
            checksum: config.checksum.build(),
            config,
            cursor: 0,
            stats: ArchiveStats::new(),
        }
    }

    /// Creates an empty store backed by an in-memory region.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidParameter`] if the capacity cannot hold
    /// a single envelope.
    pub fn with_config(config: ArchiveConfig) -> ArchiveResult<Self> {
        let checksum = config.checksum.build();
        Self::with_checksum(config, checksum)
    }

    /// Creates an empty store using a caller-supplied checksum.
    ///
    /// `config.checksum` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidParameter`] if the capacity cannot hold
    /// a single envelope.
    pub fn with_checksum(
        config: ArchiveConfig,
        checksum: Box<dyn Checksum>,
    ) -> ArchiveResult<Self> {
        validate_capacity(config.capacity)?;
        Ok(Self {
            region: Box::new(InMemoryRegion::new(config.capacity)),
            checksum,
            config,
            cursor: 0,
            stats: ArchiveStats::new(),
        })
    }

    /// Creates an empty store over an existing region.
    ///
    /// The region is wiped, and its size replaces `config.capacity`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidParameter`] if the region cannot hold
    /// a single envelope.
    pub fn with_region(
        config: ArchiveConfig,
        mut region: Box<dyn RegionBackend>,
    ) -> ArchiveResult<Self> {
        validate_capacity(region.capacity())?;
        region.zero();
        Ok(Self {
            config: ArchiveConfig {
                capacity: region.capacity(),
                ..config
            },
            checksum: config.checksum.build(),
            region,
            cursor: 0,
            stats: ArchiveStats::new(),
        })
    }

    /// Wipes the region and resets the cursor.
    ///
    /// Every previously written record is destroyed. Calling this on an
    /// empty store has no further effect.
    pub fn initialize(&mut self) {
        self.region.zero();
        self.cursor = 0;
        self.stats.record_initialize();
        debug!(capacity = self.region.capacity(), "archive initialized");
    }

    /// Appends a record and returns its index.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::InvalidParameter`] if `data` is longer than
    ///   [`MAX_PAYLOAD`]
    /// - [`ArchiveError::Full`] if another envelope does not fit
    ///
    /// Nothing changes when an error is returned.
    pub fn write_record(&mut self, id: RecordId, data: &[u8]) -> ArchiveResult<RecordIndex> {
        if data.len() > MAX_PAYLOAD {
            self.stats.record_invalid_parameter();
            return Err(ArchiveError::invalid_parameter(format!(
                "payload of {} bytes exceeds maximum of {MAX_PAYLOAD}",
                data.len()
            )));
        }

        let capacity = self.region.capacity();
        if capacity - self.cursor < ENVELOPE_SIZE {
            self.stats.record_full();
            warn!(
                record_id = id.as_u16(),
                usage = self.cursor,
                capacity,
                "archive full, record rejected"
            );
            return Err(ArchiveError::Full {
                usage: self.cursor as u64,
                capacity: capacity as u64,
                needed: ENVELOPE_SIZE as u64,
            });
        }

        let envelope = Envelope::seal(id, data, self.checksum.as_ref(), self.config.tag_scope)?;
        let index = RecordIndex::new(self.record_count());

        self.region.write_at(self.cursor, &envelope.encode())?;
        self.cursor += ENVELOPE_SIZE;
        self.stats.record_write(ENVELOPE_SIZE as u64);

        debug!(
            %index,
            record_id = id.as_u16(),
            length = envelope.length,
            tag = envelope.tag,
            "record written"
        );
        Ok(index)
    }

    /// Appends the first `length` bytes of `data` as a record.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::InvalidParameter`] if `length` exceeds
    ///   [`MAX_PAYLOAD`] or the length of `data`
    /// - [`ArchiveError::Full`] if another envelope does not fit
    pub fn write_record_with_len(
        &mut self,
        id: RecordId,
        data: &[u8],
        length: u16,
    ) -> ArchiveResult<RecordIndex> {
        let length = usize::from(length);
        if length > data.len() {
            self.stats.record_invalid_parameter();
            return Err(ArchiveError::invalid_parameter(format!(
                "length {length} exceeds the {} bytes supplied",
                data.len()
            )));
        }
        self.write_record(id, &data[..length])
    }

    /// Reads and verifies the record at `index`.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::NotFound`] if `index` is at or beyond the write
    ///   frontier
    /// - [`ArchiveError::IntegrityError`] if the stored tag does not match
    ///   the tag recomputed from the stored bytes
    ///
    /// A corrupted record fails the same way on every read.
    pub fn read_record(&self, index: RecordIndex) -> ArchiveResult<Envelope> {
        let envelope = Envelope::decode(&self.raw_envelope(index)?);

        let computed = envelope.compute_tag(self.checksum.as_ref(), self.config.tag_scope);
        if computed != envelope.tag {
            self.stats.record_integrity_failure();
            warn!(
                %index,
                stored = envelope.tag,
                computed,
                "integrity check failed"
            );
            return Err(ArchiveError::IntegrityError {
                index,
                stored: envelope.tag,
                computed,
                envelope: Box::new(envelope),
            });
        }

        self.stats.record_read();
        Ok(envelope)
    }

    /// Returns the stored bytes of the envelope at `index`, unverified.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::NotFound`] if `index` is at or beyond the
    /// write frontier.
    pub fn raw_envelope(&self, index: RecordIndex) -> ArchiveResult<[u8; ENVELOPE_SIZE]> {
        let offset = self.offset_of(index)?;
        let mut raw = [0u8; ENVELOPE_SIZE];
        raw.copy_from_slice(self.region.read_at(offset, ENVELOPE_SIZE)?);
        Ok(raw)
    }

    /// Returns the number of bytes consumed.
    #[must_use]
    pub fn usage(&self) -> u64 {
        self.cursor as u64
    }

    /// Returns the region size in bytes.
    #[must_use]
    pub fn capacity(&self) -> u64 {
        self.region.capacity() as u64
    }

    /// Returns the number of records written.
    #[must_use]
    pub fn record_count(&self) -> u32 {
        (self.cursor / ENVELOPE_SIZE) as u32
    }

    /// Returns the number of records an empty region holds.
    #[must_use]
    pub fn max_records(&self) -> u32 {
        (self.region.capacity() / ENVELOPE_SIZE) as u32
    }

    /// Returns the number of records that can still be written.
    #[must_use]
    pub fn remaining_records(&self) -> u32 {
        self.max_records() - self.record_count()
    }

    /// Returns true if nothing has been written since initialization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Returns the logical state of the store.
    #[must_use]
    pub fn state(&self) -> StoreState {
        if self.is_empty() {
            StoreState::Empty
        } else {
            StoreState::Populated
        }
    }

    /// Returns a space accounting snapshot.
    #[must_use]
    pub fn usage_report(&self) -> Usage {
        Usage {
            used_bytes: self.usage(),
            capacity_bytes: self.capacity(),
            records: self.record_count(),
            max_records: self.max_records(),
        }
    }

    /// Returns a snapshot of the operation counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Returns the name of the checksum in use.
    #[must_use]
    pub fn checksum_name(&self) -> &'static str {
        self.checksum.name()
    }

    /// Iterates over every written record in write order.
    ///
    /// Each item carries the outcome of [`ArchiveStore::read_record`] for
    /// that index, so corruption in one record does not end the iteration.
    pub fn records(&self) -> Records<'_> {
        Records::new(self)
    }

    /// Reads every written record and reports which ones fail verification.
    #[must_use]
    pub fn verify(&self) -> VerifyReport {
        let mut report = VerifyReport::new();
        for (index, result) in self.records() {
            report.push(index, &result);
        }
        debug!(
            checked = report.records_checked,
            corrupt = report.corrupt.len(),
            "archive verified"
        );
        report
    }

    fn offset_of(&self, index: RecordIndex) -> ArchiveResult<usize> {
        let offset = index.as_usize().checked_mul(ENVELOPE_SIZE);
        match offset {
            Some(offset) if offset <= self.cursor && self.cursor - offset >= ENVELOPE_SIZE => {
                Ok(offset)
            }
            _ => {
                self.stats.record_not_found();
                Err(ArchiveError::NotFound {
                    index,
                    records: self.record_count(),
                })
            }
        }
    }

    /// XORs one region byte with `mask`; out-of-range offsets are ignored.
    #[cfg(any(test, feature = "fault-injection"))]
    pub(crate) fn xor_region_byte(&mut self, offset: usize, mask: u8) {
        let Ok(current) = self.region.read_at(offset, 1).map(|b| b[0]) else {
            return;
        };
        // In range, so the write cannot fail.
        let _ = self.region.write_at(offset, &[current ^ mask]);
    }
}

impl Default for ArchiveStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ArchiveStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveStore")
            .field("capacity", &self.region.capacity())
            .field("cursor", &self.cursor)
            .field("checksum", &self.checksum.name())
            .field("tag_scope", &self.config.tag_scope)
            .finish()
    }
}

fn validate_capacity(capacity: usize) -> ArchiveResult<()> {
    if capacity < ENVELOPE_SIZE {
        return Err(ArchiveError::invalid_parameter(format!(
            "capacity of {capacity} bytes cannot hold one {ENVELOPE_SIZE}-byte envelope"
        )));
    }
    if u32::try_from(capacity / ENVELOPE_SIZE).is_err() {
        return Err(ArchiveError::invalid_parameter(format!(
            "capacity of {capacity} bytes exceeds the addressable record count"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::{ChecksumKind, XorChecksum};
    use crate::envelope::{TagScope, PAYLOAD_OFFSET};
    use crate::fault::FaultInjection;

    #[test]
    fn new_store_is_empty() {
        let store = ArchiveStore::new();
        assert_eq!(store.usage(), 0);
        assert_eq!(store.capacity(), 4096);
        assert_eq!(store.max_records(), 30);
        assert_eq!(store.state(), StoreState::Empty);
    }

    #[test]
    fn write_then_read() {
        let mut store = ArchiveStore::new();
        let index = store
            .write_record(RecordId::new(0xAA), &[0x12, 0x34, 0x56])
            .unwrap();
        assert_eq!(index, RecordIndex::new(0));

        let env = store.read_record(index).unwrap();
        assert_eq!(env.record_id, RecordId::new(0xAA));
        assert_eq!(env.length, 3);
        assert_eq!(env.data(), &[0x12, 0x34, 0x56]);
        assert_eq!(store.state(), StoreState::Populated);
    }

    #[test]
    fn indices_follow_write_order() {
        let mut store = ArchiveStore::new();
        for i in 0..5u16 {
            let index = store.write_record(RecordId::new(100 + i), &[i as u8]).unwrap();
            assert_eq!(index.as_u32(), u32::from(i));
        }
        assert_eq!(store.usage(), 5 * ENVELOPE_SIZE as u64);
        assert_eq!(
            store.read_record(RecordIndex::new(3)).unwrap().record_id,
            RecordId::new(103)
        );
    }

    #[test]
    fn oversized_write_is_rejected_without_mutation() {
        let mut store = ArchiveStore::new();
        let result = store.write_record(RecordId::new(1), &[0u8; MAX_PAYLOAD + 1]);

        assert!(matches!(result, Err(ArchiveError::InvalidParameter { .. })));
        assert_eq!(store.usage(), 0);
        assert_eq!(store.stats().invalid_parameters, 1);
    }

    #[test]
    fn write_with_len_validates_length() {
        let mut store = ArchiveStore::new();
        let data = [1u8, 2, 3, 4];

        let index = store.write_record_with_len(RecordId::new(1), &data, 2).unwrap();
        assert_eq!(store.read_record(index).unwrap().data(), &[1, 2]);

        let too_long = store.write_record_with_len(RecordId::new(2), &data, 5);
        assert!(matches!(too_long, Err(ArchiveError::InvalidParameter { .. })));

        let over_max = store.write_record_with_len(RecordId::new(3), &[0u8; 200], 129);
        assert!(matches!(over_max, Err(ArchiveError::InvalidParameter { .. })));
        assert_eq!(store.record_count(), 1);
    }

    #[test]
    fn full_write_is_rejected_without_mutation() {
        let mut store = ArchiveStore::new();
        for i in 0..store.max_records() {
            store.write_record(RecordId::new(i as u16), &[0u8; 10]).unwrap();
        }
        let before = store.usage();

        let result = store.write_record(RecordId::new(99), &[0u8; 10]);
        assert!(matches!(result, Err(ArchiveError::Full { .. })));
        assert_eq!(store.usage(), before);
        assert_eq!(store.remaining_records(), 0);
    }

    #[test]
    fn capacity_of_exactly_one_envelope() {
        let config = ArchiveConfig::new().capacity(ENVELOPE_SIZE);
        let mut store = ArchiveStore::with_config(config).unwrap();

        store.write_record(RecordId::new(1), b"x").unwrap();
        assert!(matches!(
            store.write_record(RecordId::new(2), b"y"),
            Err(ArchiveError::Full { .. })
        ));
    }

    #[test]
    fn capacity_too_small_is_rejected() {
        let config = ArchiveConfig::new().capacity(ENVELOPE_SIZE - 1);
        assert!(matches!(
            ArchiveStore::with_config(config),
            Err(ArchiveError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn read_on_empty_store_is_not_found() {
        let store = ArchiveStore::new();
        assert!(matches!(
            store.read_record(RecordIndex::new(0)),
            Err(ArchiveError::NotFound { .. })
        ));
    }

    #[test]
    fn read_beyond_frontier_is_not_found() {
        let mut store = ArchiveStore::new();
        store.write_record(RecordId::new(1), b"a").unwrap();

        assert!(store.read_record(RecordIndex::new(0)).is_ok());
        assert!(matches!(
            store.read_record(RecordIndex::new(1)),
            Err(ArchiveError::NotFound { index, records: 1 }) if index == RecordIndex::new(1)
        ));
        assert!(matches!(
            store.read_record(RecordIndex::new(u32::MAX)),
            Err(ArchiveError::NotFound { .. })
        ));
    }

    #[test]
    fn corruption_is_detected_on_every_read() {
        let mut store = ArchiveStore::new();
        store
            .write_record(RecordId::new(0xBC), &[0xDE, 0xAD, 0xBE, 0xEF])
            .unwrap();
        store.corrupt(PAYLOAD_OFFSET);

        for _ in 0..3 {
            let err = store.read_record(RecordIndex::new(0)).unwrap_err();
            match err {
                ArchiveError::IntegrityError {
                    index, envelope, ..
                } => {
                    assert_eq!(index, RecordIndex::new(0));
                    assert_eq!(envelope.payload[0], 0xDE ^ 0xFF);
                }
                other => panic!("expected integrity error, got {other:?}"),
            }
        }
        assert_eq!(store.stats().integrity_failures, 3);
    }

    #[test]
    fn payload_scope_misses_header_damage() {
        let mut store = ArchiveStore::new();
        store.write_record(RecordId::new(0x10), b"abc").unwrap();
        store.corrupt(0);

        let env = store.read_record(RecordIndex::new(0)).unwrap();
        assert_eq!(env.record_id, RecordId::new(0x10 ^ 0xFF));
    }

    #[test]
    fn envelope_scope_catches_header_damage() {
        let config = ArchiveConfig::new().tag_scope(TagScope::Envelope);
        let mut store = ArchiveStore::with_config(config).unwrap();
        store.write_record(RecordId::new(0x10), b"abc").unwrap();
        store.corrupt(0);

        assert!(store
            .read_record(RecordIndex::new(0))
            .unwrap_err()
            .is_integrity_error());
    }

    #[test]
    fn custom_checksum_is_used() {
        let config = ArchiveConfig::new().checksum(ChecksumKind::Crc16);
        let mut store = ArchiveStore::with_checksum(config, Box::new(XorChecksum)).unwrap();
        assert_eq!(store.checksum_name(), "xor");

        store.write_record(RecordId::new(1), &[0x0F, 0xF0]).unwrap();
        assert_eq!(store.read_record(RecordIndex::new(0)).unwrap().tag, 0xFF);
    }

    #[test]
    fn with_region_takes_region_capacity() {
        let region = InMemoryRegion::with_data(vec![0xEE; 300]);
        let store = ArchiveStore::with_region(ArchiveConfig::default(), Box::new(region)).unwrap();

        assert_eq!(store.capacity(), 300);
        assert_eq!(store.config().capacity, 300);
        assert_eq!(store.max_records(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut store = ArchiveStore::new();
        store.write_record(RecordId::new(1), b"data").unwrap();

        store.initialize();
        store.initialize();

        assert_eq!(store.usage(), 0);
        assert_eq!(store.state(), StoreState::Empty);
        assert!(store.read_record(RecordIndex::new(0)).is_err());
        assert_eq!(store.stats().initializations, 2);
    }

    #[test]
    fn initialize_wipes_region() {
        let mut store = ArchiveStore::new();
        store.write_record(RecordId::new(1), &[0xFF; MAX_PAYLOAD]).unwrap();
        store.initialize();

        store.write_record(RecordId::new(2), &[]).unwrap();
        let raw = store.raw_envelope(RecordIndex::new(0)).unwrap();
        assert!(raw[PAYLOAD_OFFSET..PAYLOAD_OFFSET + MAX_PAYLOAD]
            .iter()
            .all(|&b| b == 0));
    }

    #[test]
    fn corrupt_outside_region_is_ignored() {
        let mut store = ArchiveStore::new();
        store.write_record(RecordId::new(1), b"ok").unwrap();
        store.corrupt(4096);
        store.corrupt(usize::MAX);
        assert!(store.read_record(RecordIndex::new(0)).is_ok());
    }

    #[test]
    fn verify_reports_corrupt_records() {
        let mut store = ArchiveStore::new();
        for i in 0..4u16 {
            store.write_record(RecordId::new(i), &[i as u8 + 1; 8]).unwrap();
        }
        store.corrupt(2 * ENVELOPE_SIZE + PAYLOAD_OFFSET + 1);

        let report = store.verify();
        assert_eq!(report.records_checked, 4);
        assert_eq!(report.valid_records, 3);
        assert_eq!(report.corrupt.len(), 1);
        assert_eq!(report.corrupt[0].index, RecordIndex::new(2));
        assert!(!report.is_ok());
    }

    #[test]
    fn usage_report_tracks_cursor() {
        let mut store = ArchiveStore::new();
        store.write_record(RecordId::new(1), b"a").unwrap();
        store.write_record(RecordId::new(2), b"b").unwrap();

        let usage = store.usage_report();
        assert_eq!(usage.used_bytes, 268);
        assert_eq!(usage.records, 2);
        assert_eq!(usage.remaining_records(), 28);
    }
}
