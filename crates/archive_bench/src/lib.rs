//! Benchmark utilities.

use archive_core::{ArchiveConfig, ArchiveStore, ChecksumKind, RecordId, ENVELOPE_SIZE};

/// Deterministic payload of the given size.
pub fn payload(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

/// Store sized for exactly `records` envelopes, filled with `size`-byte payloads.
///
/// # Panics
///
/// Panics if `records` is zero or `size` exceeds the payload limit.
pub fn filled_store(kind: ChecksumKind, records: usize, size: usize) -> ArchiveStore {
    let config = ArchiveConfig::new()
        .capacity(records * ENVELOPE_SIZE)
        .checksum(kind);
    let mut store = ArchiveStore::with_config(config).expect("valid bench config");
    let data = payload(size);
    for i in 0..records {
        store
            .write_record(RecordId::new(i as u16), &data)
            .expect("region sized for every record");
    }
    store
}
