//! Fuzz testing harnesses for the archive.
//!
//! These targets can be driven by cargo-fuzz or any other source of bytes.
//! Each one checks the store against a simple model and panics on any
//! divergence.

use archive_core::{
    ArchiveError, ArchiveStore, Envelope, FaultInjection, RecordId, RecordIndex, ENVELOPE_SIZE,
};
use std::collections::HashSet;

/// Fuzz target for envelope decoding.
///
/// Any 134 bytes must decode without panicking, and reading the payload
/// must stay in bounds whatever the `length` field says.
pub fn fuzz_envelope_decode(data: &[u8]) {
    let mut buf = [0u8; ENVELOPE_SIZE];
    let n = data.len().min(ENVELOPE_SIZE);
    buf[..n].copy_from_slice(&data[..n]);

    let envelope = Envelope::decode(&buf);
    assert!(envelope.data().len() <= envelope.payload.len());
    assert_eq!(envelope.encode(), buf, "Decode/encode changed bytes");
}

/// Fuzz target for store operations.
///
/// Interprets the input as an operation sequence and checks every result
/// against a shadow copy of what was written.
pub fn fuzz_store_operations(data: &[u8]) {
    let ops = FuzzOp::parse_sequence(data);
    let mut store = ArchiveStore::new();
    FuzzOp::execute_sequence(&ops, &mut store);
}

/// An operation decoded from fuzzer input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FuzzOp {
    /// Write a record.
    Write {
        /// Record identifier.
        id: u16,
        /// Payload, possibly oversized.
        data: Vec<u8>,
    },
    /// Read a record.
    Read {
        /// Record index.
        index: u32,
    },
    /// Invert one byte of the region.
    Corrupt {
        /// Absolute region offset.
        offset: u16,
    },
    /// Wipe the store.
    Initialize,
    /// Verify every record.
    Verify,
}

impl FuzzOp {
    /// Parse operations from fuzzer input.
    pub fn parse_sequence(data: &[u8]) -> Vec<FuzzOp> {
        let mut ops = Vec::new();
        let mut offset = 0;

        while offset < data.len() {
            let op_type = data[offset];
            offset += 1;

            let op = match op_type % 5 {
                0 => {
                    if offset + 3 > data.len() {
                        break;
                    }
                    let id = u16::from_le_bytes([data[offset], data[offset + 1]]);
                    let len = data[offset + 2] as usize;
                    offset += 3;

                    if offset + len > data.len() {
                        break;
                    }
                    let payload = data[offset..offset + len].to_vec();
                    offset += len;

                    FuzzOp::Write { id, data: payload }
                }
                1 => {
                    let Some(&index) = data.get(offset) else {
                        break;
                    };
                    offset += 1;
                    FuzzOp::Read {
                        index: u32::from(index),
                    }
                }
                2 => {
                    if offset + 2 > data.len() {
                        break;
                    }
                    let raw = u16::from_le_bytes([data[offset], data[offset + 1]]);
                    offset += 2;
                    FuzzOp::Corrupt { offset: raw }
                }
                3 => FuzzOp::Initialize,
                4 => FuzzOp::Verify,
                _ => break,
            };

            ops.push(op);
        }

        ops
    }

    /// Execute operations on a store, checking each against the model.
    pub fn execute_sequence(ops: &[FuzzOp], store: &mut ArchiveStore) {
        let mut written: Vec<(u16, Vec<u8>)> = Vec::new();
        let mut damaged: HashSet<usize> = HashSet::new();

        for op in ops {
            let usage_before = store.usage();

            match op {
                FuzzOp::Write { id, data } => {
                    match store.write_record(RecordId::new(*id), data) {
                        Ok(index) => {
                            assert_eq!(index.as_usize(), written.len());
                            written.push((*id, data.clone()));
                        }
                        Err(ArchiveError::InvalidParameter { .. }) => {
                            assert!(data.len() > archive_core::MAX_PAYLOAD);
                            assert_eq!(store.usage(), usage_before);
                        }
                        Err(ArchiveError::Full { .. }) => {
                            assert_eq!(store.remaining_records(), 0);
                            assert_eq!(store.usage(), usage_before);
                        }
                        Err(other) => panic!("Unexpected write error: {other}"),
                    }
                }
                FuzzOp::Read { index } => {
                    let result = store.read_record(RecordIndex::new(*index));
                    let i = *index as usize;
                    match written.get(i) {
                        None => assert!(matches!(result, Err(ArchiveError::NotFound { .. }))),
                        Some(_) if damaged.contains(&i) => {}
                        Some((id, data)) => {
                            let env = result.expect("Undamaged record failed to read");
                            assert_eq!(env.record_id.as_u16(), *id);
                            assert_eq!(env.data(), data.as_slice());
                        }
                    }
                }
                FuzzOp::Corrupt { offset } => {
                    let offset = usize::from(*offset);
                    store.corrupt(offset);
                    damaged.insert(offset / ENVELOPE_SIZE);
                }
                FuzzOp::Initialize => {
                    store.initialize();
                    written.clear();
                    damaged.clear();
                }
                FuzzOp::Verify => {
                    let report = store.verify();
                    assert_eq!(report.records_checked as usize, written.len());
                    for bad in &report.corrupt {
                        assert!(damaged.contains(&bad.index.as_usize()));
                    }
                }
            }

            assert!(store.usage() <= store.capacity());
            assert_eq!(store.usage() % ENVELOPE_SIZE as u64, 0);
            assert_eq!(store.record_count() as usize, written.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::{DefaultHasher, Hash, Hasher};

    /// Generate pseudo-random data for fuzzing based on a seed.
    fn generate_random_data(seed: u64, len: usize) -> Vec<u8> {
        let mut hasher = DefaultHasher::new();
        let mut result = Vec::with_capacity(len);
        let mut state = seed;

        for _ in 0..len {
            state.hash(&mut hasher);
            state = hasher.finish();
            hasher = DefaultHasher::new();
            result.push((state & 0xFF) as u8);
        }

        result
    }

    #[test]
    fn test_fuzz_store_empty() {
        fuzz_store_operations(&[]);
    }

    #[test]
    fn test_fuzz_store_random() {
        for seed in 0..200 {
            let data = generate_random_data(seed, 2048);
            fuzz_store_operations(&data);
        }
    }

    #[test]
    fn test_fuzz_envelope_decode_random() {
        for seed in 0..200 {
            let data = generate_random_data(seed, ENVELOPE_SIZE);
            fuzz_envelope_decode(&data);
        }
    }

    #[test]
    fn test_parse_sequence() {
        let ops = FuzzOp::parse_sequence(&[0, 0xAA, 0x00, 2, 0x12, 0x34, 1, 0, 3, 4]);
        assert_eq!(
            ops,
            vec![
                FuzzOp::Write {
                    id: 0xAA,
                    data: vec![0x12, 0x34]
                },
                FuzzOp::Read { index: 0 },
                FuzzOp::Initialize,
                FuzzOp::Verify,
            ]
        );
    }

    #[test]
    fn test_parse_truncated_write() {
        assert!(FuzzOp::parse_sequence(&[0, 1, 0, 9, 1, 2]).is_empty());
    }
}
