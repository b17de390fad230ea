//! Property-based test generators using proptest.
//!
//! Provides strategies for generating records and store configurations
//! that respect the archive's limits.

use archive_core::{
    ArchiveConfig, ChecksumKind, RecordId, TagScope, ENVELOPE_SIZE, MAX_PAYLOAD,
};
use proptest::prelude::*;

/// A record as a caller would submit it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInput {
    /// Record identifier.
    pub id: RecordId,
    /// Payload bytes.
    pub data: Vec<u8>,
}

/// Strategy for generating record identifiers.
pub fn record_id_strategy() -> impl Strategy<Value = RecordId> {
    any::<u16>().prop_map(RecordId::new)
}

/// Strategy for generating payloads that fit in an envelope.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD)
}

/// Strategy for generating non-empty payloads that fit in an envelope.
pub fn non_empty_payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=MAX_PAYLOAD)
}

/// Strategy for generating payloads one or more bytes too long.
pub fn oversized_payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), MAX_PAYLOAD + 1..=MAX_PAYLOAD * 2)
}

/// Strategy for generating a valid record.
pub fn record_strategy() -> impl Strategy<Value = RecordInput> {
    (record_id_strategy(), payload_strategy()).prop_map(|(id, data)| RecordInput { id, data })
}

/// Strategy for generating a batch of records.
pub fn record_batch_strategy(
    min_records: usize,
    max_records: usize,
) -> impl Strategy<Value = Vec<RecordInput>> {
    prop::collection::vec(record_strategy(), min_records..max_records)
}

/// Strategy for generating a checksum selection.
pub fn checksum_kind_strategy() -> impl Strategy<Value = ChecksumKind> {
    prop_oneof![Just(ChecksumKind::Xor), Just(ChecksumKind::Crc16)]
}

/// Strategy for generating a tag scope.
pub fn tag_scope_strategy() -> impl Strategy<Value = TagScope> {
    prop_oneof![Just(TagScope::Payload), Just(TagScope::Envelope)]
}

/// Strategy for generating a valid store configuration.
///
/// Capacities range from one envelope up to 64 envelopes plus slack.
pub fn config_strategy() -> impl Strategy<Value = ArchiveConfig> {
    (
        ENVELOPE_SIZE..=ENVELOPE_SIZE * 64 + ENVELOPE_SIZE - 1,
        checksum_kind_strategy(),
        tag_scope_strategy(),
    )
        .prop_map(|(capacity, checksum, scope)| {
            ArchiveConfig::new()
                .capacity(capacity)
                .checksum(checksum)
                .tag_scope(scope)
        })
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
