//! Record-relative fault injection.
//!
//! [`archive_core::FaultInjection`] works on absolute region offsets. These
//! helpers translate a record index and a field position into that offset.

use archive_core::{
    ArchiveStore, FaultInjection, RecordIndex, ENVELOPE_SIZE, LENGTH_OFFSET, PAYLOAD_OFFSET,
    RECORD_ID_OFFSET, TAG_OFFSET,
};

/// A field of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeField {
    /// The two `record_id` bytes.
    RecordId,
    /// The two `length` bytes.
    Length,
    /// The 128 payload bytes.
    Payload,
    /// The two tag bytes.
    Tag,
}

impl EnvelopeField {
    /// Offset of the field within an envelope.
    #[must_use]
    pub const fn offset(self) -> usize {
        match self {
            Self::RecordId => RECORD_ID_OFFSET,
            Self::Length => LENGTH_OFFSET,
            Self::Payload => PAYLOAD_OFFSET,
            Self::Tag => TAG_OFFSET,
        }
    }

    /// Returns the field containing envelope byte `pos`.
    #[must_use]
    pub const fn at(pos: usize) -> Self {
        if pos < LENGTH_OFFSET {
            Self::RecordId
        } else if pos < PAYLOAD_OFFSET {
            Self::Length
        } else if pos < TAG_OFFSET {
            Self::Payload
        } else {
            Self::Tag
        }
    }
}

/// Region offset of the first byte of record `index`.
#[must_use]
pub fn record_offset(index: RecordIndex) -> usize {
    index.as_usize() * ENVELOPE_SIZE
}

/// Region offset of payload byte `byte` of record `index`.
#[must_use]
pub fn payload_offset(index: RecordIndex, byte: usize) -> usize {
    record_offset(index) + PAYLOAD_OFFSET + byte
}

/// Region offset of byte `byte` of `field` in record `index`.
#[must_use]
pub fn field_offset(index: RecordIndex, field: EnvelopeField, byte: usize) -> usize {
    record_offset(index) + field.offset() + byte
}

/// Inverts every bit of one payload byte of a record.
pub fn corrupt_payload_byte(store: &mut ArchiveStore, index: RecordIndex, byte: usize) {
    store.corrupt(payload_offset(index, byte));
}

/// Inverts one bit of one payload byte of a record.
pub fn flip_payload_bit(store: &mut ArchiveStore, index: RecordIndex, byte: usize, bit: u8) {
    store.flip_bit(payload_offset(index, byte), bit);
}

/// Inverts every bit of one byte of a record's field.
pub fn corrupt_field(
    store: &mut ArchiveStore,
    index: RecordIndex,
    field: EnvelopeField,
    byte: usize,
) {
    store.corrupt(field_offset(index, field, byte));
}
