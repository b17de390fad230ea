//! Envelope layout and serialization.
//!
//! Every record is stored as a fixed-size envelope. All multi-byte fields
//! are little-endian.
//!
//! | Offset | Size | Field       |
//! |--------|------|-------------|
//! | 0      | 2    | `record_id` |
//! | 2      | 2    | `length`    |
//! | 4      | 128  | `payload`   |
//! | 132    | 2    | `tag`       |
//!
//! The size does not depend on `length`: a record at index `i` always starts
//! at byte `i * ENVELOPE_SIZE`.

use crate::checksum::Checksum;
use crate::error::{ArchiveError, ArchiveResult};
use crate::types::RecordId;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Maximum number of meaningful payload bytes in one record.
pub const MAX_PAYLOAD: usize = 128;

/// Offset of `record_id` within an envelope.
pub const RECORD_ID_OFFSET: usize = 0;
/// Offset of `length` within an envelope.
pub const LENGTH_OFFSET: usize = 2;
/// Offset of the payload within an envelope.
pub const PAYLOAD_OFFSET: usize = 4;
/// Offset of the integrity tag within an envelope.
pub const TAG_OFFSET: usize = PAYLOAD_OFFSET + MAX_PAYLOAD;
/// Size of one serialized envelope in bytes.
pub const ENVELOPE_SIZE: usize = TAG_OFFSET + 2;

const _: () = assert!(ENVELOPE_SIZE == 134);

/// Which envelope bytes the integrity tag covers.
///
/// The scope is a property of the store, so every envelope in one region is
/// sealed and verified the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TagScope {
    /// Only the first `length` payload bytes.
    ///
    /// Damage to `record_id`, to `length`, or to padding goes unnoticed, and
    /// a damaged `length` changes which bytes are checked.
    #[default]
    Payload,
    /// The header and the full padded payload (everything before the tag).
    Envelope,
}

impl fmt::Display for TagScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payload => f.write_str("payload"),
            Self::Envelope => f.write_str("envelope"),
        }
    }
}

impl FromStr for TagScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "payload" => Ok(Self::Payload),
            "envelope" => Ok(Self::Envelope),
            other => Err(format!(
                "unknown tag scope '{other}', expected payload or envelope"
            )),
        }
    }
}

/// One stored record: header, zero-padded payload, and integrity tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Caller-supplied identifier.
    pub record_id: RecordId,
    /// Count of meaningful payload bytes.
    ///
    /// Never above [`MAX_PAYLOAD`] when sealed, but a decoded envelope
    /// reports whatever the region holds.
    pub length: u16,
    /// Payload bytes; everything past `length` is padding.
    pub payload: [u8; MAX_PAYLOAD],
    /// Integrity tag.
    pub tag: u16,
}

impl Envelope {
    /// Builds an envelope around `data` and computes its tag.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidParameter`] if `data` is longer than
    /// [`MAX_PAYLOAD`].
    pub fn seal(
        record_id: RecordId,
        data: &[u8],
        checksum: &dyn Checksum,
        scope: TagScope,
    ) -> ArchiveResult<Self> {
        if data.len() > MAX_PAYLOAD {
            return Err(ArchiveError::invalid_parameter(format!(
                "payload of {} bytes exceeds maximum of {MAX_PAYLOAD}",
                data.len()
            )));
        }

        let mut payload = [0u8; MAX_PAYLOAD];
        payload[..data.len()].copy_from_slice(data);

        let mut envelope = Self {
            record_id,
            length: data.len() as u16,
            payload,
            tag: 0,
        };
        envelope.tag = envelope.compute_tag(checksum, scope);
        Ok(envelope)
    }

    /// Returns the meaningful payload bytes.
    ///
    /// A corrupted `length` above [`MAX_PAYLOAD`] is clamped.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.payload[..self.checked_len()]
    }

    /// Recomputes the tag from the current field values.
    #[must_use]
    pub fn compute_tag(&self, checksum: &dyn Checksum, scope: TagScope) -> u16 {
        match scope {
            TagScope::Payload => checksum.checksum(self.data()),
            TagScope::Envelope => checksum.checksum(&self.encode()[..TAG_OFFSET]),
        }
    }

    /// Serializes the envelope into its fixed byte layout.
    #[must_use]
    pub fn encode(&self) -> [u8; ENVELOPE_SIZE] {
        let mut buf = [0u8; ENVELOPE_SIZE];
        buf[RECORD_ID_OFFSET..LENGTH_OFFSET]
            .copy_from_slice(&self.record_id.as_u16().to_le_bytes());
        buf[LENGTH_OFFSET..PAYLOAD_OFFSET].copy_from_slice(&self.length.to_le_bytes());
        buf[PAYLOAD_OFFSET..TAG_OFFSET].copy_from_slice(&self.payload);
        buf[TAG_OFFSET..].copy_from_slice(&self.tag.to_le_bytes());
        buf
    }

    /// Deserializes an envelope from its fixed byte layout.
    ///
    /// Never fails: fields are taken as stored, and any corruption is left
    /// for the tag comparison to find.
    #[must_use]
    pub fn decode(buf: &[u8; ENVELOPE_SIZE]) -> Self {
        let mut payload = [0u8; MAX_PAYLOAD];
        payload.copy_from_slice(&buf[PAYLOAD_OFFSET..TAG_OFFSET]);

        Self {
            record_id: RecordId::new(u16::from_le_bytes([buf[0], buf[1]])),
            length: u16::from_le_bytes([buf[LENGTH_OFFSET], buf[LENGTH_OFFSET + 1]]),
            payload,
            tag: u16::from_le_bytes([buf[TAG_OFFSET], buf[TAG_OFFSET + 1]]),
        }
    }

    fn checked_len(&self) -> usize {
        usize::from(self.length).min(MAX_PAYLOAD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::{Crc16, XorChecksum};

    #[test]
    fn layout_constants() {
        assert_eq!(PAYLOAD_OFFSET, 4);
        assert_eq!(TAG_OFFSET, 132);
        assert_eq!(ENVELOPE_SIZE, 134);
    }

    #[test]
    fn seal_pads_payload() {
        let env = Envelope::seal(RecordId::new(0xAA), &[1, 2, 3], &XorChecksum, TagScope::Payload)
            .unwrap();

        assert_eq!(env.length, 3);
        assert_eq!(env.data(), &[1, 2, 3]);
        assert!(env.payload[3..].iter().all(|&b| b == 0));
        assert_eq!(env.tag, 1 ^ 2 ^ 3);
    }

    #[test]
    fn seal_rejects_oversized_payload() {
        let data = [0u8; MAX_PAYLOAD + 1];
        let result = Envelope::seal(RecordId::new(1), &data, &Crc16, TagScope::Payload);
        assert!(matches!(result, Err(ArchiveError::InvalidParameter { .. })));
    }

    #[test]
    fn seal_accepts_full_and_empty_payloads() {
        let full = Envelope::seal(RecordId::new(1), &[7; MAX_PAYLOAD], &Crc16, TagScope::Payload)
            .unwrap();
        assert_eq!(usize::from(full.length), MAX_PAYLOAD);

        let empty = Envelope::seal(RecordId::new(2), &[], &Crc16, TagScope::Payload).unwrap();
        assert_eq!(empty.length, 0);
        assert!(empty.data().is_empty());
    }

    #[test]
    fn encode_field_positions() {
        let env = Envelope::seal(
            RecordId::new(0x1234),
            &[0xDE, 0xAD],
            &XorChecksum,
            TagScope::Payload,
        )
        .unwrap();
        let buf = env.encode();

        assert_eq!(&buf[0..2], &[0x34, 0x12]);
        assert_eq!(&buf[2..4], &[0x02, 0x00]);
        assert_eq!(&buf[4..6], &[0xDE, 0xAD]);
        assert!(buf[6..132].iter().all(|&b| b == 0));
        assert_eq!(&buf[132..134], &(0xDEu16 ^ 0xAD).to_le_bytes());
    }

    #[test]
    fn decode_inverts_encode() {
        let env = Envelope::seal(RecordId::new(9), b"telemetry", &Crc16, TagScope::Envelope)
            .unwrap();
        assert_eq!(Envelope::decode(&env.encode()), env);
    }

    #[test]
    fn decode_keeps_corrupt_length() {
        let env = Envelope::seal(RecordId::new(9), &[1, 2, 3], &Crc16, TagScope::Payload).unwrap();
        let mut buf = env.encode();
        buf[LENGTH_OFFSET + 1] = 0xFF;

        let decoded = Envelope::decode(&buf);
        assert_eq!(decoded.length, 0xFF03);
        assert_eq!(decoded.data().len(), MAX_PAYLOAD);
    }

    #[test]
    fn payload_scope_ignores_header() {
        let a = Envelope::seal(RecordId::new(1), &[5, 6], &Crc16, TagScope::Payload).unwrap();
        let b = Envelope::seal(RecordId::new(2), &[5, 6], &Crc16, TagScope::Payload).unwrap();
        assert_eq!(a.tag, b.tag);
    }

    #[test]
    fn envelope_scope_covers_header() {
        let a = Envelope::seal(RecordId::new(1), &[5, 6], &Crc16, TagScope::Envelope).unwrap();
        let b = Envelope::seal(RecordId::new(2), &[5, 6], &Crc16, TagScope::Envelope).unwrap();
        assert_ne!(a.tag, b.tag);
    }

    #[test]
    fn tag_scope_parse() {
        assert_eq!("payload".parse::<TagScope>().unwrap(), TagScope::Payload);
        assert_eq!("Envelope".parse::<TagScope>().unwrap(), TagScope::Envelope);
        assert!("header".parse::<TagScope>().is_err());
        assert_eq!(TagScope::default().to_string(), "payload");
    }
}
