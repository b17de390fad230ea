//! Golden envelope vectors.
//!
//! Each vector pins the exact bytes a store must produce for one record, so
//! any change to the layout, the byte order, or a checksum shows up here.

use archive_core::{ChecksumKind, TagScope, ENVELOPE_SIZE, MAX_PAYLOAD};
use serde::{Deserialize, Serialize};

/// One record and the envelope bytes it must encode to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Record identifier written.
    pub record_id: u16,
    /// Payload written (hex-encoded).
    pub data_hex: String,
    /// Checksum in use: `xor` or `crc16`.
    pub checksum: String,
    /// Tag scope in use: `payload` or `envelope`.
    pub tag_scope: String,
    /// Expected `record_id` and `length` bytes (hex-encoded).
    pub header_hex: String,
    /// Expected tag bytes (hex-encoded).
    pub tag_hex: String,
}

impl EnvelopeVector {
    /// Parses the checksum selection.
    pub fn checksum_kind(&self) -> ChecksumKind {
        self.checksum.parse().expect("Invalid checksum in vector")
    }

    /// Parses the tag scope.
    pub fn scope(&self) -> TagScope {
        self.tag_scope.parse().expect("Invalid tag scope in vector")
    }

    /// Decodes the payload.
    pub fn data(&self) -> Vec<u8> {
        hex_decode(&self.data_hex)
    }

    /// Assembles the full expected envelope.
    pub fn expected_envelope(&self) -> Vec<u8> {
        let mut buf = hex_decode(&self.header_hex);
        let data = self.data();
        buf.extend_from_slice(&data);
        buf.resize(4 + MAX_PAYLOAD, 0);
        buf.extend_from_slice(&hex_decode(&self.tag_hex));
        assert_eq!(buf.len(), ENVELOPE_SIZE, "Vector {} is malformed", self.id);
        buf
    }
}

/// Envelope layout vectors.
pub fn envelope_vectors() -> Vec<EnvelopeVector> {
    vec![
        vector(
            "battery_voltage_xor",
            "Three-byte sensor sample, XOR tag over payload",
            0x00AA,
            "123456",
            "xor",
            "payload",
            "aa000300",
            "7000",
        ),
        vector(
            "battery_voltage_crc16",
            "Three-byte sensor sample, CRC-16 tag over payload",
            0x00AA,
            "123456",
            "crc16",
            "payload",
            "aa000300",
            "fd12",
        ),
        vector(
            "deadbeef_crc16",
            "Four-byte marker, CRC-16 tag over payload",
            0x00BC,
            "deadbeef",
            "crc16",
            "payload",
            "bc000400",
            "9740",
        ),
        vector(
            "empty_crc16",
            "Empty payload, CRC-16 of nothing is the initial value",
            0x0007,
            "",
            "crc16",
            "payload",
            "07000000",
            "ffff",
        ),
        vector(
            "housekeeping_envelope_crc16",
            "Two-byte payload, CRC-16 tag over header and padded payload",
            0x1234,
            "686b",
            "crc16",
            "envelope",
            "34120200",
            "6fc3",
        ),
        vector(
            "housekeeping_envelope_xor",
            "Two-byte payload, XOR tag over header and padded payload",
            0x1234,
            "686b",
            "xor",
            "envelope",
            "34120200",
            "2700",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn vector(
    id: &str,
    description: &str,
    record_id: u16,
    data_hex: &str,
    checksum: &str,
    tag_scope: &str,
    header_hex: &str,
    tag_hex: &str,
) -> EnvelopeVector {
    EnvelopeVector {
        id: id.into(),
        description: description.into(),
        record_id,
        data_hex: data_hex.into(),
        checksum: checksum.into(),
        tag_scope: tag_scope.into(),
        header_hex: header_hex.into(),
        tag_hex: tag_hex.into(),
    }
}

/// All vectors as pretty-printed JSON, for use by ground tooling.
pub fn all_vectors_json() -> String {
    serde_json::to_string_pretty(&envelope_vectors()).expect("Failed to serialize vectors")
}

/// Encodes bytes as hexadecimal string.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Decodes hexadecimal string to bytes.
pub fn hex_decode(hex: &str) -> Vec<u8> {
    let hex = hex.replace([' ', '\n', '\r'], "");
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("Invalid hex"))
        .collect()
}
