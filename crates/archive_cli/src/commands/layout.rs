//! Layout command implementation.

use archive_core::{
    DEFAULT_CAPACITY, ENVELOPE_SIZE, LENGTH_OFFSET, MAX_PAYLOAD, PAYLOAD_OFFSET, RECORD_ID_OFFSET,
    TAG_OFFSET,
};
use serde::Serialize;

/// One field of the envelope.
#[derive(Debug, Serialize)]
pub struct FieldLayout {
    /// Field name.
    pub name: &'static str,
    /// Byte offset within the envelope.
    pub offset: usize,
    /// Size in bytes.
    pub size: usize,
}

/// The envelope layout.
#[derive(Debug, Serialize)]
pub struct LayoutInfo {
    /// Fields in storage order.
    pub fields: Vec<FieldLayout>,
    /// Total envelope size in bytes.
    pub envelope_size: usize,
    /// Maximum payload length in bytes.
    pub max_payload: usize,
    /// Records that fit in a default-sized region.
    pub records_per_default_region: usize,
}

/// Describes the envelope layout.
pub fn layout_info() -> LayoutInfo {
    LayoutInfo {
        fields: vec![
            FieldLayout {
                name: "record_id",
                offset: RECORD_ID_OFFSET,
                size: LENGTH_OFFSET - RECORD_ID_OFFSET,
            },
            FieldLayout {
                name: "length",
                offset: LENGTH_OFFSET,
                size: PAYLOAD_OFFSET - LENGTH_OFFSET,
            },
            FieldLayout {
                name: "payload",
                offset: PAYLOAD_OFFSET,
                size: MAX_PAYLOAD,
            },
            FieldLayout {
                name: "tag",
                offset: TAG_OFFSET,
                size: ENVELOPE_SIZE - TAG_OFFSET,
            },
        ],
        envelope_size: ENVELOPE_SIZE,
        max_payload: MAX_PAYLOAD,
        records_per_default_region: DEFAULT_CAPACITY / ENVELOPE_SIZE,
    }
}

/// Runs the layout command.
pub fn run(format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let info = layout_info();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        "text" => {
            println!("Envelope layout (little-endian)");
            println!();
            println!("{:<10} {:>6} {:>6}", "field", "offset", "size");
            for field in &info.fields {
                println!("{:<10} {:>6} {:>6}", field.name, field.offset, field.size);
            }
            println!();
            println!("Envelope size: {} bytes", info.envelope_size);
            println!("Max payload:   {} bytes", info.max_payload);
            println!(
                "Records per {}-byte region: {}",
                DEFAULT_CAPACITY, info.records_per_default_region
            );
        }
        other => return Err(format!("Unknown format: {}", other).into()),
    }

    Ok(())
}
