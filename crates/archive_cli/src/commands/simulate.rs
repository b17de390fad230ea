//! Simulate command implementation.

use archive_core::{
    ArchiveConfig, ArchiveError, ArchiveStore, ChecksumKind, FaultInjection, RecordId,
    StatsSnapshot, Status, TagScope, Usage, VerifyReport,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised by the simulate command.
#[derive(Debug, Error)]
pub enum SimulateError {
    /// The records file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// File path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The records file is not valid JSON of the expected shape.
    #[error("invalid records file: {0}")]
    Parse(#[from] serde_json::Error),

    /// The archive could not be created.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Verification found corrupted records.
    #[error("verification failed: {0} corrupt record(s)")]
    Corrupt(usize),
}

/// One record from the input file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputRecord {
    /// Record identifier.
    pub id: u16,
    /// Payload bytes.
    pub data: Vec<u8>,
}

/// Archive settings for a simulation.
#[derive(Debug, Clone)]
pub struct SimulateOptions {
    /// Region size in bytes.
    pub capacity: usize,
    /// Checksum function.
    pub checksum: ChecksumKind,
    /// Tag scope.
    pub tag_scope: TagScope,
    /// Region offsets to invert after all writes.
    pub flips: Vec<usize>,
}

/// Outcome of one write.
#[derive(Debug, Serialize)]
pub struct WriteOutcome {
    /// Position of the record in the input file.
    pub position: usize,
    /// Record identifier.
    pub id: u16,
    /// Write status.
    pub status: Status,
    /// Assigned index, if written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

/// Full simulation report.
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    /// Checksum in use.
    pub checksum: ChecksumKind,
    /// Tag scope in use.
    pub tag_scope: TagScope,
    /// Per-record write outcomes.
    pub writes: Vec<WriteOutcome>,
    /// Offsets inverted.
    pub flips: Vec<usize>,
    /// Space accounting after all writes.
    pub usage: Usage,
    /// Verification result.
    pub verify: VerifyReport,
    /// Operation counters.
    pub stats: StatsSnapshot,
}

/// Loads records from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<InputRecord>, SimulateError> {
    let text = std::fs::read_to_string(path).map_err(|source| SimulateError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Writes `records` into a fresh archive, applies flips, and verifies.
///
/// Rejected writes are reported and do not stop the run.
pub fn simulate(
    records: &[InputRecord],
    options: &SimulateOptions,
) -> Result<SimulationReport, SimulateError> {
    let config = ArchiveConfig::new()
        .capacity(options.capacity)
        .checksum(options.checksum)
        .tag_scope(options.tag_scope);
    let mut store = ArchiveStore::with_config(config)?;

    let writes = records
        .iter()
        .enumerate()
        .map(|(position, record)| {
            let result = store.write_record(RecordId::new(record.id), &record.data);
            if let Err(e) = &result {
                warn!(position, id = record.id, error = %e, "write rejected");
            }
            WriteOutcome {
                position,
                id: record.id,
                status: Status::of(&result),
                index: result.ok().map(|i| i.as_u32()),
            }
        })
        .collect();

    for &offset in &options.flips {
        store.corrupt(offset);
    }

    let verify = store.verify();
    info!(
        records = verify.records_checked,
        corrupt = verify.corrupt.len(),
        usage = store.usage(),
        "simulation complete"
    );

    Ok(SimulationReport {
        checksum: options.checksum,
        tag_scope: options.tag_scope,
        writes,
        flips: options.flips.clone(),
        usage: store.usage_report(),
        verify,
        stats: store.stats(),
    })
}

/// Runs the simulate command.
pub fn run(
    path: &Path,
    options: &SimulateOptions,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = load_records(path)?;
    let report = simulate(&records, options)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print_report(&report),
        other => return Err(format!("Unknown format: {}", other).into()),
    }

    if report.verify.is_ok() {
        Ok(())
    } else {
        Err(SimulateError::Corrupt(report.verify.corrupt.len()).into())
    }
}

fn print_report(report: &SimulationReport) {
    println!(
        "Archive: checksum={} tag_scope={}",
        report.checksum, report.tag_scope
    );
    println!();

    println!("Writes:");
    for w in &report.writes {
        match w.index {
            Some(index) => println!("  [{}] id={:#06x} -> index {}", w.position, w.id, index),
            None => println!("  [{}] id={:#06x} -> {}", w.position, w.id, w.status),
        }
    }

    if !report.flips.is_empty() {
        println!();
        println!("Flipped offsets: {:?}", report.flips);
    }

    println!();
    println!(
        "Usage: {} / {} bytes ({} of {} records, {:.1}%)",
        report.usage.used_bytes,
        report.usage.capacity_bytes,
        report.usage.records,
        report.usage.max_records,
        report.usage.fill_ratio() * 100.0
    );

    println!();
    println!(
        "Verify: {} checked, {} valid, {} corrupt",
        report.verify.records_checked,
        report.verify.valid_records,
        report.verify.corrupt.len()
    );
    for c in &report.verify.corrupt {
        println!(
            "  {} {} stored={:04x} computed={:04x}",
            c.index, c.record_id, c.stored_tag, c.computed_tag
        );
    }

    println!();
    if report.verify.is_ok() {
        println!("✓ Archive verification passed");
    } else {
        println!("✗ Archive verification failed");
    }
}
