//! Stress tests for the archive.
//!
//! These harnesses hammer a [`SharedArchive`] from several threads and
//! report throughput. Every read is verified, so a torn envelope shows up
//! as a failed operation.

use archive_core::{ArchiveConfig, ArchiveError, RecordId, RecordIndex, SharedArchive};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Reads performed by each reader thread.
    pub reads_per_thread: usize,
    /// Number of reader threads.
    pub readers: usize,
    /// Number of writer threads.
    pub writers: usize,
    /// Payload size in bytes.
    pub payload_size: usize,
    /// Region size; bounds the number of writes that can succeed.
    pub capacity: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            reads_per_thread: 2_000,
            readers: 4,
            writers: 2,
            payload_size: 64,
            capacity: 134 * 256,
        }
    }
}

/// Run concurrent writers and readers against one shared store.
///
/// Writers keep appending until the store is full. Readers repeatedly read
/// every index below the current frontier. `Full` is counted as a success
/// for writers; anything other than `Ok` is a failure for readers.
pub fn stress_concurrent_access(config: &StressConfig) -> StressTestResult {
    let archive = SharedArchive::with_config(ArchiveConfig::new().capacity(config.capacity))
        .expect("Invalid stress configuration");
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let payload = vec![0x5Au8; config.payload_size];

    let start = Instant::now();
    let mut handles = Vec::new();

    for w in 0..config.writers {
        let archive = archive.clone();
        let successful = Arc::clone(&successful);
        let failed = Arc::clone(&failed);
        let payload = payload.clone();
        handles.push(thread::spawn(move || loop {
            match archive.write_record(RecordId::new(w as u16), &payload) {
                Ok(_) => {
                    successful.fetch_add(1, Ordering::Relaxed);
                }
                Err(ArchiveError::Full { .. }) => {
                    successful.fetch_add(1, Ordering::Relaxed);
                    break;
                }
                Err(_) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    break;
                }
            }
        }));
    }

    for r in 0..config.readers {
        let archive = archive.clone();
        let successful = Arc::clone(&successful);
        let failed = Arc::clone(&failed);
        let reads = config.reads_per_thread;
        handles.push(thread::spawn(move || {
            for i in 0..reads {
                let records = archive.usage_report().records;
                if records == 0 {
                    continue;
                }
                let index = RecordIndex::new(((i + r) % records as usize) as u32);
                match archive.read_record(index) {
                    Ok(_) => successful.fetch_add(1, Ordering::Relaxed),
                    Err(_) => failed.fetch_add(1, Ordering::Relaxed),
                };
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Stress thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrent_access_has_no_failures() {
        let config = StressConfig {
            reads_per_thread: 500,
            ..StressConfig::default()
        };
        let result = stress_concurrent_access(&config);
        assert_eq!(result.failed_ops, 0);
        // 256 writes plus one Full per writer at least.
        assert!(result.successful_ops >= 256 + config.writers);
    }
}
