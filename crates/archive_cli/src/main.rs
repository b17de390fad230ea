//! Archive CLI
//!
//! Ground-test simulator for the record archive.
//!
//! # Commands
//!
//! - `layout` - Print the envelope byte layout
//! - `simulate` - Replay a records file into a fresh archive, inject faults, verify

mod commands;

use archive_core::{ChecksumKind, TagScope, DEFAULT_CAPACITY};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Record archive ground-test tools.
#[derive(Parser)]
#[command(name = "archive")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the envelope byte layout
    Layout {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Write records from a JSON file into a fresh archive and verify them
    Simulate {
        /// JSON array of {"id": u16, "data": [u8, ...]}
        records: PathBuf,

        /// Region size in bytes
        #[arg(short, long, default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,

        /// Checksum function (xor, crc16)
        #[arg(long, default_value = "crc16")]
        checksum: ChecksumKind,

        /// Bytes covered by the tag (payload, envelope)
        #[arg(long, default_value = "payload")]
        tag_scope: TagScope,

        /// Region offset to invert after writing; may be repeated
        #[arg(long = "flip", value_name = "OFFSET")]
        flips: Vec<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Layout { format } => {
            commands::layout::run(&format)?;
        }
        Commands::Simulate {
            records,
            capacity,
            checksum,
            tag_scope,
            flips,
            format,
        } => {
            let options = commands::simulate::SimulateOptions {
                capacity,
                checksum,
                tag_scope,
                flips,
            };
            commands::simulate::run(&records, &options, &format)?;
        }
        Commands::Version => {
            println!("Archive CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Archive Core v{}", archive_core::VERSION);
        }
    }

    Ok(())
}
