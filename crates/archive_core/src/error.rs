//! Error types for archive operations.

use crate::envelope::Envelope;
use crate::types::RecordIndex;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors that can occur in archive operations.
///
/// Every variant is reported before any state changes, except
/// [`ArchiveError::IntegrityError`] which is purely a read-side verdict.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The caller supplied an out-of-contract argument.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the rejected argument.
        message: String,
    },

    /// Another envelope does not fit in the region.
    #[error("archive full: {usage} of {capacity} bytes used, {needed} more needed")]
    Full {
        /// Bytes consumed at the time of the rejected write.
        usage: u64,
        /// Region capacity in bytes.
        capacity: u64,
        /// Size of the envelope that did not fit.
        needed: u64,
    },

    /// The index names a slot beyond the write frontier.
    #[error("record {index} not found: {records} records written")]
    NotFound {
        /// The requested index.
        index: RecordIndex,
        /// Number of records currently written.
        records: u32,
    },

    /// The stored tag disagrees with the tag recomputed on read.
    ///
    /// The decoded envelope is attached for diagnostics only. None of its
    /// fields can be trusted.
    #[error("integrity error at record {index}: stored tag {stored:04x}, computed {computed:04x}")]
    IntegrityError {
        /// The index of the corrupted record.
        index: RecordIndex,
        /// Tag found in the envelope.
        stored: u16,
        /// Tag recomputed from the envelope contents.
        computed: u16,
        /// The envelope as decoded from the region.
        envelope: Box<Envelope>,
    },

    /// Region access failed.
    #[error("storage error: {0}")]
    Storage(#[from] archive_storage::StorageError),
}

impl ArchiveError {
    /// Creates an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Returns true if this error reports detected corruption.
    #[must_use]
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, Self::IntegrityError { .. })
    }

    /// Returns the flat status code for this error.
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidParameter { .. } | Self::Storage(_) => Status::InvalidParameter,
            Self::Full { .. } => Status::Full,
            Self::NotFound { .. } => Status::NotFound,
            Self::IntegrityError { .. } => Status::IntegrityError,
        }
    }
}

/// Flat outcome code of an archive operation.
///
/// Mirrors the status values reported to ground: useful where a caller needs
/// a comparable, serializable verdict rather than the full error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The operation succeeded.
    Ok,
    /// An argument was rejected.
    InvalidParameter,
    /// The region has no room for another envelope.
    Full,
    /// No record at the requested index.
    NotFound,
    /// Corruption was detected.
    IntegrityError,
}

impl Status {
    /// Derives the status of an operation result.
    #[must_use]
    pub fn of<T>(result: &ArchiveResult<T>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(e) => e.status(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ok => "ok",
            Self::InvalidParameter => "invalid_parameter",
            Self::Full => "full",
            Self::NotFound => "not_found",
            Self::IntegrityError => "integrity_error",
        };
        f.write_str(s)
    }
}
