//! Error types for region operations.

use thiserror::Error;

/// Result type for region operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during region operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Attempted to access bytes outside the region.
    #[error("access outside region: offset {offset}, len {len}, capacity {capacity}")]
    OutOfBounds {
        /// The requested offset.
        offset: usize,
        /// The requested length.
        len: usize,
        /// The region capacity.
        capacity: usize,
    },
}
