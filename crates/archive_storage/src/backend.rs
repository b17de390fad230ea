//! Region backend trait definition.

use crate::error::StorageResult;

/// A fixed-capacity byte region.
///
/// Regions are **opaque byte areas**. The archive owns all layout
/// interpretation - regions do not understand envelopes or cursors.
///
/// # Invariants
///
/// - `capacity` never changes over the lifetime of the region
/// - `read_at` returns exactly the bytes last written at that range
/// - A failed `write_at` leaves the region unchanged
/// - `zero` sets every byte of the region to `0x00`
pub trait RegionBackend: Send + Sync {
    /// Returns the total size of the region in bytes.
    fn capacity(&self) -> usize;

    /// Borrows `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::OutOfBounds`] if the range does not
    /// lie entirely inside the region.
    fn read_at(&self, offset: usize, len: usize) -> StorageResult<&[u8]>;

    /// Copies `data` into the region starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::OutOfBounds`] if the range does not
    /// lie entirely inside the region. Nothing is written in that case.
    fn write_at(&mut self, offset: usize, data: &[u8]) -> StorageResult<()>;

    /// Overwrites the whole region with zero bytes.
    fn zero(&mut self);
}
