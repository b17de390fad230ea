//! In-memory region backend.

use crate::backend::RegionBackend;
use crate::error::{StorageError, StorageResult};

/// A volatile, heap-allocated region.
///
/// Simulates a bank of non-volatile memory. The contents are lost when the
/// value is dropped.
///
/// # Example
///
/// ```rust
/// use archive_storage::{InMemoryRegion, RegionBackend};
///
/// let region = InMemoryRegion::new(4096);
/// assert_eq!(region.capacity(), 4096);
/// assert!(region.as_bytes().iter().all(|&b| b == 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryRegion {
    bytes: Box<[u8]>,
}

impl InMemoryRegion {
    /// Creates a zero-filled region of `capacity` bytes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    /// Creates a region holding pre-existing bytes.
    ///
    /// The capacity is the length of `bytes`. Useful for replaying a
    /// captured memory image in tests.
    #[must_use]
    pub fn with_data(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// Returns the raw contents of the region.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn check_range(&self, offset: usize, len: usize) -> StorageResult<usize> {
        let capacity = self.bytes.len();
        match offset.checked_add(len) {
            Some(end) if end <= capacity => Ok(end),
            _ => Err(StorageError::OutOfBounds {
                offset,
                len,
                capacity,
            }),
        }
    }
}

impl RegionBackend for InMemoryRegion {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn read_at(&self, offset: usize, len: usize) -> StorageResult<&[u8]> {
        let end = self.check_range(offset, len)?;
        Ok(&self.bytes[offset..end])
    }

    fn write_at(&mut self, offset: usize, data: &[u8]) -> StorageResult<()> {
        let end = self.check_range(offset, data.len())?;
        self.bytes[offset..end].copy_from_slice(data);
        Ok(())
    }

    fn zero(&mut self) {
        self.bytes.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn region_new_is_zeroed() {
        let region = InMemoryRegion::new(32);
        assert_eq!(region.capacity(), 32);
        assert!(region.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn region_write_then_read() {
        let mut region = InMemoryRegion::new(16);
        region.write_at(3, b"abc").unwrap();

        assert_eq!(region.read_at(3, 3).unwrap(), b"abc");
        assert_eq!(region.read_at(0, 3).unwrap(), &[0, 0, 0]);
    }

    #[test]
    fn region_write_at_exact_end() {
        let mut region = InMemoryRegion::new(8);
        region.write_at(4, &[1, 2, 3, 4]).unwrap();
        assert_eq!(region.read_at(4, 4).unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn region_write_past_end_fails_without_mutation() {
        let mut region = InMemoryRegion::new(8);
        let result = region.write_at(6, &[0xFF; 4]);

        assert_eq!(
            result,
            Err(StorageError::OutOfBounds {
                offset: 6,
                len: 4,
                capacity: 8
            })
        );
        assert!(region.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn region_read_past_end_fails() {
        let region = InMemoryRegion::new(8);
        assert!(matches!(
            region.read_at(9, 0),
            Err(StorageError::OutOfBounds { .. })
        ));
        assert!(matches!(
            region.read_at(4, 5),
            Err(StorageError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn region_offset_overflow_is_rejected() {
        let region = InMemoryRegion::new(8);
        assert!(region.read_at(usize::MAX, 2).is_err());
    }

    #[test]
    fn region_empty_read_at_end() {
        let region = InMemoryRegion::new(8);
        assert!(region.read_at(8, 0).unwrap().is_empty());
    }

    #[test]
    fn region_zero_clears_everything() {
        let mut region = InMemoryRegion::with_data(vec![0xAB; 12]);
        region.zero();
        assert_eq!(region.capacity(), 12);
        assert!(region.as_bytes().iter().all(|&b| b == 0));
    }

    proptest! {
        #[test]
        fn region_read_returns_last_write(
            offset in 0usize..64,
            data in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let mut region = InMemoryRegion::new(128);
            region.write_at(offset, &data).unwrap();
            prop_assert_eq!(region.read_at(offset, data.len()).unwrap(), &data[..]);
        }
    }
}
