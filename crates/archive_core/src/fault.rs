//! Byte-level corruption hooks for exercising integrity checks.
//!
//! Only compiled for this crate's tests or with the `fault-injection`
//! feature. Flight builds must not enable it.

use crate::store::ArchiveStore;

/// Simulated radiation damage to a store's region.
///
/// Offsets are absolute positions in the region. Offsets outside the
/// region are ignored.
pub trait FaultInjection {
    /// Inverts all eight bits of the byte at `byte_offset`.
    fn corrupt(&mut self, byte_offset: usize);

    /// Inverts bit `bit % 8` of the byte at `byte_offset`.
    fn flip_bit(&mut self, byte_offset: usize, bit: u8);
}

impl FaultInjection for ArchiveStore {
    fn corrupt(&mut self, byte_offset: usize) {
        self.xor_region_byte(byte_offset, 0xFF);
    }

    fn flip_bit(&mut self, byte_offset: usize, bit: u8) {
        self.xor_region_byte(byte_offset, 1 << (bit % 8));
    }
}
