//! Core type definitions for the archive.

use serde::Serialize;
use std::fmt;

/// Caller-supplied record identifier.
///
/// Opaque to the store: identifiers are neither interpreted nor required to
/// be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct RecordId(pub u16);

impl RecordId {
    /// Creates a new record ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }
}

impl From<u16> for RecordId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id:{:#06x}", self.0)
    }
}

/// Position of a record in write order, starting at 0.
///
/// Because every envelope has the same size, an index maps to a region
/// offset by a single multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct RecordIndex(pub u32);

impl RecordIndex {
    /// Creates a new record index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the index as a `usize`.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Returns the next index.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u32> for RecordIndex {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl fmt::Display for RecordIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Logical state of a store.
///
/// "Full" is deliberately absent: running out of capacity is a rejection of
/// a single write, not a state the store moves into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreState {
    /// Nothing written since the last initialization.
    Empty,
    /// At least one record written.
    Populated,
}

impl fmt::Display for StoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::Populated => f.write_str("populated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_display() {
        assert_eq!(RecordId::new(0xAA).to_string(), "id:0x00aa");
        assert_eq!(RecordId::from(7).as_u16(), 7);
    }

    #[test]
    fn record_index_ordering() {
        let a = RecordIndex::new(1);
        let b = a.next();
        assert!(a < b);
        assert_eq!(b.as_u32(), 2);
        assert_eq!(b.to_string(), "#2");
    }

    #[test]
    fn store_state_display() {
        assert_eq!(StoreState::Empty.to_string(), "empty");
        assert_eq!(StoreState::Populated.to_string(), "populated");
    }
}
