//! Archive configuration.

use crate::checksum::ChecksumKind;
use crate::envelope::TagScope;

/// Default region size in bytes.
pub const DEFAULT_CAPACITY: usize = 4096;

/// Configuration for creating a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveConfig {
    /// Region size in bytes. Must hold at least one envelope.
    pub capacity: usize,

    /// Checksum used to seal and verify envelopes.
    pub checksum: ChecksumKind,

    /// Which envelope bytes the tag covers.
    pub tag_scope: TagScope,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            checksum: ChecksumKind::Crc16,
            tag_scope: TagScope::Payload,
        }
    }
}

impl ArchiveConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the region size.
    #[must_use]
    pub const fn capacity(mut self, bytes: usize) -> Self {
        self.capacity = bytes;
        self
    }

    /// Sets the checksum function.
    #[must_use]
    pub const fn checksum(mut self, kind: ChecksumKind) -> Self {
        self.checksum = kind;
        self
    }

    /// Sets the tag scope.
    #[must_use]
    pub const fn tag_scope(mut self, scope: TagScope) -> Self {
        self.tag_scope = scope;
        self
    }
}
