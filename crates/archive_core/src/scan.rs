//! Sequential playback and verification of stored records.

use crate::envelope::Envelope;
use crate::error::{ArchiveError, ArchiveResult};
use crate::store::ArchiveStore;
use crate::types::{RecordId, RecordIndex};
use serde::Serialize;

/// Iterator over every written record, in write order.
///
/// Created by [`ArchiveStore::records`].
#[derive(Debug)]
pub struct Records<'a> {
    store: &'a ArchiveStore,
    next: u32,
    end: u32,
}

impl<'a> Records<'a> {
    pub(crate) fn new(store: &'a ArchiveStore) -> Self {
        Self {
            store,
            next: 0,
            end: store.record_count(),
        }
    }
}

impl Iterator for Records<'_> {
    type Item = (RecordIndex, ArchiveResult<Envelope>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let index = RecordIndex::new(self.next);
        self.next += 1;
        Some((index, self.store.read_record(index)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Records<'_> {}

/// A record that failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorruptRecord {
    /// Position of the record.
    pub index: RecordIndex,
    /// Identifier as decoded. Untrusted.
    pub record_id: RecordId,
    /// Tag found in the envelope.
    pub stored_tag: u16,
    /// Tag recomputed on read.
    pub computed_tag: u16,
}

/// Outcome of [`ArchiveStore::verify`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct VerifyReport {
    /// Number of records read.
    pub records_checked: u32,
    /// Number of records whose tags matched.
    pub valid_records: u32,
    /// Records whose tags did not match, in index order.
    pub corrupt: Vec<CorruptRecord>,
}

impl VerifyReport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, index: RecordIndex, result: &ArchiveResult<Envelope>) {
        self.records_checked += 1;
        match result {
            Ok(_) => self.valid_records += 1,
            Err(ArchiveError::IntegrityError {
                stored,
                computed,
                envelope,
                ..
            }) => self.corrupt.push(CorruptRecord {
                index,
                record_id: envelope.record_id,
                stored_tag: *stored,
                computed_tag: *computed,
            }),
            // Indices come from the write frontier, so nothing else occurs.
            Err(_) => {}
        }
    }

    /// Returns true if no corruption was found.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.corrupt.is_empty()
    }
}
