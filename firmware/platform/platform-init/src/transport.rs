//! # Hand-off Transport
//!
//! A GUID-keyed list of opaque blobs that survives the transition from the
//! pre-memory to the post-memory phase, the role a HOB list plays in real
//! firmware. Nothing here interprets the bytes.

use crate::error::PlatformError;
use alloc::vec::Vec;
use uefi::Guid;

/// One published blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffEntry {
    guid: Guid,
    data: Vec<u8>,
}

impl HandoffEntry {
    #[must_use]
    pub const fn guid(&self) -> Guid {
        self.guid
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Blobs published during a phase, in publication order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HandoffList {
    entries: Vec<HandoffEntry>,
}

impl HandoffList {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Copies `data` into the list under `guid`.
    ///
    /// # Errors
    /// - [`PlatformError::DuplicateHandoff`] if `guid` was already published.
    /// - [`PlatformError::OutOfMemory`] if the copy cannot be allocated.
    pub fn publish(&mut self, guid: Guid, data: &[u8]) -> Result<(), PlatformError> {
        if self.find(guid).is_some() {
            return Err(PlatformError::DuplicateHandoff(guid));
        }

        let mut copy = Vec::new();
        copy.try_reserve_exact(data.len())
            .map_err(|_| PlatformError::OutOfMemory)?;
        copy.extend_from_slice(data);
        self.entries
            .try_reserve(1)
            .map_err(|_| PlatformError::OutOfMemory)?;
        self.entries.push(HandoffEntry { guid, data: copy });
        Ok(())
    }

    #[must_use]
    pub fn find(&self, guid: Guid) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.guid == guid)
            .map(HandoffEntry::data)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &HandoffEntry> {
        self.entries.iter()
    }
}
