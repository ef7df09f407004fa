//! Bounded views into another storage.

use log::trace;

use crate::error::{PikeError, Result};
use crate::storage::{Storage, StorageKind, StoragePointer};

/// A `[offset, offset + size)` window into an owner storage.
///
/// The view keeps its owner alive through a shared handle, so the bytes it
/// exposes stay valid for its whole lifetime no matter what happens to other
/// handles of the owner. Bounds are checked once, in [`new`](Self::new).
#[derive(Debug)]
pub struct ViewStorage {
    owner: StoragePointer,
    offset: usize,
    size: usize,
}

impl ViewStorage {
    /// Create a view of `size` bytes starting at `offset` within `owner`.
    pub fn new(owner: StoragePointer, size: usize, offset: usize) -> Result<Self> {
        let available = owner.size();
        offset
            .checked_add(size)
            .filter(|&end| end <= available)
            .ok_or_else(|| PikeError::invalid_range(offset, size, available))?;

        trace!("Viewing {size} bytes at {offset} of {} storage", owner.kind());

        Ok(ViewStorage {
            owner,
            offset,
            size,
        })
    }

    /// The storage this view reads from.
    pub fn owner(&self) -> &StoragePointer {
        &self.owner
    }

    /// Position of the first viewed byte within the owner.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Storage for ViewStorage {
    fn data(&self) -> &[u8] {
        &self.owner.data()[self.offset..self.offset + self.size]
    }

    fn size(&self) -> usize {
        self.size
    }

    fn kind(&self) -> StorageKind {
        StorageKind::View
    }
}
