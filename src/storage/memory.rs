//! In-memory storage backed by a fixed-size heap buffer.

use std::fmt;
use std::sync::Arc;

use crate::error::{PikeError, Result};
use crate::storage::{Storage, StorageKind, StoragePointer};

/// A heap buffer exposed through the [`Storage`] contract.
///
/// The buffer length is fixed at construction. While the value is owned
/// directly it can be filled in place through [`data_mut`](Self::data_mut),
/// for example by decoding straight into it. [`into_shared`](Self::into_shared)
/// freezes it into a [`StoragePointer`], after which it is read-only.
///
/// # Example
///
/// ```
/// use pike::storage::Storage;
/// use pike::storage::memory::MemoryStorage;
///
/// let mut storage = MemoryStorage::zeroed(4);
/// storage.data_mut().copy_from_slice(&[1, 2, 3, 4]);
///
/// let shared = storage.into_shared();
/// assert_eq!(shared.data(), &[1, 2, 3, 4]);
/// ```
pub struct MemoryStorage {
    buffer: Box<[u8]>,
}

impl MemoryStorage {
    /// Create a buffer of `size` bytes.
    ///
    /// With a source, exactly `size` bytes are copied from it and a source
    /// shorter than `size` is rejected. Without one the buffer is zero-filled.
    pub fn new(size: usize, data: Option<&[u8]>) -> Result<Self> {
        match data {
            Some(source) => {
                let bytes = source
                    .get(..size)
                    .ok_or_else(|| PikeError::invalid_range(0, size, source.len()))?;
                Ok(Self::from_slice(bytes))
            }
            None => Ok(Self::zeroed(size)),
        }
    }

    /// Create a zero-filled buffer.
    pub fn zeroed(size: usize) -> Self {
        MemoryStorage {
            buffer: vec![0u8; size].into_boxed_slice(),
        }
    }

    /// Create a buffer holding a copy of `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Self {
        MemoryStorage {
            buffer: Box::from(bytes),
        }
    }

    /// Mutable access to the buffer for populate-after-construct use.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Freeze into a shared read-only handle.
    pub fn into_shared(self) -> StoragePointer {
        Arc::new(self)
    }
}

impl From<Vec<u8>> for MemoryStorage {
    fn from(bytes: Vec<u8>) -> Self {
        MemoryStorage {
            buffer: bytes.into_boxed_slice(),
        }
    }
}

impl Storage for MemoryStorage {
    fn data(&self) -> &[u8] {
        &self.buffer
    }

    fn size(&self) -> usize {
        self.buffer.len()
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Memory
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("size", &self.buffer.len())
            .finish()
    }
}
