//! Storage abstraction layer for Pike.
//!
//! This module exposes a single read-only byte source contract shared by heap
//! buffers, memory-mapped files and bounded views into either. Code that
//! consumes bytes takes a [`StoragePointer`] and never needs to know which
//! backend produced it.
//!
//! # Architecture
//!
//! - **Storage trait**: `data()`/`size()` plus the derived conversions
//! - **StoragePointer**: `Arc<dyn Storage>`, the shared handle every factory returns
//! - **create_view**: slices a handle without copying, keeping the parent alive
//!
//! # Storage Types
//!
//! ## MemoryStorage
//! - Owns a fixed-size heap buffer
//! - Mutable only while uniquely owned, frozen by `into_shared`
//!
//! ## FileStorage
//! - Owns an open file and its read-only memory mapping
//! - Unmapped and closed exactly once when the last handle drops
//!
//! ## ViewStorage
//! - A `[offset, offset + size)` window into another storage
//!
//! # Example
//!
//! ```
//! use pike::storage::Storage;
//! use pike::storage::memory::MemoryStorage;
//!
//! # fn main() -> pike::error::Result<()> {
//! let storage = MemoryStorage::from_slice(b"hello, world").into_shared();
//!
//! let view = storage.create_view(5, 7)?;
//! assert_eq!(view.data(), b"world");
//!
//! // A size of zero means "through the end".
//! let tail = storage.create_view(0, 7)?;
//! assert_eq!(tail.data(), b"world");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod file;
pub mod memory;
pub mod view;

use file::FileStorage;
use memory::MemoryStorage;
use view::ViewStorage;

/// Shared, immutable handle to any storage backend.
pub type StoragePointer = Arc<dyn Storage>;

/// The backing representation of a storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Heap-allocated buffer.
    Memory,
    /// Memory-mapped file.
    File,
    /// Window into another storage.
    View,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Memory => write!(f, "memory"),
            StorageKind::File => write!(f, "file"),
            StorageKind::View => write!(f, "view"),
        }
    }
}

/// A read-only window over bytes of known length.
///
/// Implementations must return a slice of exactly `size()` bytes from
/// `data()`, and the slice must stay valid for as long as the storage itself.
/// An empty storage returns an empty slice.
pub trait Storage: Send + Sync + fmt::Debug {
    /// The bytes exposed by this storage.
    fn data(&self) -> &[u8];

    /// Number of bytes exposed by this storage.
    fn size(&self) -> usize {
        self.data().len()
    }

    /// Whether the storage holds no bytes.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// The backing representation.
    fn kind(&self) -> StorageKind;

    /// Write these bytes to `path` and map the result.
    ///
    /// Any previous file at `path` is replaced, even the one the receiver is
    /// mapped from. The receiver is left untouched and any I/O failure is
    /// returned as is.
    ///
    /// # Example
    ///
    /// ```
    /// use pike::storage::Storage;
    /// use pike::storage::memory::MemoryStorage;
    ///
    /// # fn main() -> pike::error::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("blob.bin");
    ///
    /// let memory = MemoryStorage::from_slice(b"persist me");
    /// let file = memory.to_file_storage(&path)?;
    /// assert_eq!(file.data(), b"persist me");
    /// # Ok(())
    /// # }
    /// ```
    fn to_file_storage(&self, path: &Path) -> Result<StoragePointer> {
        FileStorage::create(path, self.size(), Some(self.data()))
    }

    /// Copy these bytes into a new heap buffer.
    fn to_memory_storage(&self) -> StoragePointer {
        trace!("Copying {} bytes of {} storage to memory", self.size(), self.kind());
        MemoryStorage::from_slice(self.data()).into_shared()
    }
}

impl dyn Storage {
    /// Create a view over `[offset, offset + size)` of this storage.
    ///
    /// A `size` of zero selects everything from `offset` to the end. Ranges
    /// that do not fit are rejected with
    /// [`PikeError::InvalidRange`](crate::error::PikeError::InvalidRange);
    /// nothing is clamped. The view holds a reference to this storage, so the
    /// bytes stay valid after every other handle is dropped.
    pub fn create_view(self: &Arc<Self>, size: usize, offset: usize) -> Result<StoragePointer> {
        let size = if size == 0 {
            self.size().saturating_sub(offset)
        } else {
            size
        };
        let view = ViewStorage::new(Arc::clone(self), size, offset)?;
        Ok(Arc::new(view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PikeError;

    fn sample() -> StoragePointer {
        MemoryStorage::from_slice(b"0123456789").into_shared()
    }

    #[test]
    fn test_create_view_bounds() {
        let storage = sample();

        let view = storage.create_view(3, 2).unwrap();
        assert_eq!(view.size(), 3);
        assert_eq!(view.data(), b"234");
        assert_eq!(view.kind(), StorageKind::View);

        let view = storage.create_view(10, 0).unwrap();
        assert_eq!(view.data(), storage.data());
    }

    #[test]
    fn test_create_view_zero_size_means_rest() {
        let storage = sample();

        assert_eq!(storage.create_view(0, 0).unwrap().data(), b"0123456789");
        assert_eq!(storage.create_view(0, 6).unwrap().data(), b"6789");

        let empty = storage.create_view(0, 10).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.data(), b"");
    }

    #[test]
    fn test_create_view_rejects_out_of_range() {
        let storage = sample();

        let err = storage.create_view(5, 6).unwrap_err();
        match err {
            PikeError::InvalidRange {
                offset,
                size,
                available,
            } => {
                assert_eq!(offset, 6);
                assert_eq!(size, 5);
                assert_eq!(available, 10);
            }
            other => panic!("Expected InvalidRange, got {other:?}"),
        }

        assert!(storage.create_view(0, 11).unwrap_err().is_invalid_range());
        assert!(storage.create_view(1, 11).unwrap_err().is_invalid_range());
        assert!(
            storage
                .create_view(usize::MAX, 1)
                .unwrap_err()
                .is_invalid_range()
        );
    }

    #[test]
    fn test_view_outlives_source_handle() {
        let storage = sample();
        let view = storage.create_view(4, 3).unwrap();
        drop(storage);

        assert_eq!(view.data(), b"3456");
    }

    #[test]
    fn test_to_memory_storage_copies() {
        let storage = sample();
        let view = storage.create_view(4, 2).unwrap();

        let copy = view.to_memory_storage();
        assert_eq!(copy.kind(), StorageKind::Memory);
        assert_eq!(copy.size(), 4);
        assert_eq!(copy.data(), b"2345");
        assert_ne!(copy.data().as_ptr(), view.data().as_ptr());
    }

    #[test]
    fn test_storage_kind_display() {
        assert_eq!(StorageKind::Memory.to_string(), "memory");
        assert_eq!(StorageKind::File.to_string(), "file");
        assert_eq!(StorageKind::View.to_string(), "view");
        assert_eq!(
            serde_json::to_string(&StorageKind::View).unwrap(),
            "\"view\""
        );
    }
}
