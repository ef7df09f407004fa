//! Memory-mapped file storage.
//!
//! A [`FileStorage`] owns one open file and one read-only mapping of its full
//! length. Both are acquired in the constructor and released together when
//! the storage is dropped, so every live handle (including views) can read
//! the mapped bytes without further checks.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};
use memmap2::{Mmap, MmapOptions};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{PikeError, Result};
use crate::storage::{Storage, StorageKind, StoragePointer};

/// Configuration for creating and mapping files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Buffer size used when writing file contents.
    pub buffer_size: usize,

    /// Whether to sync a newly written file to disk before mapping it.
    pub sync_writes: bool,

    /// Whether to prefault the mapping when it is created.
    pub populate: bool,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        FileStorageConfig {
            buffer_size: 65536, // 64KB
            sync_writes: false,
            populate: false,
        }
    }
}

impl FileStorageConfig {
    /// Set the write buffer size. Zero disables buffering.
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Sync newly written files before mapping them.
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// Prefault mappings.
    pub fn with_populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }
}

/// A read-only memory mapping of a whole file.
///
/// Not `Clone`: the descriptor and mapping are a single OS resource and are
/// released exactly once, in `Drop`.
pub struct FileStorage {
    path: PathBuf,
    file: File,
    /// `None` for zero-length files, which cannot be mapped portably.
    mmap: Option<Mmap>,
}

impl FileStorage {
    /// Write `size` bytes to `path` and map the result.
    ///
    /// The file is written beside `path` and renamed over it, replacing any
    /// previous file. With `data`, its first `size` bytes are written and a
    /// shorter slice is rejected before the file system is touched; without
    /// it the file is zero-filled.
    ///
    /// # Example
    ///
    /// ```
    /// use pike::storage::Storage;
    /// use pike::storage::file::FileStorage;
    ///
    /// # fn main() -> pike::error::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let path = dir.path().join("zeros.bin");
    ///
    /// let storage = FileStorage::create(&path, 8, None)?;
    /// assert_eq!(storage.data(), &[0u8; 8]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn create<P: AsRef<Path>>(
        path: P,
        size: usize,
        data: Option<&[u8]>,
    ) -> Result<StoragePointer> {
        Self::create_with_config(path, size, data, &FileStorageConfig::default())
    }

    /// Like [`create`](Self::create), with explicit write and mapping options.
    pub fn create_with_config<P: AsRef<Path>>(
        path: P,
        size: usize,
        data: Option<&[u8]>,
        config: &FileStorageConfig,
    ) -> Result<StoragePointer> {
        let path = path.as_ref();

        let contents = match data {
            Some(source) => Some(
                source
                    .get(..size)
                    .ok_or_else(|| PikeError::invalid_range(0, size, source.len()))?,
            ),
            None => None,
        };

        write_file(path, size, contents, config)?;
        debug!("Created {} ({size} bytes)", path.display());

        let storage = Self::open_with_config(path, config)?;
        Ok(Arc::new(storage))
    }

    /// Open `path` and map its full current length.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(path, &FileStorageConfig::default())
    }

    /// Like [`open`](Self::open), with explicit mapping options.
    pub fn open_with_config<P: AsRef<Path>>(path: P, config: &FileStorageConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = File::open(&path).map_err(|e| PikeError::open_failed(&path, e))?;
        let metadata = file.metadata().map_err(|e| PikeError::open_failed(&path, e))?;
        if metadata.is_dir() {
            return Err(PikeError::map_failed(
                &path,
                io::Error::from(io::ErrorKind::IsADirectory),
            ));
        }

        let len = metadata.len();
        let len = usize::try_from(len).map_err(|_| {
            PikeError::map_failed(
                &path,
                io::Error::other(format!("{len} bytes exceeds the address space")),
            )
        })?;

        let mmap = if len == 0 {
            None
        } else {
            let mut options = MmapOptions::new();
            options.len(len);
            if config.populate {
                options.populate();
            }

            // SAFETY: the mapping is read-only and lives no longer than `file`.
            // Callers must not truncate the file while it is mapped; files
            // written here are replaced by rename, never truncated in place.
            let mmap = unsafe { options.map(&file) }.map_err(|e| PikeError::map_failed(&path, e))?;
            Some(mmap)
        };

        debug!("Mapped {} ({len} bytes)", path.display());

        Ok(FileStorage { path, file, mmap })
    }

    /// The path this storage was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Fill a temporary file next to `path` with `size` bytes and rename it over
/// `path`.
///
/// Existing mappings of `path` keep the replaced inode, so a storage can be
/// written over the file it is mapped from.
fn write_file(
    path: &Path,
    size: usize,
    contents: Option<&[u8]>,
    config: &FileStorageConfig,
) -> Result<()> {
    let fail = |e: io::Error| PikeError::write_failed(path, e);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp_file = NamedTempFile::new_in(dir).map_err(fail)?;

    let temp_file = match contents {
        Some(bytes) => {
            let mut writer = BufWriter::with_capacity(config.buffer_size.max(1), temp_file);
            writer.write_all(bytes).map_err(fail)?;
            writer.into_inner().map_err(|e| fail(e.into_error()))?
        }
        None => {
            temp_file.as_file().set_len(size as u64).map_err(fail)?;
            temp_file
        }
    };

    if config.sync_writes {
        temp_file.as_file().sync_all().map_err(fail)?;
    }

    temp_file.persist(path).map_err(|e| fail(e.error))?;
    Ok(())
}

impl Storage for FileStorage {
    fn data(&self) -> &[u8] {
        match &self.mmap {
            Some(mmap) => &mmap[..],
            None => &[],
        }
    }

    fn kind(&self) -> StorageKind {
        StorageKind::File
    }
}

impl Drop for FileStorage {
    fn drop(&mut self) {
        let mapped = self.mmap.as_ref().map_or(0, |mmap| mmap.len());

        match self.file.metadata() {
            Ok(metadata) if metadata.len() != mapped as u64 => warn!(
                "{} changed length while mapped ({mapped} -> {} bytes)",
                self.path.display(),
                metadata.len()
            ),
            Ok(_) => {}
            Err(e) => warn!("Could not stat {} on release: {e}", self.path.display()),
        }

        // Unmap before the descriptor is closed with the remaining fields.
        drop(self.mmap.take());
        debug!("Released {} ({mapped} bytes)", self.path.display());
    }
}

impl fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStorage")
            .field("path", &self.path)
            .field("size", &self.size())
            .finish()
    }
}
