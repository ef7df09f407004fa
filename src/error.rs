//! Error types for the Pike library.
//!
//! All fallible operations return [`PikeError`] through the crate-wide
//! [`Result`] alias. Storage construction failures carry the path that was
//! being opened, mapped or written, so callers can report them without
//! threading extra context around.
//!
//! # Examples
//!
//! ```
//! use pike::error::{PikeError, Result};
//!
//! fn check(offset: usize, size: usize, available: usize) -> Result<()> {
//!     Err(PikeError::invalid_range(offset, size, available))
//! }
//!
//! let err = check(8, 4, 10).unwrap_err();
//! assert!(err.is_invalid_range());
//! ```

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The main error type for Pike operations.
#[derive(Error, Debug)]
pub enum PikeError {
    /// The file to open does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The file exists but could not be opened or inspected.
    #[error("Failed to open {}: {source}", path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was opened but the memory mapping could not be established.
    #[error("Failed to map {}: {source}", path.display())]
    MapFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Creating, writing, syncing or renaming a file failed.
    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A requested byte range does not fit inside its source.
    #[error("Invalid range: offset {offset} + size {size} exceeds {available} bytes")]
    InvalidRange {
        offset: usize,
        size: usize,
        available: usize,
    },

    /// I/O errors outside storage construction.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for operations that may fail with PikeError.
pub type Result<T> = std::result::Result<T, PikeError>;

impl PikeError {
    /// Create an open error, distinguishing a missing file from other failures.
    pub fn open_failed<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            PikeError::FileNotFound { path }
        } else {
            PikeError::OpenFailed { path, source }
        }
    }

    /// Create a mapping error.
    pub fn map_failed<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        PikeError::MapFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a write error.
    pub fn write_failed<P: AsRef<Path>>(path: P, source: io::Error) -> Self {
        PikeError::WriteFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a range error.
    pub fn invalid_range(offset: usize, size: usize, available: usize) -> Self {
        PikeError::InvalidRange {
            offset,
            size,
            available,
        }
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        PikeError::InvalidArgument(msg.into())
    }

    /// Whether this error reports an out-of-bounds range.
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, PikeError::InvalidRange { .. })
    }

    /// Whether this error reports a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PikeError::FileNotFound { .. })
    }
}
