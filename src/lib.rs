//! # Pike
//!
//! Uniform read-only access to bytes, whatever holds them.
//!
//! ## Features
//!
//! - Heap buffers, memory-mapped files and zero-copy views behind one trait
//! - Views keep their source alive through shared ownership
//! - Materialize any storage to a new file or heap buffer
//! - Mappings are released exactly once, when the last handle drops

pub mod cli;
pub mod error;
pub mod storage;

pub mod prelude {
    pub use crate::error::{PikeError, Result};
    pub use crate::storage::file::{FileStorage, FileStorageConfig};
    pub use crate::storage::memory::MemoryStorage;
    pub use crate::storage::view::ViewStorage;
    pub use crate::storage::{Storage, StorageKind, StoragePointer};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
