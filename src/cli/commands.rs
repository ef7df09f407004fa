//! Command implementations for the Pike CLI.

use std::sync::Arc;
use std::time::Instant;

use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::storage::{Storage, StoragePointer};
use crate::storage::file::{FileStorage, FileStorageConfig};

/// Execute a CLI command.
pub fn execute_command(args: PikeArgs) -> Result<()> {
    match &args.command {
        Command::Inspect(inspect_args) => {
            let result = inspect_file(inspect_args)?;
            output_result("Storage inspected", &result, &args)
        }
        Command::Slice(slice_args) => {
            let result = slice_file(slice_args)?;
            output_result("Range written", &result, &args)
        }
        Command::Copy(copy_args) => {
            let result = copy_file(copy_args)?;
            output_result("File copied", &result, &args)
        }
        Command::Create(create_args) => {
            let result = create_file(create_args)?;
            output_result("File created", &result, &args)
        }
    }
}

/// Map a file, narrow it to the requested range and describe it.
pub fn inspect_file(args: &InspectArgs) -> Result<InspectResult> {
    let config = FileStorageConfig::default().with_populate(args.populate);
    let file: StoragePointer = Arc::new(FileStorage::open_with_config(&args.path, &config)?);
    let file_size = file.size();

    let storage = if args.offset == 0 && args.length == 0 {
        file
    } else {
        file.create_view(args.length, args.offset)?
    };

    let preview_len = args.preview.min(storage.size());

    Ok(InspectResult {
        path: args.path.to_string_lossy().to_string(),
        kind: storage.kind(),
        file_size,
        offset: args.offset,
        size: storage.size(),
        preview: hex_preview(&storage.data()[..preview_len]),
    })
}

/// Write a byte range of the source into the destination.
pub fn slice_file(args: &SliceArgs) -> Result<MaterializeResult> {
    let start = Instant::now();

    let source: StoragePointer = Arc::new(FileStorage::open(&args.source)?);
    let view = source.create_view(args.length, args.offset)?;
    info!(
        "Slicing {} bytes at {} from {}",
        view.size(),
        args.offset,
        args.source.display()
    );

    let written = view.to_file_storage(&args.destination)?;

    Ok(MaterializeResult {
        source: Some(args.source.to_string_lossy().to_string()),
        destination: args.destination.to_string_lossy().to_string(),
        bytes_written: written.size(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Copy the source into the destination, optionally through memory.
pub fn copy_file(args: &CopyArgs) -> Result<MaterializeResult> {
    let start = Instant::now();

    let mut source: StoragePointer = Arc::new(FileStorage::open(&args.source)?);
    if args.via_memory {
        info!("Loading {} into memory", args.source.display());
        source = source.to_memory_storage();
    }

    let written = source.to_file_storage(&args.destination)?;

    Ok(MaterializeResult {
        source: Some(args.source.to_string_lossy().to_string()),
        destination: args.destination.to_string_lossy().to_string(),
        bytes_written: written.size(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Create a zero-filled file of the requested size.
pub fn create_file(args: &CreateArgs) -> Result<MaterializeResult> {
    let start = Instant::now();

    let config = FileStorageConfig::default().with_sync_writes(args.sync);
    let written = FileStorage::create_with_config(&args.path, args.size, None, &config)?;

    Ok(MaterializeResult {
        source: None,
        destination: args.path.to_string_lossy().to_string(),
        bytes_written: written.size(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_sample(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("sample.bin");
        std::fs::write(&path, (0u8..64).collect::<Vec<_>>()).unwrap();
        path
    }

    #[test]
    fn test_inspect_whole_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_sample(&temp_dir);

        let result = inspect_file(&InspectArgs {
            path,
            offset: 0,
            length: 0,
            preview: 4,
            populate: false,
        })
        .unwrap();

        assert_eq!(result.kind, StorageKind::File);
        assert_eq!(result.file_size, 64);
        assert_eq!(result.size, 64);
        assert_eq!(result.preview, "00 01 02 03");
    }

    #[test]
    fn test_inspect_range() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_sample(&temp_dir);

        let result = inspect_file(&InspectArgs {
            path: path.clone(),
            offset: 60,
            length: 0,
            preview: 16,
            populate: true,
        })
        .unwrap();

        assert_eq!(result.kind, StorageKind::View);
        assert_eq!(result.size, 4);
        assert_eq!(result.preview, "3c 3d 3e 3f");

        let err = inspect_file(&InspectArgs {
            path,
            offset: 60,
            length: 8,
            preview: 16,
            populate: false,
        })
        .unwrap_err();
        assert!(err.is_invalid_range());
    }

    #[test]
    fn test_slice_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_sample(&temp_dir);
        let destination = temp_dir.path().join("slice.bin");

        let result = slice_file(&SliceArgs {
            source,
            destination: destination.clone(),
            offset: 10,
            length: 5,
        })
        .unwrap();

        assert_eq!(result.bytes_written, 5);
        assert_eq!(std::fs::read(&destination).unwrap(), vec![10, 11, 12, 13, 14]);
    }

    #[test]
    fn test_copy_file_via_memory() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_sample(&temp_dir);
        let destination = temp_dir.path().join("copy.bin");

        for via_memory in [false, true] {
            let result = copy_file(&CopyArgs {
                source: source.clone(),
                destination: destination.clone(),
                via_memory,
            })
            .unwrap();

            assert_eq!(result.bytes_written, 64);
            assert_eq!(
                std::fs::read(&destination).unwrap(),
                std::fs::read(&source).unwrap()
            );
        }
    }

    #[test]
    fn test_same_source_and_destination() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_sample(&temp_dir);

        let result = slice_file(&SliceArgs {
            source: source.clone(),
            destination: source.clone(),
            offset: 8,
            length: 4,
        })
        .unwrap();
        assert_eq!(result.bytes_written, 4);
        assert_eq!(std::fs::read(&source).unwrap(), vec![8, 9, 10, 11]);

        for via_memory in [false, true] {
            let result = copy_file(&CopyArgs {
                source: source.clone(),
                destination: source.clone(),
                via_memory,
            })
            .unwrap();
            assert_eq!(result.bytes_written, 4);
            assert_eq!(std::fs::read(&source).unwrap(), vec![8, 9, 10, 11]);
        }
    }

    #[test]
    fn test_copy_missing_source() {
        let temp_dir = TempDir::new().unwrap();

        let err = copy_file(&CopyArgs {
            source: temp_dir.path().join("missing.bin"),
            destination: temp_dir.path().join("out.bin"),
            via_memory: false,
        })
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_create_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("zeros.bin");

        let result = create_file(&CreateArgs {
            path: path.clone(),
            size: 1000,
            sync: true,
        })
        .unwrap();

        assert!(result.source.is_none());
        assert_eq!(result.bytes_written, 1000);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 1000);
    }
}
