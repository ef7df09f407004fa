//! Command line argument parsing for the Pike CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Pike - inspect, slice and materialize byte storages
#[derive(Parser, Debug, Clone)]
#[command(name = "pike")]
#[command(about = "Inspect, slice and materialize memory-mapped byte storages")]
#[command(version = crate::VERSION)]
#[command(long_about = None)]
pub struct PikeArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PikeArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Map a file and show its size and leading bytes
    Inspect(InspectArgs),

    /// Copy a byte range of one file into a new file
    Slice(SliceArgs),

    /// Copy a whole file, optionally through a heap buffer
    Copy(CopyArgs),

    /// Create a zero-filled file
    Create(CreateArgs),
}

/// Arguments for inspecting a file
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// File to map
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Start of the inspected range
    #[arg(long, default_value = "0")]
    pub offset: usize,

    /// Length of the inspected range (0 = through the end)
    #[arg(long, default_value = "0")]
    pub length: usize,

    /// Number of leading bytes to show
    #[arg(long, default_value = "16")]
    pub preview: usize,

    /// Prefault the mapping
    #[arg(long)]
    pub populate: bool,
}

/// Arguments for slicing a file
#[derive(Parser, Debug, Clone)]
pub struct SliceArgs {
    /// Source file
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Destination file (created or replaced)
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,

    /// Start of the range to copy
    #[arg(long)]
    pub offset: usize,

    /// Length of the range to copy (0 = through the end)
    #[arg(long, default_value = "0")]
    pub length: usize,
}

/// Arguments for copying a file
#[derive(Parser, Debug, Clone)]
pub struct CopyArgs {
    /// Source file
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Destination file (created or replaced)
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,

    /// Materialize into memory before writing the destination
    #[arg(long)]
    pub via_memory: bool,
}

/// Arguments for creating a file
#[derive(Parser, Debug, Clone)]
pub struct CreateArgs {
    /// File to create (replaced if it exists)
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Size in bytes
    #[arg(short, long)]
    pub size: usize,

    /// Sync the file to disk before mapping it
    #[arg(long)]
    pub sync: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
