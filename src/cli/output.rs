//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, PikeArgs};
use crate::error::Result;
use crate::storage::StorageKind;

/// Result structure for file inspection.
#[derive(Debug, Serialize, Deserialize)]
pub struct InspectResult {
    pub path: String,
    pub kind: StorageKind,
    pub file_size: usize,
    pub offset: usize,
    pub size: usize,
    pub preview: String,
}

/// Result structure for slice, copy and create.
#[derive(Debug, Serialize, Deserialize)]
pub struct MaterializeResult {
    pub source: Option<String>,
    pub destination: String,
    pub bytes_written: usize,
    pub duration_ms: u64,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &PikeArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &PikeArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(&val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(&value);
            println!("{formatted_value}");
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &PikeArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for human output.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Render bytes as space-separated lowercase hex pairs.
pub fn hex_preview(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
