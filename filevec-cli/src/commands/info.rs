//! Info command - describe a record file without opening it.

use anyhow::{Context, Result};
use filevec_core::Record;
use std::path::Path;

/// Summary of a record file.
#[derive(Debug, PartialEq, Eq)]
pub struct FileInfo {
    /// Size of one record in bytes.
    pub record_size: usize,
    /// Number of whole records.
    pub records: u64,
    /// Length of the file in bytes.
    pub file_bytes: u64,
    /// Bytes after the last whole record.
    pub trailing_bytes: u64,
}

/// Inspect `file` as an array of `T` records.
pub fn inspect<T: Record>(file: &str) -> Result<FileInfo> {
    let path = Path::new(file);
    if !path.exists() {
        anyhow::bail!("Record file not found: {}", file);
    }

    let file_bytes = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", file))?
        .len();
    let record_size = T::SIZE;

    Ok(FileInfo {
        record_size,
        records: file_bytes / record_size as u64,
        file_bytes,
        trailing_bytes: file_bytes % record_size as u64,
    })
}

/// Run the info command.
pub fn run<T: Record>(file: &str) -> Result<()> {
    tracing::info!(file = %file, "Inspecting record file");

    let info = inspect::<T>(file)?;

    println!("File:        {}", file);
    println!("Record size: {} bytes", info.record_size);
    println!("Records:     {}", info.records);
    println!("File size:   {} bytes", info.file_bytes);
    if info.trailing_bytes > 0 {
        println!(
            "Trailing:    {} bytes (partial record, dropped when the file is next opened for editing)",
            info.trailing_bytes
        );
    }

    Ok(())
}
