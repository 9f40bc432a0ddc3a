//! Dump command - print records as `index: value` lines.

use super::Value;
use anyhow::{Context, Result};
use filevec_core::{AccessPattern, FileVec, FileVecConfig};
use std::io::Write;
use std::path::Path;

/// Write records `start..start + count` of `file` to `out`.
///
/// `count` of `None` runs to the end. A `start` past the end prints nothing.
/// The file is not modified.
pub fn write_records<T: Value>(
    file: &str,
    start: usize,
    count: Option<usize>,
    out: &mut impl Write,
) -> Result<usize> {
    let path = Path::new(file);
    if !path.exists() {
        anyhow::bail!("Record file not found: {}", file);
    }

    let file_bytes = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", file))?
        .len();
    // Mapping a file with no whole record would extend it.
    if file_bytes < T::SIZE as u64 {
        return Ok(0);
    }

    // The file is left exactly as found, trailing partial record included.
    let config = FileVecConfig::default()
        .with_trim_on_close(false)
        .with_flush_on_close(false)
        .with_access(AccessPattern::Sequential);
    let vec = FileVec::<T>::open_with(path, &config)
        .with_context(|| format!("Failed to open record file: {}", file))?;

    let start = start.min(vec.len());
    let end = match count {
        Some(count) => start.saturating_add(count).min(vec.len()),
        None => vec.len(),
    };

    for (offset, value) in vec[start..end].iter().enumerate() {
        writeln!(out, "{}: {}", start + offset, value)?;
    }

    vec.close()
        .with_context(|| format!("Failed to close record file: {}", file))?;
    Ok(end - start)
}

/// Run the dump command.
pub fn run<T: Value>(file: &str, start: usize, count: Option<usize>) -> Result<()> {
    tracing::info!(file = %file, start, ?count, "Dumping records");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let printed = write_records::<T>(file, start, count, &mut out)?;

    tracing::debug!(printed, "Dump complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(dir: &Path) -> String {
        let path = dir.join("data.bin");
        FileVec::from_iter_in(&path, [10u32, 20, 30, 40])
            .unwrap()
            .close()
            .unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn dumps_all_records() {
        let dir = tempdir().unwrap();
        let file = sample(dir.path());

        let mut out = Vec::new();
        let printed = write_records::<u32>(&file, 0, None, &mut out).unwrap();

        assert_eq!(printed, 4);
        assert_eq!(String::from_utf8(out).unwrap(), "0: 10\n1: 20\n2: 30\n3: 40\n");
    }

    #[test]
    fn dumps_window() {
        let dir = tempdir().unwrap();
        let file = sample(dir.path());

        let mut out = Vec::new();
        write_records::<u32>(&file, 1, Some(2), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1: 20\n2: 30\n");

        let mut out = Vec::new();
        let printed = write_records::<u32>(&file, 3, Some(100), &mut out).unwrap();
        assert_eq!(printed, 1);

        let mut out = Vec::new();
        let printed = write_records::<u32>(&file, 9, None, &mut out).unwrap();
        assert_eq!(printed, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn reinterprets_as_other_type() {
        let dir = tempdir().unwrap();
        let file = sample(dir.path());

        let mut out = Vec::new();
        let printed = write_records::<u64>(&file, 0, None, &mut out).unwrap();

        assert_eq!(printed, 2);
    }

    #[test]
    fn leaves_partial_record_in_place() {
        let dir = tempdir().unwrap();
        let file = sample(dir.path());
        let path = Path::new(&file);
        std::fs::OpenOptions::new()
            .append(true)
            .open(path)
            .unwrap()
            .write_all(&[0xAA; 4])
            .unwrap();
        let before = std::fs::read(path).unwrap();

        let mut out = Vec::new();
        let printed = write_records::<u64>(&file, 0, None, &mut out).unwrap();

        assert_eq!(printed, 2);
        assert_eq!(std::fs::read(path).unwrap(), before);
    }

    #[test]
    fn short_file_is_left_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let mut out = Vec::new();
        let printed = write_records::<u32>(path.to_str().unwrap(), 0, None, &mut out).unwrap();

        assert_eq!(printed, 0);
        assert!(out.is_empty());
        assert_eq!(std::fs::read(&path).unwrap(), [1, 2, 3]);
    }

    #[test]
    fn missing_file_is_not_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.bin");

        let mut out = Vec::new();
        assert!(write_records::<u8>(path.to_str().unwrap(), 0, None, &mut out).is_err());
        assert!(!path.exists());
    }
}
