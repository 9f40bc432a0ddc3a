//! Erase command - remove a span of records.

use anyhow::{Context, Result};
use filevec_core::{FileVec, Record};

/// Run the erase command.
pub fn run<T: Record>(file: &str, start: usize, count: usize) -> Result<()> {
    let mut vec = FileVec::<T>::open(file)
        .with_context(|| format!("Failed to open record file: {}", file))?;

    let end = start.checked_add(count).filter(|&end| end <= vec.len());
    let Some(end) = end else {
        anyhow::bail!(
            "Cannot erase {} records at {} from {} ({} records)",
            count,
            start,
            file,
            vec.len()
        );
    };

    vec.remove_range(start..end);

    tracing::info!(file = %file, start, count, len = vec.len(), "Erased records");
    println!("{} records", vec.len());

    vec.close()
        .with_context(|| format!("Failed to close record file: {}", file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn erases_span_and_trims_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        drop(FileVec::from_iter_in(&path, 0..6u32).unwrap());

        run::<u32>(path.to_str().unwrap(), 1, 3).unwrap();

        assert_eq!(std::fs::metadata(&path).unwrap().len(), 12);
        assert_eq!(FileVec::<u32>::open(&path).unwrap(), [0, 4, 5]);
    }

    #[test]
    fn span_past_end_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        drop(FileVec::from_iter_in(&path, 0..3u32).unwrap());

        assert!(run::<u32>(path.to_str().unwrap(), 2, 2).is_err());
        assert!(run::<u32>(path.to_str().unwrap(), 1, usize::MAX).is_err());

        assert_eq!(FileVec::<u32>::open(&path).unwrap(), [0, 1, 2]);
    }
}
