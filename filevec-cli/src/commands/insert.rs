//! Insert command - insert records at a position.

use super::{Value, parse_values};
use anyhow::{Context, Result};
use filevec_core::FileVec;

/// Run the insert command.
pub fn run<T: Value>(file: &str, index: usize, values: &[String]) -> Result<()> {
    let values = parse_values::<T>(values)?;

    let mut vec = FileVec::<T>::open(file)
        .with_context(|| format!("Failed to open record file: {}", file))?;

    if index > vec.len() {
        anyhow::bail!(
            "Insert position {} is past the end of {} ({} records)",
            index,
            file,
            vec.len()
        );
    }

    vec.insert_from_slice(index, &values)
        .with_context(|| format!("Failed to insert into record file: {}", file))?;

    tracing::info!(file = %file, index, inserted = values.len(), "Inserted records");
    println!("{} records", vec.len());

    vec.close()
        .with_context(|| format!("Failed to close record file: {}", file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn inserts_in_middle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        drop(FileVec::from_iter_in(&path, [1u8, 4]).unwrap());

        run::<u8>(path.to_str().unwrap(), 1, &["2".into(), "3".into()]).unwrap();

        assert_eq!(FileVec::<u8>::open(&path).unwrap(), [1, 2, 3, 4]);
    }

    #[test]
    fn position_past_end_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        drop(FileVec::from_iter_in(&path, [1u8]).unwrap());

        let err = run::<u8>(path.to_str().unwrap(), 5, &["2".into()]).unwrap_err();

        assert!(err.to_string().contains("past the end"));
        assert_eq!(FileVec::<u8>::open(&path).unwrap(), [1]);
    }
}
