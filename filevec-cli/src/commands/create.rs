//! Create command - create or overwrite a record file.

use super::Value;
use anyhow::{Context, Result};
use filevec_core::FileVec;

/// Run the create command.
pub fn run<T: Value>(file: &str, len: usize, fill: &str) -> Result<()> {
    let fill: T = fill
        .parse()
        .with_context(|| format!("Invalid fill value: {}", fill))?;

    tracing::info!(file = %file, len, %fill, "Creating record file");

    let vec = FileVec::create(file, len, fill)
        .with_context(|| format!("Failed to create record file: {}", file))?;
    vec.close()
        .with_context(|| format!("Failed to close record file: {}", file))?;

    println!("Created {} with {} records of {} bytes", file, len, T::SIZE);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_filled_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");

        run::<i16>(path.to_str().unwrap(), 3, "-7").unwrap();

        assert_eq!(FileVec::<i16>::open(&path).unwrap(), [-7, -7, -7]);
    }

    #[test]
    fn rejects_bad_fill_before_touching_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");

        assert!(run::<u8>(path.to_str().unwrap(), 3, "x").is_err());
        assert!(!path.exists());
    }
}
