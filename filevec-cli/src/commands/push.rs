//! Push command - append records.

use super::{Value, parse_values};
use anyhow::{Context, Result};
use filevec_core::FileVec;

/// Run the push command.
pub fn run<T: Value>(file: &str, values: &[String]) -> Result<()> {
    let values = parse_values::<T>(values)?;

    let mut vec = FileVec::<T>::open(file)
        .with_context(|| format!("Failed to open record file: {}", file))?;
    vec.extend_from_slice(&values)
        .with_context(|| format!("Failed to append to record file: {}", file))?;

    tracing::info!(file = %file, appended = values.len(), len = vec.len(), "Appended records");
    println!("{} records", vec.len());

    vec.close()
        .with_context(|| format!("Failed to close record file: {}", file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn appends_to_new_and_existing_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        let file = path.to_str().unwrap();

        run::<f64>(file, &strings(&["1.5", "2"])).unwrap();
        run::<f64>(file, &strings(&["-3"])).unwrap();

        assert_eq!(FileVec::<f64>::open(&path).unwrap(), [1.5, 2.0, -3.0]);
    }

    #[test]
    fn invalid_value_appends_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        let file = path.to_str().unwrap();

        run::<u32>(file, &strings(&["1"])).unwrap();
        assert!(run::<u32>(file, &strings(&["2", "oops"])).is_err());

        assert_eq!(FileVec::<u32>::open(&path).unwrap(), [1]);
    }
}
