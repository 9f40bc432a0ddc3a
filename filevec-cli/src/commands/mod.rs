//! CLI command implementations.
//!
//! Commands that touch records are generic over the record type; `main`
//! picks the instantiation from `--type`.

pub mod create;
pub mod dump;
pub mod erase;
pub mod info;
pub mod insert;
pub mod push;
pub mod version;

use anyhow::{Context, Result};
use filevec_core::Record;
use std::fmt::Display;
use std::str::FromStr;

/// A record type the CLI can parse from and print to text.
pub trait Value:
    Record + Display + FromStr<Err: std::error::Error + Send + Sync + 'static>
{
}

impl<T> Value for T where
    T: Record + Display + FromStr<Err: std::error::Error + Send + Sync + 'static>
{
}

/// Parse command-line values into records.
pub fn parse_values<T: Value>(values: &[String]) -> Result<Vec<T>> {
    values
        .iter()
        .map(|v| {
            v.parse::<T>()
                .with_context(|| format!("Invalid value: {}", v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_values_by_type() {
        let values = vec!["1".to_string(), "-2".to_string()];
        assert_eq!(parse_values::<i16>(&values).unwrap(), vec![1, -2]);
        assert!(parse_values::<u16>(&values).is_err());

        let values = vec!["2.5".to_string()];
        assert_eq!(parse_values::<f32>(&values).unwrap(), vec![2.5]);
    }

    #[test]
    fn parse_error_names_value() {
        let values = vec!["300".to_string()];
        let err = parse_values::<u8>(&values).unwrap_err();
        assert!(err.to_string().contains("300"));
    }
}
