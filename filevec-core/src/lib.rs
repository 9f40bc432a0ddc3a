//! filevec core library
//!
//! A growable, random-access array of fixed-size records whose storage is a
//! memory-mapped file.
//!
//! # Overview
//!
//! [`FileVec<T>`] behaves like a `Vec<T>` that lives on disk. The backing file
//! holds nothing but the records, laid out back to back in native byte order
//! with no header, so it can be produced or consumed by any tool that writes
//! flat binary arrays.
//!
//! # Key Components
//!
//! - **FileVec**: the container, with vector-style mutation and slice access
//! - **Record**: the bound on element types (flat, fixed-size, any bit pattern valid)
//! - **FileVecConfig**: locking, close-time behavior and mapping hints
//! - **FileVecError**: failures with stable error codes
//!
//! # Example
//!
//! ```no_run
//! use filevec_core::FileVec;
//!
//! # fn main() -> filevec_core::Result<()> {
//! let mut prices = FileVec::<f64>::open("prices.bin")?;
//! prices.push(101.5)?;
//! prices.insert(0, 99.0)?;
//!
//! assert_eq!(prices[0], 99.0);
//! let total: f64 = prices.iter().sum();
//! # let _ = total;
//!
//! // Dropping closes the file; close() reports errors instead of logging them.
//! prices.close()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod backing;
mod capacity;
pub mod config;
pub mod error;
pub mod prelude;
pub mod record;
pub mod vec;

pub use config::{AccessPattern, FileVecConfig};
pub use error::{ErrorKind, FileVecError, IoOp, Result};
pub use record::Record;
pub use vec::FileVec;
