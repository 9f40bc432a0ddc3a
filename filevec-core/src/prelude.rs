//! Prelude for convenient imports.
//!
//! ```
//! use filevec_core::prelude::*;
//! ```

pub use crate::config::{AccessPattern, FileVecConfig};
pub use crate::error::{ErrorKind, FileVecError, Result};
pub use crate::record::Record;
pub use crate::vec::FileVec;
