//! Error types for filevec.
//!
//! Every failure carries the path of the backing file (where one exists) and
//! a stable error code so that logs can be grepped across versions.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The operation on the backing file that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    /// Opening or creating the file.
    Open,
    /// Querying the file's length.
    Metadata,
    /// Changing the file's length (growth or trimming).
    Resize,
    /// Creating a memory mapping over the file.
    Map,
    /// Flushing dirty pages of the mapping to disk.
    Flush,
    /// Removing the file from disk.
    Remove,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "open",
            Self::Metadata => "stat",
            Self::Resize => "resize",
            Self::Map => "map",
            Self::Flush => "flush",
            Self::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// Coarse classification of a [`FileVecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The platform refused an operation on the file or its mapping.
    IoFailure,
    /// A size computation would not fit the platform's size types.
    OutOfSpace,
}

/// The main error type for filevec operations.
#[derive(Error, Debug)]
pub enum FileVecError {
    /// An operation on the backing file or its mapping failed.
    #[error("E001: Failed to {op} backing file {path}: {source}")]
    Io {
        /// The backing file.
        path: PathBuf,
        /// Which step failed.
        op: IoOp,
        /// The underlying platform error.
        #[source]
        source: std::io::Error,
    },

    /// A required element count or byte size cannot be represented.
    ///
    /// Raised before any mutation, so the container is unchanged.
    #[error(
        "E002: Out of space: {requested} records of {record_size} bytes cannot be addressed"
    )]
    OutOfSpace {
        /// Number of records that were requested.
        requested: u128,
        /// Size of one record in bytes.
        record_size: usize,
    },

    /// Another handle holds the exclusive lock on the backing file.
    #[error("E003: Backing file {path} is locked by another handle: {source}")]
    Locked {
        /// The backing file.
        path: PathBuf,
        /// The error reported by the lock call.
        #[source]
        source: std::io::Error,
    },
}

impl FileVecError {
    pub(crate) fn io(path: impl Into<PathBuf>, op: IoOp, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            op,
            source,
        }
    }

    pub(crate) fn out_of_space<T>(requested: u128) -> Self {
        Self::OutOfSpace {
            requested,
            record_size: std::mem::size_of::<T>(),
        }
    }

    /// Get the error code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E001",
            Self::OutOfSpace { .. } => "E002",
            Self::Locked { .. } => "E003",
        }
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } | Self::Locked { .. } => ErrorKind::IoFailure,
            Self::OutOfSpace { .. } => ErrorKind::OutOfSpace,
        }
    }

    /// Check if this error is a size overflow.
    #[must_use]
    pub fn is_out_of_space(&self) -> bool {
        self.kind() == ErrorKind::OutOfSpace
    }

    /// The raw OS error code, when the platform reported one.
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::Io { source, .. } | Self::Locked { source, .. } => source.raw_os_error(),
            Self::OutOfSpace { .. } => None,
        }
    }
}

/// Result type alias using `FileVecError`.
pub type Result<T> = std::result::Result<T, FileVecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_correct() {
        let err = FileVecError::io(
            "/tmp/test.vec",
            IoOp::Map,
            std::io::Error::other("no mapping"),
        );
        assert_eq!(err.code(), "E001");
        assert_eq!(err.kind(), ErrorKind::IoFailure);

        let err = FileVecError::out_of_space::<u64>(u128::from(u64::MAX));
        assert_eq!(err.code(), "E002");
        assert!(err.is_out_of_space());
    }

    #[test]
    fn error_display() {
        let err = FileVecError::io(
            "/tmp/test.vec",
            IoOp::Resize,
            std::io::Error::other("disk full"),
        );
        let msg = err.to_string();
        assert!(msg.contains("E001"));
        assert!(msg.contains("resize"));
        assert!(msg.contains("/tmp/test.vec"));
        assert!(msg.contains("disk full"));

        let msg = FileVecError::out_of_space::<u32>(7).to_string();
        assert!(msg.contains("7 records of 4 bytes"));
    }

    #[test]
    fn locked_is_an_io_failure() {
        let err = FileVecError::Locked {
            path: PathBuf::from("/tmp/test.vec"),
            source: std::io::Error::from_raw_os_error(11),
        };
        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert_eq!(err.raw_os_error(), Some(11));
    }
}
