//! Configuration for opening a `FileVec`.

/// Access pattern hint applied to every mapping.
///
/// Forwarded to `madvise` on Unix and ignored elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessPattern {
    /// No particular pattern; the kernel default.
    Normal,
    /// Indexed access at arbitrary positions. Disables aggressive read-ahead.
    #[default]
    Random,
    /// Mostly front-to-back scans.
    Sequential,
}

/// Configuration for opening or creating a `FileVec`.
#[derive(Debug, Clone)]
pub struct FileVecConfig {
    /// Take an exclusive advisory lock on the backing file.
    ///
    /// A second handle to the same file then fails to open with
    /// [`FileVecError::Locked`](crate::FileVecError::Locked).
    pub lock: bool,
    /// Flush the mapping to disk before unmapping on close.
    pub flush_on_close: bool,
    /// Truncate the backing file to the live records on close, discarding
    /// reserved capacity.
    pub trim_on_close: bool,
    /// Access pattern hint for the mapping.
    pub access: AccessPattern,
    /// Lower bound for the capacity reserved when the file is opened.
    ///
    /// Always treated as at least 1: an empty mapping cannot be created.
    pub min_capacity: usize,
}

impl Default for FileVecConfig {
    fn default() -> Self {
        Self {
            lock: true,
            flush_on_close: true,
            trim_on_close: true,
            access: AccessPattern::default(),
            min_capacity: 1,
        }
    }
}

impl FileVecConfig {
    /// Enable or disable the exclusive file lock.
    pub fn with_lock(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    /// Enable or disable flushing on close.
    pub fn with_flush_on_close(mut self, flush: bool) -> Self {
        self.flush_on_close = flush;
        self
    }

    /// Enable or disable trimming reserved capacity on close.
    pub fn with_trim_on_close(mut self, trim: bool) -> Self {
        self.trim_on_close = trim;
        self
    }

    /// Set the access pattern hint.
    pub fn with_access(mut self, access: AccessPattern) -> Self {
        self.access = access;
        self
    }

    /// Reserve at least `capacity` records up front.
    pub fn with_min_capacity(mut self, capacity: usize) -> Self {
        self.min_capacity = capacity.max(1);
        self
    }

    pub(crate) fn initial_capacity(&self, len: usize) -> usize {
        len.max(self.min_capacity).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FileVecConfig::default();
        assert!(config.lock);
        assert!(config.flush_on_close);
        assert!(config.trim_on_close);
        assert_eq!(config.access, AccessPattern::Random);
        assert_eq!(config.min_capacity, 1);
    }

    #[test]
    fn initial_capacity_is_never_zero() {
        let config = FileVecConfig::default();
        assert_eq!(config.initial_capacity(0), 1);
        assert_eq!(config.initial_capacity(10), 10);

        let mut config = FileVecConfig::default();
        config.min_capacity = 0;
        assert_eq!(config.initial_capacity(0), 1);

        let config = FileVecConfig::default().with_min_capacity(64);
        assert_eq!(config.initial_capacity(3), 64);
        assert_eq!(config.initial_capacity(100), 100);
    }

    #[test]
    fn builder_methods() {
        let config = FileVecConfig::default()
            .with_lock(false)
            .with_flush_on_close(false)
            .with_trim_on_close(false)
            .with_access(AccessPattern::Sequential)
            .with_min_capacity(0);

        assert!(!config.lock);
        assert!(!config.flush_on_close);
        assert!(!config.trim_on_close);
        assert_eq!(config.access, AccessPattern::Sequential);
        assert_eq!(config.min_capacity, 1);
    }
}
