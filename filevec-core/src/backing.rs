//! The backing file and its mapping, owned as one resource.
//!
//! A `Backing` bundles the open file, its advisory lock and the live mapping.
//! Each piece is released by its own destructor, so a construction that fails
//! halfway never leaks the parts that were already acquired.
//!
//! # Growth
//!
//! Growing extends the file first and maps the new length second. The old
//! mapping stays in place until the new one exists, so a failure at either
//! step leaves the previous mapping, and every byte visible through it,
//! untouched.

use crate::config::{AccessPattern, FileVecConfig};
use crate::error::{FileVecError, IoOp, Result};
use fs2::FileExt;
use memmap2::{MmapMut, MmapOptions};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// How the backing file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpenMode {
    /// Open the file if it exists, create it empty otherwise. Never truncates.
    OpenAlways,
    /// Create the file, discarding any previous contents.
    CreateAlways,
}

/// A file handle that releases its exclusive lock when dropped.
#[derive(Debug)]
struct LockedFile {
    file: File,
    locked: bool,
}

impl LockedFile {
    fn unlock(&mut self) -> std::io::Result<()> {
        if self.locked {
            self.locked = false;
            FileExt::unlock(&self.file)?;
        }
        Ok(())
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        let _ = self.unlock();
    }
}

/// An open, locked and mapped backing file.
#[derive(Debug)]
pub(crate) struct Backing {
    path: PathBuf,
    /// `None` only after [`Backing::release`].
    map: Option<MmapMut>,
    file: LockedFile,
    access: AccessPattern,
}

impl Backing {
    /// Open `path` and map the number of bytes `map_len` asks for.
    ///
    /// `map_len` receives the current file length and returns the mapping
    /// length in bytes, which must be non-zero. The file is extended when it
    /// is shorter than that.
    pub(crate) fn open<F>(
        path: &Path,
        mode: OpenMode,
        config: &FileVecConfig,
        map_len: F,
    ) -> Result<(Self, u64)>
    where
        F: FnOnce(u64) -> Result<usize>,
    {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| FileVecError::io(path, IoOp::Open, e))?;

        let mut file = LockedFile {
            file,
            locked: false,
        };

        if config.lock {
            FileExt::try_lock_exclusive(&file.file).map_err(|e| FileVecError::Locked {
                path: path.to_path_buf(),
                source: e,
            })?;
            file.locked = true;
        }

        // Only discard contents once no other handle can be looking at them.
        if mode == OpenMode::CreateAlways {
            file.file
                .set_len(0)
                .map_err(|e| FileVecError::io(path, IoOp::Resize, e))?;
        }

        let file_len = file
            .file
            .metadata()
            .map_err(|e| FileVecError::io(path, IoOp::Metadata, e))?
            .len();

        let bytes = map_len(file_len)?;
        debug_assert!(bytes > 0, "mappings are never empty");

        if file_len < bytes as u64 {
            file.file
                .set_len(bytes as u64)
                .map_err(|e| FileVecError::io(path, IoOp::Resize, e))?;
        }

        let map = map_file(path, &file.file, bytes, config.access)?;

        Ok((
            Self {
                path: path.to_path_buf(),
                map: Some(map),
                file,
                access: config.access,
            },
            file_len,
        ))
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Length of the live mapping in bytes.
    pub(crate) fn mapped_len(&self) -> usize {
        self.map.as_ref().map_or(0, |map| map.len())
    }

    /// Current length of the file on disk.
    pub(crate) fn file_len(&self) -> Result<u64> {
        self.file
            .file
            .metadata()
            .map(|m| m.len())
            .map_err(|e| FileVecError::io(&self.path, IoOp::Metadata, e))
    }

    /// Base address of the mapping. Page aligned.
    pub(crate) fn as_ptr(&self) -> *const u8 {
        match &self.map {
            Some(map) => map.as_ptr(),
            None => std::ptr::NonNull::dangling().as_ptr(),
        }
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut u8 {
        match &mut self.map {
            Some(map) => map.as_mut_ptr(),
            None => std::ptr::NonNull::dangling().as_ptr(),
        }
    }

    /// Extend the file and the mapping to `bytes`.
    ///
    /// On error the previous mapping is still live and unchanged.
    pub(crate) fn grow(&mut self, bytes: usize) -> Result<()> {
        if bytes <= self.mapped_len() {
            return Ok(());
        }

        if self.file_len()? < bytes as u64 {
            self.file
                .file
                .set_len(bytes as u64)
                .map_err(|e| FileVecError::io(&self.path, IoOp::Resize, e))?;
        }

        let map = map_file(&self.path, &self.file.file, bytes, self.access)?;
        // Dropping the old mapping unmaps it.
        self.map = Some(map);
        Ok(())
    }

    /// Swap the handle for a read-only one so that resizing fails.
    #[cfg(test)]
    pub(crate) fn reopen_read_only(&mut self) -> std::io::Result<()> {
        let file = File::open(&self.path)?;
        self.file = LockedFile {
            file,
            locked: false,
        };
        Ok(())
    }

    /// Write dirty pages back to the file.
    pub(crate) fn flush(&self) -> Result<()> {
        match &self.map {
            Some(map) => map
                .flush()
                .map_err(|e| FileVecError::io(&self.path, IoOp::Flush, e)),
            None => Ok(()),
        }
    }

    /// Unmap, trim the file to `live_bytes` and unlock.
    ///
    /// Every step runs even if an earlier one fails; the first error is
    /// returned. Calling this twice is harmless.
    pub(crate) fn release(&mut self, live_bytes: u64, config: &FileVecConfig) -> Result<()> {
        let mut first_error = None;

        if let Some(map) = self.map.take() {
            if config.flush_on_close {
                if let Err(e) = map.flush() {
                    first_error.get_or_insert(FileVecError::io(&self.path, IoOp::Flush, e));
                }
            }
            drop(map);

            if config.trim_on_close {
                let trimmed = self.file_len().and_then(|len| {
                    if len != live_bytes {
                        self.file
                            .file
                            .set_len(live_bytes)
                            .map_err(|e| FileVecError::io(&self.path, IoOp::Resize, e))?;
                    }
                    Ok(())
                });
                if let Err(e) = trimmed {
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Err(e) = self.file.unlock() {
            first_error.get_or_insert(FileVecError::Locked {
                path: self.path.clone(),
                source: e,
            });
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn map_file(path: &Path, file: &File, bytes: usize, access: AccessPattern) -> Result<MmapMut> {
    // SAFETY: MmapOptions::map_mut is unsafe because the file could be
    // modified or truncated by someone else while mapped. This is sound because:
    // 1. The file is held under an exclusive lock unless the caller opted out
    // 2. The file has been extended to at least `bytes` before mapping
    // 3. The mapping is owned by the Backing and is only viewed through
    //    &self / &mut self borrows of the owning FileVec, so no view outlives
    //    a remap
    let map = unsafe {
        MmapOptions::new()
            .len(bytes)
            .map_mut(file)
            .map_err(|e| FileVecError::io(path, IoOp::Map, e))?
    };
    advise(&map, access);
    Ok(map)
}

#[cfg(unix)]
fn advise(map: &MmapMut, access: AccessPattern) {
    use memmap2::Advice;

    let advice = match access {
        AccessPattern::Normal => Advice::Normal,
        AccessPattern::Random => Advice::Random,
        AccessPattern::Sequential => Advice::Sequential,
    };
    // Only a hint.
    let _ = map.advise(advice);
}

#[cfg(not(unix))]
fn advise(_map: &MmapMut, _access: AccessPattern) {}
