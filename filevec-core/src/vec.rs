//! The file-backed vector.

use crate::backing::{Backing, OpenMode};
use crate::capacity;
use crate::config::FileVecConfig;
use crate::error::{FileVecError, IoOp, Result};
use crate::record::Record;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Bound, Deref, DerefMut, RangeBounds};
use std::path::Path;

/// A growable array of `T` records stored in a memory-mapped file.
///
/// The file holds nothing but the records, back to back in native layout.
/// Elements are read and written directly in the mapping, and the container
/// dereferences to `[T]` for indexing, iteration and the rest of the slice API.
///
/// Capacity grows geometrically: the file and its mapping double until they
/// fit, so a run of pushes remaps O(log n) times. Capacity never shrinks while
/// the vector is open. On drop the file is truncated to exactly `len` records.
///
/// Every mutator takes `&mut self`, so no reference into the mapping can be
/// held across an operation that might remap it.
pub struct FileVec<T: Record> {
    backing: Backing,
    len: usize,
    capacity: usize,
    remaps: u64,
    config: FileVecConfig,
    _marker: PhantomData<T>,
}

impl<T: Record> FileVec<T> {
    /// Open the vector stored at `path`, creating an empty one if the file
    /// does not exist.
    ///
    /// The length is the file length divided by the record size, rounded
    /// down. A trailing partial record is ignored and trimmed on close.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &FileVecConfig::default())
    }

    /// Like [`FileVec::open`], with explicit configuration.
    pub fn open_with(path: impl AsRef<Path>, config: &FileVecConfig) -> Result<Self> {
        let path = path.as_ref();

        let (backing, file_len) =
            Backing::open(path, OpenMode::OpenAlways, config, |file_len| {
                let len = capacity::records_in::<T>(file_len)?;
                capacity::byte_len::<T>(config.initial_capacity(len))
            })?;

        let len = capacity::records_in::<T>(file_len)?;
        let capacity = backing.mapped_len() / T::SIZE;

        tracing::debug!(
            path = %path.display(),
            len,
            capacity,
            record_size = T::SIZE,
            "Opened file vector"
        );

        Ok(Self::from_parts(backing, len, capacity, config))
    }

    /// Create a vector of `len` copies of `value` at `path`, overwriting any
    /// existing file.
    pub fn create(path: impl AsRef<Path>, len: usize, value: T) -> Result<Self> {
        Self::create_with(path, len, value, &FileVecConfig::default())
    }

    /// Like [`FileVec::create`], with explicit configuration.
    pub fn create_with(
        path: impl AsRef<Path>,
        len: usize,
        value: T,
        config: &FileVecConfig,
    ) -> Result<Self> {
        let mut vec = Self::create_empty(path.as_ref(), len, config)?;
        vec.slots_mut()[..len].fill(value);
        vec.len = len;
        Ok(vec)
    }

    /// Create a vector at `path` holding the items of `iter`, overwriting any
    /// existing file.
    ///
    /// The iterator is consumed in a single pass. Its size hint is used to
    /// reserve space up front.
    pub fn from_iter_in<I>(path: impl AsRef<Path>, iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_iter_with(path, iter, &FileVecConfig::default())
    }

    /// Like [`FileVec::from_iter_in`], with explicit configuration.
    pub fn from_iter_with<I>(path: impl AsRef<Path>, iter: I, config: &FileVecConfig) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let mut vec = Self::create_empty(path.as_ref(), lower, config)?;
        for item in iter {
            vec.push(item)?;
        }
        Ok(vec)
    }

    /// Copy the contents into a new vector at `path`, overwriting any
    /// existing file there.
    ///
    /// The copy uses the same configuration as `self`. Copies are always
    /// explicit because every vector owns a distinct file.
    pub fn copy_to(&self, path: impl AsRef<Path>) -> Result<Self> {
        let mut copy = Self::create_empty(path.as_ref(), self.len, &self.config)?;
        copy.slots_mut()[..self.len].copy_from_slice(self.as_slice());
        copy.len = self.len;
        Ok(copy)
    }

    fn create_empty(path: &Path, reserve: usize, config: &FileVecConfig) -> Result<Self> {
        let (backing, _) = Backing::open(path, OpenMode::CreateAlways, config, |_| {
            capacity::byte_len::<T>(config.initial_capacity(reserve))
        })?;

        let capacity = backing.mapped_len() / T::SIZE;

        tracing::debug!(
            path = %path.display(),
            capacity,
            record_size = T::SIZE,
            "Created file vector"
        );

        Ok(Self::from_parts(backing, 0, capacity, config))
    }

    fn from_parts(backing: Backing, len: usize, capacity: usize, config: &FileVecConfig) -> Self {
        Self {
            backing,
            len,
            capacity,
            remaps: 0,
            config: config.clone(),
            _marker: PhantomData,
        }
    }

    // ---------- Accessors ---------- //

    /// Number of records in the vector.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector holds no records.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of records the current mapping can hold. Always at least 1.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Largest number of records a vector of `T` can ever hold.
    pub fn max_len(&self) -> usize {
        capacity::max_len::<T>()
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        self.backing.path()
    }

    /// Configuration this vector was opened with.
    pub fn config(&self) -> &FileVecConfig {
        &self.config
    }

    /// Number of times this vector has grown its mapping since it was opened.
    pub fn remap_count(&self) -> u64 {
        self.remaps
    }

    /// The records as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.slots()[..self.len]
    }

    /// The records as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;
        &mut self.slots_mut()[..len]
    }

    /// Raw pointer to the first record in the mapping.
    ///
    /// Invalidated by any operation that grows the vector.
    pub fn as_ptr(&self) -> *const T {
        self.backing.as_ptr().cast()
    }

    /// Raw mutable pointer to the first record in the mapping.
    ///
    /// Invalidated by any operation that grows the vector.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.backing.as_mut_ptr().cast()
    }

    /// Every slot of the mapping, including reserved capacity past `len`.
    fn slots(&self) -> &[T] {
        // SAFETY: from_raw_parts requires an aligned, initialized region of
        // `capacity` values that is not mutated while borrowed. This holds
        // because:
        // 1. The mapping starts on a page boundary, and Record::SIZE (used by
        //    byte_len for every mapping) asserts align_of::<T>() <= MAX_ALIGN,
        //    the smallest page size
        // 2. The mapping covers capacity * T::SIZE bytes of file data, all of
        //    it initialized (unwritten file space reads as zero), and
        //    T: FromBytes accepts any bit pattern
        // 3. The slice borrows self, so no remap or write can happen while it
        //    is alive
        // 4. capacity * T::SIZE was checked against isize::MAX by byte_len
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.capacity) }
    }

    fn slots_mut(&mut self) -> &mut [T] {
        let capacity = self.capacity;
        // SAFETY: as for slots(), with exclusive access guaranteed by &mut self.
        unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), capacity) }
    }

    // ---------- Growth ---------- //

    /// Make room for at least `extra` more records beyond the current length.
    ///
    /// Capacity doubles until it is large enough. If the required size cannot
    /// be addressed, [`FileVecError::OutOfSpace`] is returned and nothing
    /// changes. If the file cannot be extended or remapped, the vector keeps
    /// its previous capacity and contents and stays usable.
    pub fn ensure_capacity(&mut self, extra: usize) -> Result<()> {
        let needed = capacity::needed::<T>(self.len, extra)?;
        if needed <= self.capacity {
            return Ok(());
        }

        let new_capacity = capacity::grown_capacity::<T>(self.capacity, needed)?;
        self.remap(new_capacity)
    }

    /// Grow the capacity to at least `capacity` records.
    ///
    /// Uses the same doubling as [`FileVec::ensure_capacity`]. Requests at or
    /// below the current capacity do nothing.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        if capacity <= self.capacity {
            return Ok(());
        }
        self.ensure_capacity(capacity - self.len)
    }

    fn remap(&mut self, new_capacity: usize) -> Result<()> {
        let bytes = capacity::byte_len::<T>(new_capacity)?;
        let old_capacity = self.capacity;

        if let Err(e) = self.backing.grow(bytes) {
            tracing::warn!(
                path = %self.path().display(),
                old_capacity,
                new_capacity,
                error = %e,
                "Failed to grow file vector"
            );
            return Err(e);
        }

        self.capacity = new_capacity;
        self.remaps += 1;

        tracing::debug!(
            path = %self.path().display(),
            old_capacity,
            new_capacity,
            bytes,
            "Grew file vector"
        );
        Ok(())
    }

    // ---------- Mutators ---------- //

    /// Append a record.
    pub fn push(&mut self, value: T) -> Result<()> {
        self.ensure_capacity(1)?;
        let len = self.len;
        self.slots_mut()[len] = value;
        self.len += 1;
        Ok(())
    }

    /// Remove the last record and return it, or `None` if the vector is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.slots()[self.len])
    }

    /// Insert `value` at `index`, shifting later records toward the end.
    ///
    /// Returns the position of the inserted record.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<usize> {
        self.insert_n(index, 1, value)?;
        Ok(index)
    }

    /// Insert `count` copies of `value` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_n(&mut self, index: usize, count: usize, value: T) -> Result<()> {
        let len = self.len;
        assert_index(index, len);

        self.ensure_capacity(count)?;
        let slots = self.slots_mut();
        slots.copy_within(index..len, index + count);
        slots[index..index + count].fill(value);
        self.len += count;
        Ok(())
    }

    /// Insert a copy of `items` at `index` with a single shift.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_from_slice(&mut self, index: usize, items: &[T]) -> Result<()> {
        let len = self.len;
        assert_index(index, len);

        self.ensure_capacity(items.len())?;
        let slots = self.slots_mut();
        slots.copy_within(index..len, index + items.len());
        slots[index..index + items.len()].copy_from_slice(items);
        self.len += items.len();
        Ok(())
    }

    /// Insert the items of a single-pass iterator at `index`.
    ///
    /// The items are appended as they arrive and then rotated into place, so
    /// the cost is linear in `len` plus the number of items even though the
    /// count is not known in advance. Returns the number of items inserted.
    ///
    /// If growing fails partway, the appended items are discarded and the
    /// vector is left as it was.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_iter<I>(&mut self, index: usize, iter: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let start = self.len;
        assert_index(index, start);

        let iter = iter.into_iter();
        self.ensure_capacity(iter.size_hint().0)?;

        for item in iter {
            if let Err(e) = self.push(item) {
                self.len = start;
                return Err(e);
            }
        }

        let inserted = self.len - start;
        self.as_mut_slice()[index..].rotate_right(inserted);
        Ok(inserted)
    }

    /// Append a copy of `items`.
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<()> {
        self.insert_from_slice(self.len, items)
    }

    /// Append the items of an iterator. Returns the number appended.
    ///
    /// On error the items appended so far are discarded.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
    {
        self.insert_iter(self.len, iter)
    }

    /// Remove and return the record at `index`, shifting later records left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len;
        if index >= len {
            panic!("removal index (is {index}) should be < len (is {len})");
        }

        let slots = self.slots_mut();
        let value = slots[index];
        slots.copy_within(index + 1..len, index);
        self.len -= 1;
        value
    }

    /// Remove the records in `range`, shifting later records left.
    ///
    /// # Panics
    ///
    /// Panics if the range is decreasing or ends past `len`.
    pub fn remove_range<R>(&mut self, range: R)
    where
        R: RangeBounds<usize>,
    {
        let len = self.len;
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start
                .checked_add(1)
                .unwrap_or_else(|| panic!("range start overflows usize")),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end
                .checked_add(1)
                .unwrap_or_else(|| panic!("range end overflows usize")),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => len,
        };
        if start > end {
            panic!("range start (is {start}) should be <= range end (is {end})");
        }
        if end > len {
            panic!("range end (is {end}) should be <= len (is {len})");
        }

        self.slots_mut().copy_within(end..len, start);
        self.len -= end - start;
    }

    /// Remove every record. Capacity and the mapping are kept.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Shorten the vector to `len` records. Longer lengths do nothing.
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    /// Resize to `len` records, filling new slots with `value`.
    pub fn resize(&mut self, len: usize, value: T) -> Result<()> {
        if len > self.len {
            self.insert_n(self.len, len - self.len, value)
        } else {
            self.truncate(len);
            Ok(())
        }
    }

    /// Replace the contents with `len` copies of `value`.
    ///
    /// Space is reserved first, so on error the previous contents remain.
    pub fn assign(&mut self, len: usize, value: T) -> Result<()> {
        self.reserve(len)?;
        self.slots_mut()[..len].fill(value);
        self.len = len;
        Ok(())
    }

    /// Replace the contents with a copy of `items`.
    ///
    /// Space is reserved first, so on error the previous contents remain.
    pub fn assign_from_slice(&mut self, items: &[T]) -> Result<()> {
        self.reserve(items.len())?;
        self.slots_mut()[..items.len()].copy_from_slice(items);
        self.len = items.len();
        Ok(())
    }

    /// Replace the contents with the items of an iterator.
    ///
    /// The iterator is consumed in a single pass after the old contents are
    /// cleared; on error the vector is left empty.
    pub fn assign_iter<I>(&mut self, iter: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
    {
        self.clear();
        self.try_extend(iter)
    }

    /// Exchange the contents, files and mappings of two vectors.
    ///
    /// Equivalent to [`std::mem::swap`]; no records are copied.
    pub fn swap_with(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    // ---------- Durability and disposal ---------- //

    /// Write dirty pages of the mapping back to the file.
    pub fn flush(&self) -> Result<()> {
        self.backing.flush()
    }

    /// Close the vector, reporting any error the drop would have swallowed.
    ///
    /// The mapping is flushed and released, the file is truncated to `len`
    /// records and the lock is dropped.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    /// Close the vector and remove its backing file.
    pub fn delete(mut self) -> Result<()> {
        let path = self.path().to_path_buf();
        self.release()?;
        drop(self);

        std::fs::remove_file(&path).map_err(|e| FileVecError::io(&path, IoOp::Remove, e))
    }

    fn release(&mut self) -> Result<()> {
        // Already closed.
        if self.backing.mapped_len() == 0 {
            return Ok(());
        }

        let live_bytes = (self.len * T::SIZE) as u64;
        self.backing.release(live_bytes, &self.config)?;

        tracing::debug!(
            path = %self.path().display(),
            len = self.len,
            capacity = self.capacity,
            remaps = self.remaps,
            "Closed file vector"
        );
        Ok(())
    }
}

fn assert_index(index: usize, len: usize) {
    if index > len {
        panic!("insertion index (is {index}) should be <= len (is {len})");
    }
}

impl<T: Record> Drop for FileVec<T> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!(
                path = %self.path().display(),
                error = %e,
                "Failed to close file vector cleanly"
            );
        }
    }
}

// ---------- Slice access ---------- //

impl<T: Record> Deref for FileVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Record> DerefMut for FileVec<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Record> AsRef<[T]> for FileVec<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Record> AsMut<[T]> for FileVec<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<'a, T: Record> IntoIterator for &'a FileVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T: Record> IntoIterator for &'a mut FileVec<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

impl<T: Record> fmt::Debug for FileVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileVec")
            .field("path", &self.path())
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

// ---------- Comparison ---------- //

impl<T: Record + PartialEq> PartialEq for FileVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Record + Eq> Eq for FileVec<T> {}

impl<T: Record + PartialEq> PartialEq<[T]> for FileVec<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Record + PartialEq> PartialEq<&[T]> for FileVec<T> {
    fn eq(&self, other: &&[T]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: Record + PartialEq> PartialEq<Vec<T>> for FileVec<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Record + PartialEq, const N: usize> PartialEq<[T; N]> for FileVec<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Record + PartialOrd> PartialOrd for FileVec<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Record + Ord> Ord for FileVec<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}
