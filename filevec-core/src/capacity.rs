//! Size arithmetic for record storage.
//!
//! All byte lengths are checked against `isize::MAX`, the largest span a
//! mapping can be viewed as a slice, which on every supported target is also
//! representable as a `u64` file length.

use crate::error::{FileVecError, Result};
use crate::record::Record;

/// Largest number of `T` records whose byte length is addressable.
pub(crate) fn max_len<T: Record>() -> usize {
    isize::MAX as usize / T::SIZE
}

/// Byte length of `count` records of `T`.
pub(crate) fn byte_len<T: Record>(count: usize) -> Result<usize> {
    if count > max_len::<T>() {
        return Err(FileVecError::out_of_space::<T>(count as u128));
    }
    Ok(count * T::SIZE)
}

/// Number of whole records in a file of `file_len` bytes.
///
/// A trailing partial record is not counted.
pub(crate) fn records_in<T: Record>(file_len: u64) -> Result<usize> {
    let count = file_len / T::SIZE as u64;
    usize::try_from(count)
        .ok()
        .filter(|&count| count <= max_len::<T>())
        .ok_or_else(|| FileVecError::out_of_space::<T>(u128::from(count)))
}

/// Total record count needed to hold `extra` more records after `len`.
pub(crate) fn needed<T: Record>(len: usize, extra: usize) -> Result<usize> {
    let needed = len
        .checked_add(extra)
        .ok_or_else(|| FileVecError::out_of_space::<T>(len as u128 + extra as u128))?;
    byte_len::<T>(needed)?;
    Ok(needed)
}

/// Capacity reached by doubling `current` until it holds `needed` records.
///
/// When a doubling step would leave the addressable range but `needed`
/// itself is addressable, the result is clamped to [`max_len`].
pub(crate) fn grown_capacity<T: Record>(current: usize, needed: usize) -> Result<usize> {
    let limit = max_len::<T>();
    if needed > limit {
        return Err(FileVecError::out_of_space::<T>(needed as u128));
    }

    let mut capacity = current.max(1);
    while capacity < needed {
        capacity = match capacity.checked_mul(2) {
            Some(doubled) if doubled <= limit => doubled,
            _ => limit,
        };
    }
    Ok(capacity)
}
