//! The bound on element types.
//!
//! A [`FileVec`](crate::FileVec) moves its elements with raw byte copies and
//! reads them back from whatever bytes the backing file holds. That is only
//! sound for flat values, so the requirement is expressed as a trait bound
//! and checked by the compiler instead of being left to documentation.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// A fixed-size, flat value that can be stored in a [`FileVec`](crate::FileVec).
///
/// The bounds mean:
///
/// - `FromBytes`: every bit pattern is a valid value, so slack capacity
///   (zero-filled by the filesystem) and files written by other processes
///   never produce an invalid `T`.
/// - `IntoBytes`: no padding, so the bytes written to disk are fully defined.
/// - `Immutable`: no interior mutability behind a shared reference.
/// - `Copy`: no drop glue, so overwriting a slot never leaks or double-frees.
///
/// `Record` is implemented for every type meeting these bounds. Derive the
/// zerocopy traits on your own structs:
///
/// ```
/// use filevec_core::Record;
/// use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
///
/// #[derive(Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
/// #[repr(C)]
/// struct Sample {
///     timestamp: u64,
///     value: f64,
/// }
///
/// assert_eq!(<Sample as Record>::SIZE, 16);
/// ```
///
/// Zero-sized types, and types aligned to more than [`MAX_ALIGN`], are
/// rejected when `SIZE` is first evaluated, which happens as soon as a
/// `FileVec` of that type is used.
pub trait Record: FromBytes + IntoBytes + Immutable + KnownLayout + Copy {
    /// Size of one record on disk, in bytes. Never zero.
    const SIZE: usize = {
        assert!(
            size_of::<Self>() > 0,
            "zero-sized types cannot be stored in a FileVec"
        );
        assert!(
            align_of::<Self>() <= MAX_ALIGN,
            "record alignment exceeds the smallest page size"
        );
        size_of::<Self>()
    };
}

/// Largest record alignment a mapping is guaranteed to satisfy.
///
/// Mappings start on a page boundary and no supported platform uses pages
/// smaller than 4 KiB.
pub const MAX_ALIGN: usize = 4096;

impl<T> Record for T where T: FromBytes + IntoBytes + Immutable + KnownLayout + Copy {}
