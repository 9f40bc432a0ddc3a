//! Integration tests for capacity growth and its failure modes.

use filevec_core::prelude::*;
use tempfile::tempdir;

#[test]
fn thousand_zeros_then_thousand_pushes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ints.vec");

    let mut vec = FileVec::create(&path, 1024, 0i32).unwrap();
    for i in 0..1024 {
        vec.push(i).unwrap();
    }

    assert_eq!(vec.len(), 2048);
    assert_eq!(vec[0], 0);
    assert_eq!(vec[1024], 0);
    assert_eq!(vec[2047], 1023);
    assert_eq!(vec.capacity(), 2048);
    assert_eq!(vec.remap_count(), 1);
    vec.close().unwrap();

    assert_eq!(std::fs::metadata(&path).unwrap().len(), 2048 * 4);
}

#[test]
fn remaps_are_logarithmic() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ints.vec");

    let mut vec = FileVec::<u8>::open(&path).unwrap();
    for i in 0..100_000u32 {
        vec.push(i as u8).unwrap();
    }

    // ceil(log2(100_000)) doublings from a capacity of 1.
    assert_eq!(vec.remap_count(), 17);
    assert_eq!(vec.capacity(), 131_072);
}

#[test]
fn capacity_never_shrinks_while_open() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ints.vec");

    let mut vec = FileVec::from_iter_in(&path, 0..100u32).unwrap();
    let capacity = vec.capacity();

    vec.truncate(1);
    vec.remove_range(..);
    vec.resize(3, 1).unwrap();
    vec.assign(2, 2).unwrap();

    assert_eq!(vec.capacity(), capacity);
}

#[test]
fn reserve_covers_every_mutator() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ints.vec");

    let mut vec = FileVec::<u64>::open(&path).unwrap();
    vec.reserve(64).unwrap();
    let remaps = vec.remap_count();

    vec.assign(10, 1).unwrap();
    vec.push(2).unwrap();
    vec.insert(3, 3).unwrap();
    vec.insert_n(0, 5, 4).unwrap();
    vec.insert_from_slice(2, &[5, 6, 7]).unwrap();
    vec.insert_iter(1, (0..10).map(|v| v * 2)).unwrap();
    vec.extend_from_slice(&[8; 8]).unwrap();
    vec.resize(64, 9).unwrap();
    vec.assign_iter(0..64).unwrap();

    assert_eq!(vec.len(), 64);
    assert_eq!(vec.remap_count(), remaps);
}

#[test]
fn out_of_space_leaves_state_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ints.vec");

    let mut vec = FileVec::from_iter_in(&path, [1u64, 2, 3]).unwrap();
    let capacity = vec.capacity();

    let attempts = [
        vec.ensure_capacity(usize::MAX).unwrap_err(),
        vec.ensure_capacity(vec.max_len()).unwrap_err(),
        vec.reserve(usize::MAX).unwrap_err(),
        vec.insert_n(1, usize::MAX - 1, 0).unwrap_err(),
        vec.resize(usize::MAX, 0).unwrap_err(),
    ];

    for err in attempts {
        assert!(err.is_out_of_space(), "unexpected error: {err}");
        assert_eq!(err.code(), "E002");
    }

    assert_eq!(vec, [1, 2, 3]);
    assert_eq!(vec.capacity(), capacity);
    assert_eq!(vec.remap_count(), 0);
}

#[test]
fn max_len_scales_with_record_size() {
    let dir = tempdir().unwrap();

    let bytes = FileVec::<u8>::open(dir.path().join("a.vec")).unwrap();
    let words = FileVec::<u64>::open(dir.path().join("b.vec")).unwrap();

    assert_eq!(bytes.max_len(), isize::MAX as usize);
    assert_eq!(words.max_len(), isize::MAX as usize / 8);
}

#[test]
fn unsatisfiable_size_hint_fails_cleanly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ints.vec");

    let mut vec = FileVec::from_iter_in(&path, [1u32, 2, 3]).unwrap();

    // A size hint that cannot be satisfied fails before anything is written.
    struct Lying;
    impl Iterator for Lying {
        type Item = u32;
        fn next(&mut self) -> Option<u32> {
            Some(0)
        }
        fn size_hint(&self) -> (usize, Option<usize>) {
            (usize::MAX, None)
        }
    }

    let err = vec.insert_iter(1, Lying).unwrap_err();
    assert!(err.is_out_of_space());
    assert_eq!(vec, [1, 2, 3]);
}
