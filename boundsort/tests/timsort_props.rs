//! Sorting properties checked against the standard library's sort
//!
//! Every array length from 2 to 2048 is filled with random data, sorted,
//! and compared against a reference sort of a copy.

use boundsort::{is_sorted, sort, BoundsFormat, PathOption, TimSort, TimSortBuilder};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;

const MAX_ARRAY_SZ: usize = 2048;

fn random_chunk(rng: &mut StdRng, length: usize) -> Vec<i32> {
    (0..length).map(|_| rng.random()).collect()
}

fn counts(array: &[i32]) -> HashMap<i32, usize> {
    let mut counts = HashMap::new();
    for &value in array {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

#[test]
fn every_length_matches_reference() {
    let mut rng = StdRng::seed_from_u64(0x7153_0e7);
    for length in 2..=MAX_ARRAY_SZ {
        let mut array = random_chunk(&mut rng, length);
        let mut expected = array.clone();
        expected.sort();

        sort(&mut array);
        assert!(is_sorted(&array), "length {length} not sorted");
        assert_eq!(array, expected, "length {length} differs from reference");
    }
}

#[test]
fn preserves_multiset() {
    let mut rng = StdRng::seed_from_u64(42);
    for length in [3, 64, 65, 1000, 4097] {
        // Narrow value range so plenty of duplicates show up
        let original: Vec<i32> = (0..length).map(|_| rng.random_range(-8..8)).collect();
        let mut array = original.clone();
        sort(&mut array);
        assert!(is_sorted(&array));
        assert_eq!(counts(&array), counts(&original));
    }
}

#[test]
fn trivial_arrays_unchanged() {
    let mut empty: Vec<i32> = vec![];
    sort(&mut empty);
    assert!(empty.is_empty());

    let mut single = vec![-7];
    sort(&mut single);
    assert_eq!(single, [-7]);
}

#[test]
fn presorted_and_reversed() {
    for length in [63, 64, 65, 128, 129, 8192] {
        let ascending: Vec<i32> = (0..length).collect();

        let mut array = ascending.clone();
        sort(&mut array);
        assert_eq!(array, ascending);

        let mut array: Vec<i32> = (0..length).rev().collect();
        sort(&mut array);
        assert_eq!(array, ascending);
    }
}

#[test]
fn extreme_values() {
    let mut array = vec![i32::MAX, 0, i32::MIN, -1, i32::MAX, 1, i32::MIN];
    sort(&mut array);
    assert_eq!(array, [i32::MIN, i32::MIN, -1, 0, 1, i32::MAX, i32::MAX]);
}

#[test]
fn all_permutations() {
    // Small run lengths force several merge passes over only 8 elements
    let sorters: Vec<TimSort> = [1, 2, 3, 8]
        .into_iter()
        .flat_map(|run_length| {
            [BoundsFormat::Precise, BoundsFormat::Opaque]
                .into_iter()
                .map(move |bounds| {
                    TimSortBuilder::new()
                        .run_length(run_length)
                        .bounds(bounds)
                        .path(PathOption::TryBounded)
                        .build()
                        .unwrap()
                })
        })
        .collect();

    let mut items = [3, 1, 4, 1, 5, 9, 2, 6];
    let mut expected = items;
    expected.sort();

    let heap = permutohedron::Heap::new(&mut items);
    let mut seen = 0;
    for permutation in heap {
        for sorter in &sorters {
            let mut array = permutation;
            sorter.sort(&mut array).unwrap();
            assert_eq!(array, expected, "{permutation:?} with {sorter:?}");
        }
        seen += 1;
    }
    assert_eq!(seen, 8 * 7 * 6 * 5 * 4 * 3 * 2);
}
