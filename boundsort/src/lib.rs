#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(noop_method_call)]
#![warn(unreachable_pub)]
#![warn(clippy::all)]
#![deny(clippy::cargo_common_metadata)]
#![deny(clippy::cast_lossless)]
#![deny(clippy::checked_conversions)]
#![warn(clippy::cognitive_complexity)]
#![deny(clippy::debug_assert_with_mut_call)]
#![deny(clippy::exhaustive_enums)]
#![deny(clippy::exhaustive_structs)]
#![deny(clippy::expl_impl_clone_on_copy)]
#![deny(clippy::fallible_impl_from)]
#![deny(clippy::implicit_clone)]
#![deny(clippy::large_stack_arrays)]
#![warn(clippy::manual_ok_or)]
#![deny(clippy::missing_docs_in_private_items)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::option_option)]
#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]
#![deny(clippy::ref_option_ref)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::trait_duplication_in_bounds)]
#![deny(clippy::unnecessary_wraps)]
#![warn(clippy::unseparated_literal_suffix)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::mod_module_files)]
#![allow(clippy::uninlined_format_args)]

mod bounded;
mod bounds;
mod classic;
mod err;
mod schedule;
mod sorter;

pub use bounded::{insertion_sort_bounded, merge_bounded};
pub use bounds::{
    BoundedRef, Bounds, BoundsFormat, Encoding, DEFAULT_MANTISSA_WIDTH, MANTISSA_WIDTH_RANGE,
};
pub use classic::{insertion_sort, merge};
pub use err::Error;
pub use schedule::{Schedule, Step};
pub use sorter::{Path, PathCounts, PathOption, SortStats, TimSort, TimSortBuilder};

/// Sort `array` in ascending order using default [`TimSortBuilder`] options.
///
/// Windows that can't be encoded exactly fall back to explicit indices, so
/// this always sorts the whole array.
pub fn sort(array: &mut [i32]) {
    TimSort::new().sort_with_fallback_by(array, &mut |a: &i32, b: &i32| a < b);
}

/// Check whether `array` is in ascending order.
///
/// Empty and single-element arrays are sorted.
pub fn is_sorted(array: &[i32]) -> bool {
    array.windows(2).all(|pair| pair[0] <= pair[1])
}

#[cfg(test)]
mod test {
    use super::{is_sorted, sort};

    #[test]
    fn is_sorted_examples() {
        assert!(is_sorted(&[]));
        assert!(is_sorted(&[42]));

        let mut array = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        assert!(is_sorted(&array));
        array[5] = 42;
        assert!(!is_sorted(&array));
        assert!(is_sorted(&[3, 3, 3]));
    }

    #[test]
    fn sort_default() {
        let mut array: Vec<i32> = (0..5000).map(|i| (i * 7919) % 4999 - 2500).collect();
        sort(&mut array);
        assert!(is_sorted(&array));
        assert_eq!(array.len(), 5000);
    }
}
