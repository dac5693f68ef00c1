//! Sort primitives that take their window as explicit indices
//!
//! These are the ground truth for the whole crate. The bounded primitives
//! derive their windows differently but share the kernels here, and the
//! dispatcher falls back to these functions for any window whose bounds
//! can't be encoded exactly.
//!
//! Kernels are generic over the element type and take an `is_less`
//! comparator in the style of the standard library's sort internals. The
//! public functions fix the element type to `i32`.

/// Sort `array[lower..upper]` in place with a stable insertion sort.
///
/// Elements outside the window are not touched.
///
/// # Panics
///
/// Panics if `lower > upper` or `upper > array.len()`.
pub fn insertion_sort(array: &mut [i32], lower: usize, upper: usize) {
    insertion_sort_by(array, lower, upper, &mut |a: &i32, b: &i32| a < b);
}

/// Merge the sorted ranges `array[lower..mid]` and `array[mid..upper]` into
/// one sorted range.
///
/// On ties the element from the left range goes first.
///
/// # Panics
///
/// Panics unless `lower <= mid <= upper <= array.len()`.
pub fn merge(array: &mut [i32], lower: usize, mid: usize, upper: usize) {
    merge_by(array, lower, mid, upper, &mut |a: &i32, b: &i32| a < b);
}

/// Generic form of [`insertion_sort`].
pub(crate) fn insertion_sort_by<T: Copy, F>(
    array: &mut [T],
    lower: usize,
    upper: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    insertion_sort_slice(&mut array[lower..upper], is_less);
}

/// Generic form of [`merge`].
pub(crate) fn merge_by<T: Copy, F>(
    array: &mut [T],
    lower: usize,
    mid: usize,
    upper: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    merge_slice(&mut array[lower..upper], mid - lower, is_less);
}

/// Insertion sort over a whole slice.
///
/// An element only moves left past elements strictly greater than itself,
/// so equal elements keep their order.
pub(crate) fn insertion_sort_slice<T: Copy, F>(window: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    for i in 1..window.len() {
        let value = window[i];
        let mut hole = i;
        while hole > 0 && is_less(&value, &window[hole - 1]) {
            window[hole] = window[hole - 1];
            hole -= 1;
        }
        window[hole] = value;
    }
}

/// Merge `window[..split]` with `window[split..]`, both already sorted.
///
/// Both halves are copied into scratch storage sized to fit them exactly,
/// then merged back over the window.
pub(crate) fn merge_slice<T: Copy, F>(window: &mut [T], split: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let (left, right) = window.split_at(split);
    if left.is_empty() || right.is_empty() {
        return;
    }
    let left = left.to_vec();
    let right = right.to_vec();
    merge_into(window, &left, &right, is_less);
}

/// Two-pointer merge of `left` and `right` into `dst`.
///
/// `dst` must hold exactly `left.len() + right.len()` elements. The left
/// element wins ties.
pub(crate) fn merge_into<T: Copy, F>(dst: &mut [T], left: &[T], right: &[T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert_eq!(dst.len(), left.len() + right.len());

    let mut left_idx = 0;
    let mut right_idx = 0;
    let mut out = 0;
    while left_idx < left.len() && right_idx < right.len() {
        if is_less(&right[right_idx], &left[left_idx]) {
            dst[out] = right[right_idx];
            right_idx += 1;
        } else {
            dst[out] = left[left_idx];
            left_idx += 1;
        }
        out += 1;
    }

    // Copy stragglers; at most one of these is non-empty
    let left_rest = &left[left_idx..];
    dst[out..out + left_rest.len()].copy_from_slice(left_rest);
    out += left_rest.len();
    dst[out..].copy_from_slice(&right[right_idx..]);
}

#[cfg(test)]
mod test {
    use super::{insertion_sort, insertion_sort_by, merge, merge_by};

    /// Compare tagged items by key only, so stability can be observed
    fn key_less(a: &(i32, usize), b: &(i32, usize)) -> bool {
        a.0 < b.0
    }

    #[test]
    fn merge_reversed_halves() {
        // Halves aren't sorted, so this shows the raw two-pointer order
        let mut array = [10, 9, 8, 7, 6, 5, 4, 3, 2, 1];
        merge(&mut array, 0, 4, 10);
        assert_eq!(array, [6, 5, 4, 3, 2, 1, 10, 9, 8, 7]);

        let mut array = [10, 9, 8, 7, 6, 5, 4, 3, 2, 1];
        merge(&mut array, 0, 5, 10);
        assert_eq!(array, [5, 4, 3, 2, 1, 10, 9, 8, 7, 6]);
    }

    #[test]
    fn merge_inner_window() {
        let mut array = [9, 1, 4, 7, 2, 3, 8, 0];
        merge(&mut array, 1, 4, 7);
        assert_eq!(array, [9, 1, 2, 3, 4, 7, 8, 0]);
    }

    #[test]
    fn merge_empty_halves() {
        let mut array = [3, 1, 2];
        merge(&mut array, 0, 0, 3);
        assert_eq!(array, [3, 1, 2]);
        merge(&mut array, 0, 3, 3);
        assert_eq!(array, [3, 1, 2]);
        merge(&mut array, 1, 1, 1);
        assert_eq!(array, [3, 1, 2]);
    }

    #[test]
    fn insertion_sort_window_only() {
        let mut array = [5, 4, 3, 2, 1, 0];
        insertion_sort(&mut array, 1, 5);
        assert_eq!(array, [5, 1, 2, 3, 4, 0]);

        insertion_sort(&mut array, 0, 6);
        assert_eq!(array, [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn insertion_sort_trivial_windows() {
        let mut array = [2, 1];
        insertion_sort(&mut array, 0, 0);
        insertion_sort(&mut array, 1, 2);
        assert_eq!(array, [2, 1]);
    }

    #[test]
    fn insertion_sort_is_stable() {
        let mut items: Vec<(i32, usize)> = [3, 1, 3, 2, 1, 3, 2]
            .iter()
            .enumerate()
            .map(|(tag, &key)| (key, tag))
            .collect();
        insertion_sort_by(&mut items, 0, 7, &mut key_less);
        assert_eq!(
            items,
            [(1, 1), (1, 4), (2, 3), (2, 6), (3, 0), (3, 2), (3, 5)]
        );
    }

    #[test]
    fn merge_is_stable() {
        let mut items = [(1, 0), (2, 1), (2, 2), (1, 3), (2, 4), (3, 5)];
        merge_by(&mut items, 0, 3, 6, &mut key_less);
        assert_eq!(items, [(1, 0), (1, 3), (2, 1), (2, 2), (2, 4), (3, 5)]);
    }

    #[test]
    #[should_panic]
    fn merge_out_of_range() {
        let mut array = [1, 2, 3];
        merge(&mut array, 0, 2, 4);
    }
}
