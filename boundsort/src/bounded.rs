//! Sort primitives that read their window from a [`BoundedRef`]
//!
//! Neither primitive takes an index. The window is recovered from the
//! reference's metadata instead:
//!
//! - For [`insertion_sort_bounded`], the bounds start at the array base and
//!   end at the window's upper bound, and the cursor marks its lower bound.
//! - For [`merge_bounded`], the bounds cover exactly the two runs to merge,
//!   and the cursor marks where the second run starts.
//!
//! Having a [`BoundedRef`] at all means its metadata read back exactly, so
//! nothing here checks exactness again.

use crate::bounds::BoundedRef;
use crate::classic;

/// Sort the window described by `reference` with a stable insertion sort.
///
/// The window runs from the cursor to the top of the bounds. Elements
/// outside it are not touched.
pub fn insertion_sort_bounded(reference: BoundedRef<'_, i32>) {
    insertion_sort_bounded_by(reference, &mut |a: &i32, b: &i32| a < b);
}

/// Merge the two sorted runs described by `reference`.
///
/// The first run spans from the base of the bounds to the cursor, and the
/// second from the cursor to the top. On ties the first run's element goes
/// first.
pub fn merge_bounded(reference: BoundedRef<'_, i32>) {
    merge_bounded_by(reference, &mut |a: &i32, b: &i32| a < b);
}

/// Generic form of [`insertion_sort_bounded`].
pub(crate) fn insertion_sort_bounded_by<T: Copy, F>(reference: BoundedRef<'_, T>, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    // Bounds start at the array base, so the window is `cursor..`
    let (array, lower) = reference.into_window();
    classic::insertion_sort_slice(&mut array[lower..], is_less);
}

/// Generic form of [`merge_bounded`].
pub(crate) fn merge_bounded_by<T: Copy, F>(reference: BoundedRef<'_, T>, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let (window, split) = reference.into_window();
    classic::merge_slice(window, split, is_less);
}
