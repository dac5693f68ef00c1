//! Dispatcher and top-level entry for the bottom-up timsort
//!
//! A [`TimSort`] walks the [`Schedule`] for an array, and for each step
//! decides between the classic and bounded primitives. The decision is made
//! fresh for every step by asking the configured [`BoundsFormat`] to encode
//! the step's window: an exact encoding goes to the bounded primitives, and
//! anything else falls back to explicit indices. Both families produce the
//! same result, so the choice only affects how the window is passed.
//!
//! Before any step runs, the entry check encodes the whole backing storage.
//! If that reference doesn't report exactly the number of elements being
//! sorted, the sort never attempts the bounded path at all.

use crate::bounded;
use crate::bounds::{BoundsFormat, Encoding};
use crate::classic;
use crate::schedule::{Schedule, Step};
use crate::Error;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Option for selecting which primitives a [`TimSort`] may use
#[derive(
    Default, Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[non_exhaustive]
pub enum PathOption {
    /// Use explicit indices everywhere, without building any bounded
    /// references.
    ClassicOnly,
    /// Use bounded references only, and fail if any window is inexact.
    ///
    /// Every window is checked before the array is modified, so a failed
    /// sort leaves the array as it was.
    BoundedOnly,
    /// Use bounded references wherever the window is exact, and explicit
    /// indices elsewhere.
    /// (This is the default)
    #[default]
    TryBounded,
}

/// Primitives actually used for a step, or for entering a sort
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[non_exhaustive]
pub enum Path {
    /// Explicit lower/mid/upper indices
    Classic,
    /// Window carried in a [`crate::BoundedRef`]
    Bounded,
}

/// Number of steps that took each [`Path`]
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PathCounts {
    /// Steps done with bounded references
    bounded: usize,
    /// Steps done with explicit indices
    classic: usize,
}

impl PathCounts {
    /// Steps done with bounded references.
    pub fn bounded(&self) -> usize {
        self.bounded
    }

    /// Steps done with explicit indices.
    pub fn classic(&self) -> usize {
        self.classic
    }

    /// All steps.
    pub fn total(&self) -> usize {
        self.bounded + self.classic
    }

    /// Count one step.
    fn record(&mut self, path: Path) {
        match path {
            Path::Bounded => self.bounded += 1,
            Path::Classic => self.classic += 1,
        }
    }
}

/// Summary of the paths taken by one sort
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SortStats {
    /// Result of the entry check, or `None` if there was nothing to sort
    entry: Option<Path>,
    /// Insertion-sorted runs
    runs: PathCounts,
    /// Merges
    merges: PathCounts,
}

impl SortStats {
    /// Path chosen by the entry check.
    ///
    /// [`Path::Classic`] here means no step tried a bounded reference.
    /// Arrays with fewer than two elements return `None`.
    pub fn entry(&self) -> Option<Path> {
        self.entry
    }

    /// Paths taken by the insertion-sorted runs.
    pub fn runs(&self) -> PathCounts {
        self.runs
    }

    /// Paths taken by the merges.
    pub fn merges(&self) -> PathCounts {
        self.merges
    }

    /// Count one finished step.
    fn record(&mut self, step: Step, path: Path) {
        match step {
            Step::Run { .. } => self.runs.record(path),
            Step::Merge { .. } => self.merges.record(path),
        }
    }
}

/// Builder for creating [`TimSort`] instances with custom settings
///
/// This also serves as the on-disk configuration format. Fields missing
/// from a serialized builder take their default values.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimSortBuilder {
    /// Current run_length() setting
    run_length: usize,
    /// Current bounds() setting
    bounds: BoundsFormat,
    /// Current path() setting
    path: PathOption,
}

impl Default for TimSortBuilder {
    fn default() -> Self {
        Self {
            run_length: TimSort::DEFAULT_RUN_LENGTH,
            bounds: BoundsFormat::default(),
            path: PathOption::default(),
        }
    }
}

impl TimSortBuilder {
    /// Create a new [`TimSortBuilder`] with default settings.
    ///
    /// Immediately calling [`Self::build()`] would be equivalent to using
    /// [`TimSort::new()`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Select the length of the initial insertion-sorted runs.
    pub fn run_length(&mut self, run_length: usize) -> &mut Self {
        self.run_length = run_length;
        self
    }

    /// Select the [`BoundsFormat`] used to encode windows.
    pub fn bounds(&mut self, bounds: BoundsFormat) -> &mut Self {
        self.bounds = bounds;
        self
    }

    /// Select a new [`PathOption`].
    pub fn path(&mut self, path: PathOption) -> &mut Self {
        self.path = path;
        self
    }

    /// Check the settings and build a [`TimSort`].
    pub fn build(&self) -> Result<TimSort, Error> {
        if self.run_length == 0 {
            return Err(Error::RunLength);
        }
        self.bounds.validate()?;
        Ok(TimSort {
            run_length: self.run_length,
            bounds: self.bounds,
            path: self.path,
        })
    }
}

/// Bottom-up timsort with a fixed configuration
///
/// Built with [`TimSortBuilder`], or with [`TimSort::new()`] for the
/// defaults.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TimSort {
    /// Length of the initial insertion-sorted runs, at least one
    run_length: usize,
    /// How windows are encoded in bounded references
    bounds: BoundsFormat,
    /// Which primitives may be used
    path: PathOption,
}

impl Default for TimSort {
    fn default() -> Self {
        Self {
            run_length: Self::DEFAULT_RUN_LENGTH,
            bounds: BoundsFormat::default(),
            path: PathOption::default(),
        }
    }
}

impl TimSort {
    /// Run length used unless another is configured
    pub const DEFAULT_RUN_LENGTH: usize = 64;

    /// Make a [`TimSort`] with default settings.
    pub fn new() -> Self {
        Default::default()
    }

    /// Length of the initial insertion-sorted runs.
    pub fn run_length(&self) -> usize {
        self.run_length
    }

    /// Format used to encode windows.
    pub fn bounds(&self) -> BoundsFormat {
        self.bounds
    }

    /// Which primitives may be used.
    pub fn path(&self) -> PathOption {
        self.path
    }

    /// Sort all of `array` in ascending order.
    ///
    /// Only fails under [`PathOption::BoundedOnly`], with
    /// [`Error::Inexact`].
    pub fn sort(&self, array: &mut [i32]) -> Result<SortStats, Error> {
        let length = array.len();
        self.sort_prefix(array, length)
    }

    /// Sort the first `length` elements of `array` in ascending order.
    ///
    /// The bounded path is only considered when `length` covers all of
    /// `array`. Elements past `length` are never touched.
    ///
    /// Fails with [`Error::Length`] if `length` is larger than the array.
    /// Under [`PathOption::BoundedOnly`], fails with [`Error::Inexact`]
    /// before modifying anything if some window can't be encoded exactly.
    pub fn sort_prefix(&self, array: &mut [i32], length: usize) -> Result<SortStats, Error> {
        self.sort_prefix_by(array, length, |a: &i32, b: &i32| a < b)
    }

    /// Generic form of [`Self::sort_prefix`].
    pub(crate) fn sort_prefix_by<T: Copy, F>(
        &self,
        array: &mut [T],
        length: usize,
        mut is_less: F,
    ) -> Result<SortStats, Error>
    where
        F: FnMut(&T, &T) -> bool,
    {
        let capacity = array.len();
        if length > capacity {
            return Err(Error::Length { length, capacity });
        }
        if length < 2 {
            return Ok(SortStats::default());
        }

        let entry = self.entry_path(array, length);
        if self.path == PathOption::BoundedOnly {
            self.check_plan::<T>(capacity, length, entry)?;
        }
        Ok(self.execute(array, length, entry, &mut is_less))
    }

    /// Sort all of `array`, falling back to explicit indices wherever a
    /// window is inexact.
    ///
    /// [`PathOption::BoundedOnly`] is treated like
    /// [`PathOption::TryBounded`] here, so this never fails.
    pub(crate) fn sort_with_fallback_by<T: Copy, F>(
        &self,
        array: &mut [T],
        is_less: &mut F,
    ) -> SortStats
    where
        F: FnMut(&T, &T) -> bool,
    {
        let length = array.len();
        if length < 2 {
            return SortStats::default();
        }
        let entry = self.entry_path(array, length);
        self.execute(array, length, entry, is_less)
    }

    /// Decide whether steps may try bounded references at all.
    ///
    /// A reference over the whole storage has to encode exactly and report
    /// exactly `length` elements.
    fn entry_path<T>(&self, array: &mut [T], length: usize) -> Path {
        if self.path == PathOption::ClassicOnly {
            return Path::Classic;
        }
        let capacity = array.len();
        match self.bounds.encode(array, 0, capacity, 0) {
            Encoding::Exact(whole) if whole.len() / whole.element_size() == length => {
                Path::Bounded
            }
            _ => Path::Classic,
        }
    }

    /// Check that every step of the plan would encode exactly.
    ///
    /// Reports the first window that wouldn't.
    fn check_plan<T>(&self, capacity: usize, length: usize, entry: Path) -> Result<(), Error> {
        if entry == Path::Classic {
            return Err(Error::Inexact {
                lower: 0,
                upper: length,
            });
        }
        for step in Schedule::new(length, self.run_length) {
            let (start, window_length, offset) = step.encoding();
            if !self.bounds.probe::<T>(capacity, start, window_length, offset) {
                let (lower, upper) = step.window();
                return Err(Error::Inexact { lower, upper });
            }
        }
        Ok(())
    }

    /// Run every step of the plan for `array[..length]`.
    fn execute<T: Copy, F>(
        &self,
        array: &mut [T],
        length: usize,
        entry: Path,
        is_less: &mut F,
    ) -> SortStats
    where
        F: FnMut(&T, &T) -> bool,
    {
        debug!(
            "sorting {} elements in runs of {}, entering on the {} path",
            length, self.run_length, entry
        );

        let mut stats = SortStats {
            entry: Some(entry),
            ..Default::default()
        };
        for step in Schedule::new(length, self.run_length) {
            let path = match entry {
                Path::Bounded => self.dispatch(array, step, is_less),
                Path::Classic => {
                    run_classic(array, step, is_less);
                    Path::Classic
                }
            };
            stats.record(step, path);
        }

        debug!(
            "sorted {} elements: {} of {} runs and {} of {} merges used bounded references",
            length,
            stats.runs.bounded(),
            stats.runs.total(),
            stats.merges.bounded(),
            stats.merges.total()
        );
        stats
    }

    /// Run one step, on the bounded path if its window encodes exactly.
    fn dispatch<T: Copy, F>(&self, array: &mut [T], step: Step, is_less: &mut F) -> Path
    where
        F: FnMut(&T, &T) -> bool,
    {
        let (start, length, offset) = step.encoding();
        match self.bounds.encode(array, start, length, offset) {
            Encoding::Exact(reference) => {
                match step {
                    Step::Run { .. } => bounded::insertion_sort_bounded_by(reference, is_less),
                    Step::Merge { .. } => bounded::merge_bounded_by(reference, is_less),
                }
                Path::Bounded
            }
            Encoding::Inexact { storage, stored } => {
                trace!(
                    "{:?} stored as {:?}, falling back to explicit indices",
                    step,
                    stored
                );
                run_classic(storage, step, is_less);
                Path::Classic
            }
        }
    }
}

/// Run one step with explicit indices.
fn run_classic<T: Copy, F>(array: &mut [T], step: Step, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    match step {
        Step::Run { lower, upper } => classic::insertion_sort_by(array, lower, upper, is_less),
        Step::Merge { lower, mid, upper } => {
            classic::merge_by(array, lower, mid, upper, is_less);
        }
    }
}
