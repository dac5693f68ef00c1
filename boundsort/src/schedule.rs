//! Step plan for the bottom-up timsort
//!
//! The order of work depends only on the array length and the run length,
//! so it is computed up front as an iterator of [`Step`]s. The dispatcher
//! executes the steps, and [`crate::PathOption::BoundedOnly`] walks them
//! once beforehand to check every window.
//!
//! All windows are half-open and clipped to the array length. Every element
//! belongs to exactly one run, and to at most one merge in each pass.

/// One unit of work in the sort
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Step {
    /// Insertion-sort `lower..upper`.
    Run {
        /// First element of the run
        lower: usize,
        /// One past the last element of the run
        upper: usize,
    },

    /// Merge the sorted ranges `lower..mid` and `mid..upper`.
    Merge {
        /// First element of the left range
        lower: usize,
        /// First element of the right range
        mid: usize,
        /// One past the last element of the right range
        upper: usize,
    },
}

impl Step {
    /// Window covered by this step, as `(lower, upper)`.
    pub fn window(&self) -> (usize, usize) {
        match *self {
            Self::Run { lower, upper } | Self::Merge { lower, upper, .. } => (lower, upper),
        }
    }

    /// Bounds request for this step, as `(start, length, offset)` in
    /// elements.
    ///
    /// A run is encoded with bounds from the array base up to its upper
    /// bound, and the cursor on its lower bound. A merge is encoded with
    /// bounds covering both ranges, and the cursor on the split point.
    pub fn encoding(&self) -> (usize, usize, usize) {
        match *self {
            Self::Run { lower, upper } => (0, upper, lower),
            Self::Merge { lower, mid, upper } => (lower, upper - lower, mid - lower),
        }
    }
}

/// Where the plan currently is
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Phase {
    /// Segmenting into runs; the next run starts at `lower`.
    Runs {
        /// First element of the next run
        lower: usize,
    },
    /// Merging runs of `width` elements; the next merge starts at `left`.
    Merges {
        /// Length of the sorted ranges being merged in this pass
        width: usize,
        /// First element of the next merge
        left: usize,
    },
    /// Every step has been produced.
    Done,
}

/// Iterator over the [`Step`]s that sort an array
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Number of elements being sorted
    length: usize,
    /// Length of the initial insertion-sorted runs
    run_length: usize,
    /// Current position in the plan
    phase: Phase,
}

impl Schedule {
    /// Plan the steps for `length` elements with runs of `run_length`.
    ///
    /// A `run_length` of zero is treated as one.
    pub fn new(length: usize, run_length: usize) -> Self {
        Self {
            length,
            run_length: run_length.max(1),
            phase: Phase::Runs { lower: 0 },
        }
    }

    /// Number of elements being sorted.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Check whether there is nothing to sort.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl Iterator for Schedule {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        loop {
            match self.phase {
                Phase::Runs { lower } if lower < self.length => {
                    let upper = lower.saturating_add(self.run_length).min(self.length);
                    self.phase = Phase::Runs { lower: upper };
                    return Some(Step::Run { lower, upper });
                }
                Phase::Runs { .. } => {
                    self.phase = Phase::Merges {
                        width: self.run_length,
                        left: 0,
                    };
                }
                Phase::Merges { width, .. } if width >= self.length => {
                    self.phase = Phase::Done;
                }
                Phase::Merges { width, left } if left < self.length - width => {
                    let mid = left + width;
                    let upper = mid.saturating_add(width).min(self.length);
                    self.phase = Phase::Merges { width, left: upper };
                    return Some(Step::Merge {
                        lower: left,
                        mid,
                        upper,
                    });
                }
                Phase::Merges { width, .. } => {
                    self.phase = Phase::Merges {
                        width: width.saturating_mul(2),
                        left: 0,
                    };
                }
                Phase::Done => return None,
            }
        }
    }
}
