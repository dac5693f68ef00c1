//! Error types for the `boundsort` crate

/// Errors that could occur while configuring or running a sort
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A run length of zero was configured.
    ///
    /// Runs must hold at least one element, otherwise segmentation never
    /// advances through the array.
    #[error("run length must be at least one element")]
    RunLength,

    /// A [`crate::BoundsFormat::Compressed`] format was configured with an
    /// unsupported mantissa width.
    #[error("bounds mantissa width {0} is outside the supported range 4..=32")]
    MantissaWidth(u32),

    /// An explicit sort length is larger than the storage backing it.
    #[error("sort length {length} exceeds the {capacity} elements of backing storage")]
    Length {
        /// Number of elements the caller asked to sort
        length: usize,
        /// Number of elements actually available
        capacity: usize,
    },

    /// [`crate::PathOption::BoundedOnly`] is in use and a window can't be
    /// encoded exactly.
    ///
    /// This is reported before any element of the array is moved.
    #[error("window {lower}..{upper} is not exactly representable and no fallback was enabled")]
    Inexact {
        /// First element of the window
        lower: usize,
        /// One past the last element of the window
        upper: usize,
    },
}
