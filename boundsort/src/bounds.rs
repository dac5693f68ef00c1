//! Bounds metadata and the exactness oracle
//!
//! A [`BoundedRef`] is a view over array storage that carries its own window
//! as metadata: a base and a length describing its bounds, plus an offset
//! cursor inside them. Platforms that compress this metadata can't store
//! every window, and silently round a request to something nearby instead.
//!
//! [`BoundsFormat`] models how that metadata is stored. Building a
//! [`BoundedRef`] always goes through [`BoundsFormat::encode`], which stores
//! the requested window, reads the metadata back, and hands out a reference
//! only when the two agree exactly. Anything else returns the storage to the
//! caller so it can use explicit indices instead.
//!
//! Metadata is measured in bytes from the start of the backing storage, the
//! same way a capability measures addresses. Windows are requested in
//! elements and scaled by the element size before they are stored.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;
use std::ops::RangeInclusive;

/// Mantissa width used by [`BoundsFormat::default()`]
///
/// This matches the bounds compression of 128-bit capabilities on 64-bit
/// targets, where regions below 4 KiB are always exact.
pub const DEFAULT_MANTISSA_WIDTH: u32 = 14;

/// Mantissa widths accepted for [`BoundsFormat::Compressed`]
pub const MANTISSA_WIDTH_RANGE: RangeInclusive<u32> = 4..=32;

/// How bounds metadata is stored on the target
///
/// This decides which windows survive a round trip through a
/// [`BoundedRef`]. The sort never depends on a particular format for
/// correctness, only for how often it can use the bounded primitives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
#[non_exhaustive]
pub enum BoundsFormat {
    /// Every window is stored exactly.
    Precise,

    /// Floating-point style compressed bounds.
    ///
    /// Regions shorter than `2^(mantissa_width - 2)` bytes are stored
    /// exactly at any base. Longer regions are widened to a power-of-two
    /// granule: the base rounds down and the top rounds up, using the
    /// smallest granule that lets the widened length fit in
    /// `mantissa_width - 2` bits. Such a region is exact only if both of
    /// its ends were already aligned to that granule.
    Compressed {
        /// Width of the stored base and top fields, in bits
        mantissa_width: u32,
    },

    /// No window can be stored, so every encoding is inexact.
    ///
    /// Useful for forcing the explicit-index fallback everywhere.
    Opaque,
}

impl Default for BoundsFormat {
    fn default() -> Self {
        Self::Compressed {
            mantissa_width: DEFAULT_MANTISSA_WIDTH,
        }
    }
}

impl BoundsFormat {
    /// Check that this format's parameters are supported.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        match *self {
            Self::Compressed { mantissa_width }
                if !MANTISSA_WIDTH_RANGE.contains(&mantissa_width) =>
            {
                Err(Error::MantissaWidth(mantissa_width))
            }
            _ => Ok(()),
        }
    }

    /// Check whether a region of `length` bytes is stored exactly no matter
    /// where it starts.
    ///
    /// This is a cheap upper estimate for planning only. [`Self::encode`]
    /// always stores the window through [`Self::represent`] and compares
    /// what reads back.
    pub fn always_exact(&self, length: usize) -> bool {
        match *self {
            Self::Precise => true,
            Self::Compressed { mantissa_width } => length < length_limit(mantissa_width),
            Self::Opaque => false,
        }
    }

    /// Store the byte region `base .. base + length` the way this format
    /// would, and return the bounds that read back.
    ///
    /// Returns `None` if the region can't be stored at all.
    pub fn represent(&self, base: usize, length: usize) -> Option<Bounds> {
        let top = base.checked_add(length)?;
        match *self {
            Self::Precise => Some(Bounds::new(base, length)),
            Self::Opaque => None,
            Self::Compressed { mantissa_width } => {
                let limit = length_limit(mantissa_width);
                if length < limit {
                    return Some(Bounds::new(base, length));
                }

                // Start from the smallest granule that fits the unrounded
                // length; rounding may still overflow it by one bit.
                let length_bits = mantissa_width.saturating_sub(2);
                let mut exponent =
                    usize::BITS - length.checked_shr(length_bits).unwrap_or(0).leading_zeros();
                loop {
                    let mask = 1_usize.checked_shl(exponent)? - 1;
                    let rounded_base = base & !mask;
                    let rounded_top = top.checked_add(mask)? & !mask;
                    let rounded_length = rounded_top - rounded_base;
                    if rounded_length >> exponent < limit {
                        return Some(Bounds::new(rounded_base, rounded_length));
                    }
                    exponent += 1;
                }
            }
        }
    }

    /// Ask for a [`BoundedRef`] over `storage`, with bounds covering
    /// `length` elements from `start` and the cursor `offset` elements into
    /// them.
    ///
    /// The stored metadata is read back and compared with the request. Only
    /// an exact match produces [`Encoding::Exact`]. A window that doesn't fit
    /// inside `storage`, or an offset past the end of the window, is never
    /// exact.
    pub fn encode<'a, T>(
        &self,
        storage: &'a mut [T],
        start: usize,
        length: usize,
        offset: usize,
    ) -> Encoding<'a, T> {
        match self.read_back::<T>(storage.len(), start, length, offset) {
            Ok(bounds) => Encoding::Exact(BoundedRef {
                storage,
                bounds,
                offset: offset * element_size::<T>(),
            }),
            Err(stored) => Encoding::Inexact { storage, stored },
        }
    }

    /// Like [`Self::encode`], keeping only an exact reference.
    pub fn try_bounded<'a, T>(
        &self,
        storage: &'a mut [T],
        start: usize,
        length: usize,
        offset: usize,
    ) -> Option<BoundedRef<'a, T>> {
        self.encode(storage, start, length, offset).exact()
    }

    /// Check whether [`Self::encode`] would be exact for this window over
    /// `capacity` elements of `T`, without borrowing any storage.
    pub fn probe<T>(&self, capacity: usize, start: usize, length: usize, offset: usize) -> bool {
        self.read_back::<T>(capacity, start, length, offset).is_ok()
    }

    /// Store a window of elements and compare what reads back with the
    /// request.
    ///
    /// Returns the stored bounds on an exact match. Otherwise returns
    /// whatever bounds were stored, if any.
    fn read_back<T>(
        &self,
        capacity: usize,
        start: usize,
        length: usize,
        offset: usize,
    ) -> Result<Bounds, Option<Bounds>> {
        if start.checked_add(length).map_or(true, |end| end > capacity) {
            return Err(None);
        }
        let size = element_size::<T>();
        let (Some(base), Some(bytes)) = (start.checked_mul(size), length.checked_mul(size)) else {
            return Err(None);
        };

        let requested = Bounds::new(base, bytes);
        let stored = self.represent(base, bytes);
        debug_assert!(!self.always_exact(bytes) || stored == Some(requested));
        match stored {
            Some(bounds) if bounds == requested && offset <= length => Ok(bounds),
            other => Err(other),
        }
    }
}

/// Smallest byte length that may need rounding for a given mantissa width
fn length_limit(mantissa_width: u32) -> usize {
    1_usize
        .checked_shl(mantissa_width.saturating_sub(2))
        .unwrap_or(usize::MAX)
}

/// Size of one element as seen by bounds metadata
///
/// Zero-sized types are counted as one byte so windows stay distinguishable.
fn element_size<T>() -> usize {
    mem::size_of::<T>().max(1)
}

/// A byte region as held in bounds metadata
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Bounds {
    /// First byte of the region, relative to the start of storage
    base: usize,
    /// Length of the region in bytes
    length: usize,
}

impl Bounds {
    /// Make a new region from a base and length in bytes.
    pub(crate) fn new(base: usize, length: usize) -> Self {
        Self { base, length }
    }

    /// First byte of the region.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Length of the region in bytes.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Check whether the region is empty.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// One past the last byte of the region.
    pub fn top(&self) -> usize {
        self.base.saturating_add(self.length)
    }
}

/// A view over array storage whose window lives in its own metadata
///
/// The reference holds exclusive access to the entire backing storage, like
/// a capability derived from the array's base pointer. What it actually
/// reaches is described by [`Self::base()`], [`Self::len()`] and
/// [`Self::offset()`], all in bytes.
///
/// A `BoundedRef` can only be created through [`BoundsFormat::encode`] or
/// [`BoundsFormat::try_bounded`], and its bounds and cursor can't be changed
/// afterwards. Asking for a different window means encoding it again.
pub struct BoundedRef<'a, T = i32> {
    /// Entire backing storage
    storage: &'a mut [T],
    /// Bounds as stored, relative to the start of `storage`
    bounds: Bounds,
    /// Cursor position in bytes, relative to the base of `bounds`
    offset: usize,
}

impl<'a, T> BoundedRef<'a, T> {
    /// Lower bound in bytes from the start of storage.
    pub fn base(&self) -> usize {
        self.bounds.base()
    }

    /// Length of the bounds in bytes.
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Check whether the bounds are empty.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Cursor position in bytes from [`Self::base()`].
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The stored bounds.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Size in bytes of one element behind this reference.
    pub fn element_size(&self) -> usize {
        element_size::<T>()
    }

    /// Give up the metadata and borrow the whole bounded window, along with
    /// the cursor position in elements from its start.
    pub(crate) fn into_window(self) -> (&'a mut [T], usize) {
        let size = element_size::<T>();
        let base = self.bounds.base() / size;
        let top = self.bounds.top() / size;
        (&mut self.storage[base..top], self.offset / size)
    }

    /// Give up the metadata and borrow the elements between the cursor and
    /// the top of the bounds.
    pub fn into_slice(self) -> &'a mut [T] {
        let size = element_size::<T>();
        let top = self.bounds.top();
        let cursor = self.bounds.base().saturating_add(self.offset).min(top);
        &mut self.storage[cursor / size..top / size]
    }
}

impl<T> fmt::Debug for BoundedRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedRef")
            .field("base", &self.bounds.base())
            .field("len", &self.bounds.len())
            .field("offset", &self.offset)
            .finish()
    }
}

/// Outcome of asking a [`BoundsFormat`] to encode a window
#[derive(Debug)]
#[non_exhaustive]
pub enum Encoding<'a, T = i32> {
    /// The metadata read back exactly as requested.
    Exact(BoundedRef<'a, T>),

    /// The metadata didn't survive the round trip.
    ///
    /// Storage is handed back so the caller can fall back to explicit
    /// indices.
    Inexact {
        /// The storage that was to be referenced
        storage: &'a mut [T],
        /// Bounds that were actually stored, if the window could be stored
        /// at all
        stored: Option<Bounds>,
    },
}

impl<'a, T> Encoding<'a, T> {
    /// Check whether the encoding was exact.
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }

    /// Keep the reference if the encoding was exact.
    pub fn exact(self) -> Option<BoundedRef<'a, T>> {
        match self {
            Self::Exact(reference) => Some(reference),
            Self::Inexact { .. } => None,
        }
    }
}
