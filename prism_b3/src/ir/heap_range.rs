//! Abstract heap ranges.
//!
//! Memory operations name the part of the abstract heap they touch as a
//! half-open interval `[begin, end)`. Front ends carve the heap into disjoint
//! ranges (object fields, array storage, wasm memory, ...) so that accesses
//! to different ranges can be reordered freely. The empty range touches
//! nothing; [`HeapRange::top`] touches everything.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HeapRange {
    begin: u32,
    end: u32,
}

impl HeapRange {
    /// `[begin, end)`. Panics if the bounds are inverted.
    ///
    /// Every zero-length range is the canonical [`HeapRange::empty`].
    pub fn new(begin: u32, end: u32) -> Self {
        assert!(begin <= end, "inverted heap range {begin}...{end}");
        if begin == end {
            return HeapRange::empty();
        }
        HeapRange { begin, end }
    }

    /// The range containing exactly `location`.
    pub fn single(location: u32) -> Self {
        assert!(location < u32::MAX, "heap location out of range");
        HeapRange {
            begin: location,
            end: location + 1,
        }
    }

    /// The empty range.
    #[inline]
    pub const fn empty() -> Self {
        HeapRange { begin: 0, end: 0 }
    }

    /// The whole heap.
    #[inline]
    pub const fn top() -> Self {
        HeapRange {
            begin: 0,
            end: u32::MAX,
        }
    }

    #[inline]
    pub const fn begin(self) -> u32 {
        self.begin
    }

    #[inline]
    pub const fn end(self) -> u32 {
        self.end
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.begin == self.end
    }

    #[inline]
    pub const fn is_top(self) -> bool {
        self.begin == 0 && self.end == u32::MAX
    }

    /// Whether the two ranges share at least one location.
    #[inline]
    pub const fn overlaps(self, other: HeapRange) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.begin < other.end && other.begin < self.end
    }

    /// Smallest range covering both. Empty ranges are the identity.
    pub const fn union(self, other: HeapRange) -> HeapRange {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        HeapRange {
            begin: if self.begin < other.begin {
                self.begin
            } else {
                other.begin
            },
            end: if self.end > other.end {
                self.end
            } else {
                other.end
            },
        }
    }
}

impl BitOr for HeapRange {
    type Output = HeapRange;

    fn bitor(self, rhs: HeapRange) -> HeapRange {
        self.union(rhs)
    }
}

impl BitOrAssign for HeapRange {
    fn bitor_assign(&mut self, rhs: HeapRange) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for HeapRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_top() {
            f.write_str("Top")
        } else if self.is_empty() {
            f.write_str("Bottom")
        } else {
            write!(f, "{}...{}", self.begin, self.end)
        }
    }
}
