//! Half-open integer intervals over class ids and table slots.
//!
//! The same type describes three things: a range of class ids that inherit
//! a member, a selector's footprint after shifting it by its table offset,
//! and a run of free slots in the row fitter. All are `[begin, end)` with
//! `begin < end`.

use std::fmt;
use std::ops::Range;

use crate::ClassId;

/// A non-empty half-open interval `[begin, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    begin: i32,
    end: i32,
}

impl Interval {
    /// Create an interval. `begin` must be strictly less than `end`.
    #[inline]
    pub fn new(begin: i32, end: i32) -> Self {
        debug_assert!(begin < end, "empty interval [{begin}, {end})");
        Self { begin, end }
    }

    /// The single-class interval `[cid, cid + 1)`.
    #[inline]
    pub fn of_class(cid: ClassId) -> Self {
        let column = cid.column();
        Self::new(column, column + 1)
    }

    #[inline]
    pub fn begin(self) -> i32 {
        self.begin
    }

    #[inline]
    pub fn end(self) -> i32 {
        self.end
    }

    #[inline]
    pub fn length(self) -> i32 {
        self.end - self.begin
    }

    /// This interval shifted by `offset`.
    #[inline]
    pub fn with_offset(self, offset: i32) -> Self {
        Self::new(self.begin + offset, self.end + offset)
    }

    /// Every point of `self` lies before `other`.
    #[inline]
    pub fn is_before(self, other: Interval) -> bool {
        self.end <= other.begin
    }

    /// Every point of `self` lies after `other`.
    #[inline]
    pub fn is_after(self, other: Interval) -> bool {
        self.begin >= other.end
    }

    #[inline]
    pub fn overlaps(self, other: Interval) -> bool {
        !self.is_before(other) && !self.is_after(other)
    }

    /// `other.begin` lies within `[begin, end]`.
    ///
    /// Inclusive at both ends: an interval starting exactly at `self.end`
    /// counts, so touching intervals can be absorbed.
    #[inline]
    pub fn contains_begin_of(self, other: Interval) -> bool {
        self.begin <= other.begin && other.begin <= self.end
    }

    /// `other.end` lies within `[begin, end]`.
    #[inline]
    pub fn contains_end_of(self, other: Interval) -> bool {
        self.begin <= other.end && other.end <= self.end
    }

    #[inline]
    pub fn contains(self, other: Interval) -> bool {
        self.contains_begin_of(other) && self.contains_end_of(other)
    }

    /// Grow `self` to the smallest interval covering both.
    pub fn extend_to_include(&mut self, other: Interval) {
        self.begin = self.begin.min(other.begin);
        self.end = self.end.max(other.end);
    }

    /// The points of the interval, for filling table slots.
    #[inline]
    pub fn points(self) -> Range<i32> {
        self.begin..self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}
