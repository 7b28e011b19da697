use std::fmt;

use serde::{Deserialize, Serialize};

/// A simple type for integer ranges
///
/// All ranges follow the bed file range convention: 0-indexed, half-closed, [start,end)
///
/// This struct is used instead of the native rust Range type just to focus on the specific goals of
/// contig and reference alignment intervals.
///
#[derive(Clone, Default, Deserialize, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize)]
pub struct IntRange {
    pub start: i64,
    pub end: i64,
}

impl IntRange {
    pub fn from_pair(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn size(&self) -> i64 {
        self.end - self.start
    }

    /// Return true if the ranges intersect (adjacency does not count)
    ///
    pub fn intersect_range(&self, other: &IntRange) -> bool {
        other.end > self.start && other.start < self.end
    }

    /// Return true if `other` is completely enclosed by this range
    ///
    /// Identical ranges contain each other.
    ///
    pub fn contains_range(&self, other: &IntRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Debug for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}-{})", self.start, self.end)
    }
}

/// Get the size of the intersection of two ranges
///
/// Returns 0 if the ranges do not intersect.
///
pub fn get_overlap_size(r1: &IntRange, r2: &IntRange) -> i64 {
    use std::cmp::{max, min};
    if !r1.intersect_range(r2) {
        return 0;
    }
    min(r1.end, r2.end) - max(r1.start, r2.start)
}
