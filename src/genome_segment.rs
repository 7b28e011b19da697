use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::int_range::IntRange;

/// The structure represents a contiguous region of the genome on a single chromosome
///
/// The chromosome is stored by name rather than by header index, so that a segment can be
/// interpreted without the alignment file header it was parsed from.
///
#[derive(Clone, Deserialize, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize)]
pub struct GenomeSegment {
    pub chrom: String,
    pub range: IntRange,
}

impl GenomeSegment {
    pub fn from_chrom_range(chrom: &str, start: i64, end: i64) -> Self {
        Self {
            chrom: chrom.to_string(),
            range: IntRange::from_pair(start, end),
        }
    }

    /// Convert to a string in 'samtools' region format (e.g. chr20:100-200)
    ///
    pub fn to_region_str(&self) -> String {
        format!("{}:{}-{}", self.chrom, self.range.start + 1, self.range.end)
    }

    pub fn size(&self) -> i64 {
        self.range.size()
    }

    pub fn is_same_chrom(&self, other: &Self) -> bool {
        self.chrom == other.chrom
    }

    /// Return true if `other` is on the same chromosome and completely enclosed by this segment
    ///
    pub fn contains(&self, other: &Self) -> bool {
        self.is_same_chrom(other) && self.range.contains_range(&other.range)
    }
}

impl fmt::Debug for GenomeSegment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Segment: {}:{:?}", self.chrom, self.range)
    }
}

impl fmt::Display for GenomeSegment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_region_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_region_string() {
        let segment = GenomeSegment::from_chrom_range("chr2", 10, 11);
        assert_eq!(segment.to_region_str(), "chr2:11-11".to_string());

        let segment = GenomeSegment::from_chrom_range("chr1", 0, 100);
        assert_eq!(segment.to_string(), "chr1:1-100".to_string());
    }

    #[test]
    fn test_contains() {
        let outer = GenomeSegment::from_chrom_range("chr1", 0, 100);
        let inner = GenomeSegment::from_chrom_range("chr1", 10, 20);
        let other_chrom = GenomeSegment::from_chrom_range("chr2", 10, 20);

        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(!outer.contains(&other_chrom));
    }
}
