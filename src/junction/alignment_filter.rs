//! Alignment quality checks applied while pairing contig alignment regions into junctions
//!

use serde::{Deserialize, Serialize};

use crate::alignment_region::AlignmentRegion;
use crate::int_range::get_overlap_size;

pub const DEFAULT_MIN_MAPQ: u8 = 60;
pub const DEFAULT_MIN_ALIGN_LENGTH: i64 = 50;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct JunctionFilterSettings {
    /// Alignment regions with mapping quality below this value are not used as junction flanks
    pub min_mapq: u8,

    /// Minimum reference length of an alignment region after subtracting its contig overlap with
    /// the neighboring region
    pub min_align_length: i64,
}

impl Default for JunctionFilterSettings {
    fn default() -> Self {
        Self {
            min_mapq: DEFAULT_MIN_MAPQ,
            min_align_length: DEFAULT_MIN_ALIGN_LENGTH,
        }
    }
}

impl JunctionFilterSettings {
    pub fn map_qual_too_low(&self, region: &AlignmentRegion) -> bool {
        region.mapq < self.min_mapq
    }

    /// Reference length of `first` which is not shared with `second` on the contig
    ///
    pub fn effective_length(&self, first: &AlignmentRegion, second: &AlignmentRegion) -> i64 {
        first.ref_segment.size() - overlap_on_contig(first, second)
    }

    pub fn first_alignment_too_short(
        &self,
        first: &AlignmentRegion,
        second: &AlignmentRegion,
    ) -> bool {
        self.effective_length(first, second) < self.min_align_length
    }

    /// Test whether `next`, the region with the higher contig coordinate, is more likely to be
    /// inserted sequence than a breakpoint flank
    ///
    /// Note the short alignment check is made on `next` with respect to `current`, the reverse
    /// of the argument order used to drop short regions during the junction walk.
    ///
    pub fn next_alignment_may_be_novel_insertion(
        &self,
        current: &AlignmentRegion,
        next: &AlignmentRegion,
    ) -> bool {
        self.map_qual_too_low(next)
            || self.first_alignment_too_short(next, current)
            || current.ref_segment.contains(&next.ref_segment)
            || next.ref_segment.contains(&current.ref_segment)
    }
}

/// Size of the intersection of the two regions' contig ranges, 0 if they are disjoint
///
pub fn overlap_on_contig(first: &AlignmentRegion, second: &AlignmentRegion) -> i64 {
    get_overlap_size(&first.contig_range, &second.contig_range)
}
