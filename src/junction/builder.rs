use std::sync::Arc;

use serde::{Deserialize, Serialize};
use simple_error::SimpleResult;

use super::alignment_filter::JunctionFilterSettings;
use super::chimeric_alignment::ChimericAlignment;
use super::classifier::is_not_simple_translocation;
use crate::alignment_region::AlignmentRegion;
use crate::log_utils::debug_msg;

/// Summary of how the alignment regions of one or more contigs were used
///
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct JunctionBuildStats {
    pub alignment_region_count: usize,

    /// Regions skipped for low mapping quality before the first usable region of the contig
    pub leading_low_mapq_region_count: usize,

    /// Regions dropped as too short to be used as a junction flank
    pub short_region_count: usize,

    /// Regions recorded as potential inserted sequence between two junction flanks
    pub insertion_region_count: usize,

    pub junction_count: usize,
    pub simple_translocation_count: usize,
}

impl JunctionBuildStats {
    pub fn merge(&mut self, other: &Self) {
        self.alignment_region_count += other.alignment_region_count;
        self.leading_low_mapq_region_count += other.leading_low_mapq_region_count;
        self.short_region_count += other.short_region_count;
        self.insertion_region_count += other.insertion_region_count;
        self.junction_count += other.junction_count;
        self.simple_translocation_count += other.simple_translocation_count;
    }
}

/// State of the pairwise walk over one contig's alignment regions
///
struct JunctionWalkState {
    current: AlignmentRegion,
    pending_insertions: Vec<String>,
    junctions: Vec<ChimericAlignment>,
}

/// Parse all alignment regions of a single locally-assembled contig into chimeric alignments
///
/// Regions are ordered by their start position on the contig. Ties retain their input order.
///
/// The following regions are skipped:
/// 1. Regions with low mapping quality preceding the first high mapping quality region
/// 2. Regions which are too short after removing contig overlap with the current flanking region
///
/// If a region passes these filters but could represent inserted sequence, it is recorded in the
/// insertion mappings of the next returned junction rather than used as a junction flank. Regions
/// recorded before a junction which is filtered out are carried forward to the next returned
/// junction.
///
/// Junctions classified as simple translocations are not returned.
///
/// Returns an error if any pair of flanking regions fails the chimeric alignment construction
/// checks. This indicates inconsistent input rather than a low quality alignment.
///
/// # Arguments
/// * `stats` - region usage counts for the contig are added to this summary
/// * `debug` - print each walk decision directly to stderr
///
pub fn from_split_alignments(
    settings: &JunctionFilterSettings,
    mut regions: Vec<AlignmentRegion>,
    contig_seq: Arc<[u8]>,
    stats: &mut JunctionBuildStats,
    debug: bool,
) -> SimpleResult<Vec<ChimericAlignment>> {
    stats.alignment_region_count += regions.len();

    if regions.len() < 2 {
        return Ok(Vec::new());
    }

    // Stable sort, so the tie-break order is the input order
    regions.sort_by_key(|x| x.contig_range.start);

    let mut regions = regions.into_iter().peekable();

    // Fast forward to the first region with high mapq
    let current = loop {
        match regions.next() {
            Some(x) if settings.map_qual_too_low(&x) => {
                stats.leading_low_mapq_region_count += 1;
            }
            Some(x) => break x,
            None => return Ok(Vec::new()),
        }
    };

    let mut state = JunctionWalkState {
        current,
        pending_insertions: Vec::new(),
        junctions: Vec::new(),
    };

    while let Some(next) = regions.next() {
        if settings.first_alignment_too_short(&state.current, &next) {
            debug_msg!(
                debug,
                "Skipping short alignment region: {}",
                next.to_packed_string()
            );
            stats.short_region_count += 1;
            continue;
        }

        if settings.next_alignment_may_be_novel_insertion(&state.current, &next) {
            if regions.peek().is_none() {
                break;
            }
            debug_msg!(
                debug,
                "Alignment region may be inserted sequence: {}",
                next.to_packed_string()
            );
            stats.insertion_region_count += 1;
            state.pending_insertions.push(next.to_packed_string());
            continue;
        }

        let ca = ChimericAlignment::new(
            state.current,
            next.clone(),
            contig_seq.clone(),
            state.pending_insertions.clone(),
        )?;

        let involves_ref_interval_switch = ca.involves_ref_position_switch();
        if is_not_simple_translocation(
            &ca.region_with_lower_coord_on_contig,
            &ca.region_with_higher_coord_on_contig,
            ca.strand_switch,
            involves_ref_interval_switch,
        ) {
            let (segment1, segment2) = ca.get_coord_sorted_reference_segments();
            debug_msg!(
                debug,
                "Found junction between {segment1} and {segment2} with strand switch {}",
                ca.strand_switch
            );
            stats.junction_count += 1;
            state.pending_insertions.clear();
            state.junctions.push(ca);
        } else {
            debug_msg!(debug, "Skipping simple translocation junction: {ca}");
            stats.simple_translocation_count += 1;
        }

        state.current = next;
    }

    Ok(state.junctions)
}
