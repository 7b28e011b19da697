use std::fmt;
use std::sync::Arc;

use simple_error::{SimpleResult, bail};

use super::classifier::{
    StrandSwitch, determine_strand_switch, involves_ref_position_switch,
    is_forward_strand_representation,
};
use crate::alignment_region::AlignmentRegion;
use crate::genome_segment::GenomeSegment;

/// The junction on a contig of two of its alignment regions, which may represent an SV breakpoint
///
/// If a contig aligns to three different regions of the genome, two chimeric alignments are
/// created, one for each junction between consecutive alignment regions:
///
/// ```text
/// Contig:
/// ACTGACTGCACTGACTGCACTGACTGCACTGACTGCACTGACTGCACTGACTGCACTGACTGCACTGACTGCACTGACTGCA
/// Alignment regions:
/// |--------1:100-200--------|
///                            |---------2:100-200--------|
///                                                        |--------3:100-200--------|
/// Junctions:
/// 1) links 1:100-200 to 2:100-200
/// 2) links 2:100-200 to 3:100-200
/// ```
///
/// Inserted sequence is contig sequence aligned to neither flanking region. Homology is contig
/// sequence which could belong to either flanking region, which leaves the exact breakpoint
/// location ambiguous.
///
#[derive(Clone, Debug, PartialEq)]
pub struct ChimericAlignment {
    pub region_with_lower_coord_on_contig: AlignmentRegion,
    pub region_with_higher_coord_on_contig: AlignmentRegion,

    pub strand_switch: StrandSwitch,
    pub is_forward_strand_representation: bool,

    /// Full sequence of the contig, shared by all junctions found on the contig
    pub contig_seq: Arc<[u8]>,

    /// Packed descriptions of the alignment regions between the two flanking regions which were
    /// treated as potential inserted sequence
    pub insertion_mappings: Vec<String>,
}

impl ChimericAlignment {
    /// Create a new junction from two alignment regions of the same contig
    ///
    /// The regions must be given in contig order, and neither region's reference interval may
    /// contain the other's.
    ///
    pub fn new(
        region_with_lower_coord_on_contig: AlignmentRegion,
        region_with_higher_coord_on_contig: AlignmentRegion,
        contig_seq: Arc<[u8]>,
        insertion_mappings: Vec<String>,
    ) -> SimpleResult<Self> {
        let strand_switch = determine_strand_switch(
            &region_with_lower_coord_on_contig,
            &region_with_higher_coord_on_contig,
        );
        let involves_ref_interval_switch = involves_ref_position_switch(
            &region_with_lower_coord_on_contig,
            &region_with_higher_coord_on_contig,
        );
        let is_forward_strand_representation = is_forward_strand_representation(
            &region_with_lower_coord_on_contig,
            &region_with_higher_coord_on_contig,
            strand_switch,
            involves_ref_interval_switch,
        );

        let ca = Self {
            region_with_lower_coord_on_contig,
            region_with_higher_coord_on_contig,
            strand_switch,
            is_forward_strand_representation,
            contig_seq,
            insertion_mappings,
        };
        ca.validate()?;
        Ok(ca)
    }

    /// Check the structural requirements of the region pair
    ///
    pub fn validate(&self) -> SimpleResult<()> {
        let lower = &self.region_with_lower_coord_on_contig;
        let higher = &self.region_with_higher_coord_on_contig;
        if lower.assembly_id != higher.assembly_id {
            bail!(
                "Two alignment regions used to construct chimeric alignment are not from the same local assembly: '{}' and '{}'",
                lower.assembly_id,
                higher.assembly_id
            );
        }
        if lower.contig_id != higher.contig_id {
            bail!(
                "Two alignment regions used to construct chimeric alignment are not from the same assembled contig: '{}' and '{}'",
                lower.contig_id,
                higher.contig_id
            );
        }
        if lower.ref_segment.contains(&higher.ref_segment)
            || higher.ref_segment.contains(&lower.ref_segment)
        {
            bail!(
                "One alignment region contains the other in chimeric alignment: {} {}",
                lower.to_packed_string(),
                higher.to_packed_string()
            );
        }
        if lower.contig_range.start > higher.contig_range.start {
            bail!(
                "Alignment regions used to construct chimeric alignment are not in contig order: {} {}",
                lower.to_packed_string(),
                higher.to_packed_string()
            );
        }
        Ok(())
    }

    pub fn involves_ref_position_switch(&self) -> bool {
        involves_ref_position_switch(
            &self.region_with_lower_coord_on_contig,
            &self.region_with_higher_coord_on_contig,
        )
    }

    /// Get the two reference intervals ordered by reference position, regardless of their order
    /// on the contig
    ///
    pub fn get_coord_sorted_reference_segments(&self) -> (&GenomeSegment, &GenomeSegment) {
        let lower = &self.region_with_lower_coord_on_contig.ref_segment;
        let higher = &self.region_with_higher_coord_on_contig.ref_segment;
        if self.involves_ref_position_switch() {
            (higher, lower)
        } else {
            (lower, higher)
        }
    }
}

impl fmt::Display for ChimericAlignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}",
            self.region_with_lower_coord_on_contig,
            self.region_with_higher_coord_on_contig,
            String::from_utf8_lossy(&self.contig_seq)
        )
    }
}
