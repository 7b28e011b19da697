//! Strand and reference-order classification of an ordered pair of contig alignment regions
//!
//! All functions take the region with the lower contig coordinate first.
//!

use crate::alignment_region::AlignmentRegion;

/// Relationship between the strands of the two regions flanking a junction, in contig order
///
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display, strum::EnumCount, strum::FromRepr)]
#[repr(i32)]
pub enum StrandSwitch {
    NoSwitch = 0,
    ForwardToReverse = 1,
    ReverseToForward = 2,
}

pub fn determine_strand_switch(first: &AlignmentRegion, second: &AlignmentRegion) -> StrandSwitch {
    if first.is_fwd_strand == second.is_fwd_strand {
        StrandSwitch::NoSwitch
    } else if first.is_fwd_strand {
        StrandSwitch::ForwardToReverse
    } else {
        StrandSwitch::ReverseToForward
    }
}

/// True if the region with the higher contig coordinate maps to a lower reference coordinate
///
pub fn involves_ref_position_switch(
    region_with_lower_coord_on_contig: &AlignmentRegion,
    region_with_higher_coord_on_contig: &AlignmentRegion,
) -> bool {
    region_with_higher_coord_on_contig.ref_segment.range.start
        < region_with_lower_coord_on_contig.ref_segment.range.start
}

/// A junction can be assembled from a contig matching either reference strand. This flag marks
/// one of the two equivalent representations so that they can be treated as one event.
///
pub fn is_forward_strand_representation(
    region_with_lower_coord_on_contig: &AlignmentRegion,
    region_with_higher_coord_on_contig: &AlignmentRegion,
    strand_switch: StrandSwitch,
    involves_ref_interval_switch: bool,
) -> bool {
    if strand_switch == StrandSwitch::NoSwitch {
        region_with_lower_coord_on_contig.is_fwd_strand
            && region_with_higher_coord_on_contig.is_fwd_strand
    } else {
        !involves_ref_interval_switch
    }
}

/// Return false for junctions that should be skipped as simple translocations
///
/// The regions must map to the same chromosome, and then either switch strand, or have a
/// reference order consistent with the strand of the lower region.
///
/// This also removes some insertions where the inserted sequence maps to a chromosome other
/// than that of the flanking regions.
///
pub fn is_not_simple_translocation(
    region_with_lower_coord_on_contig: &AlignmentRegion,
    region_with_higher_coord_on_contig: &AlignmentRegion,
    strand_switch: StrandSwitch,
    involves_ref_interval_switch: bool,
) -> bool {
    let same_chrom = region_with_lower_coord_on_contig
        .ref_segment
        .is_same_chrom(&region_with_higher_coord_on_contig.ref_segment);
    same_chrom
        && (strand_switch != StrandSwitch::NoSwitch
            || involves_ref_interval_switch == !region_with_lower_coord_on_contig.is_fwd_strand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment_region::test_utils::get_test_region;

    fn get_strand_pair(fwd1: bool, fwd2: bool) -> (AlignmentRegion, AlignmentRegion) {
        (
            get_test_region(1, 100, "chr1", 1000, 1099, fwd1, 60),
            get_test_region(101, 200, "chr1", 5000, 5099, fwd2, 60),
        )
    }

    #[test]
    fn test_determine_strand_switch() {
        let (a, b) = get_strand_pair(true, true);
        assert_eq!(determine_strand_switch(&a, &b), StrandSwitch::NoSwitch);

        let (a, b) = get_strand_pair(true, false);
        assert_eq!(determine_strand_switch(&a, &b), StrandSwitch::ForwardToReverse);

        let (a, b) = get_strand_pair(false, true);
        assert_eq!(determine_strand_switch(&a, &b), StrandSwitch::ReverseToForward);

        let (a, b) = get_strand_pair(false, false);
        assert_eq!(determine_strand_switch(&a, &b), StrandSwitch::NoSwitch);
    }

    #[test]
    fn test_strand_switch_ordinal() {
        assert_eq!(StrandSwitch::NoSwitch as i32, 0);
        assert_eq!(StrandSwitch::ForwardToReverse as i32, 1);
        assert_eq!(StrandSwitch::ReverseToForward as i32, 2);
        assert_eq!(StrandSwitch::from_repr(2), Some(StrandSwitch::ReverseToForward));
        assert_eq!(StrandSwitch::from_repr(3), None);
    }

    #[test]
    fn test_involves_ref_position_switch() {
        let lower = get_test_region(1, 100, "chr1", 1000, 1099, true, 60);
        let higher = get_test_region(101, 200, "chr1", 5000, 5099, true, 60);
        assert!(!involves_ref_position_switch(&lower, &higher));
        assert!(involves_ref_position_switch(&higher, &lower));
    }

    #[test]
    fn test_is_forward_strand_representation() {
        // No switch: forward iff both regions are forward
        let (a, b) = get_strand_pair(true, true);
        assert!(is_forward_strand_representation(&a, &b, StrandSwitch::NoSwitch, false));
        assert!(is_forward_strand_representation(&a, &b, StrandSwitch::NoSwitch, true));

        let (a, b) = get_strand_pair(false, false);
        assert!(!is_forward_strand_representation(&a, &b, StrandSwitch::NoSwitch, false));

        // Strand switch: forward iff no reference position switch
        let (a, b) = get_strand_pair(true, false);
        assert!(is_forward_strand_representation(&a, &b, StrandSwitch::ForwardToReverse, false));
        assert!(!is_forward_strand_representation(&a, &b, StrandSwitch::ForwardToReverse, true));

        let (a, b) = get_strand_pair(false, true);
        assert!(is_forward_strand_representation(&a, &b, StrandSwitch::ReverseToForward, false));
        assert!(!is_forward_strand_representation(&a, &b, StrandSwitch::ReverseToForward, true));
    }

    #[test]
    fn test_is_not_simple_translocation() {
        // Forward-strand deletion
        let lower = get_test_region(1, 100, "chr1", 1000, 1099, true, 60);
        let higher = get_test_region(101, 200, "chr1", 5000, 5099, true, 60);
        assert!(is_not_simple_translocation(&lower, &higher, StrandSwitch::NoSwitch, false));

        // Forward-strand regions in swapped reference order
        assert!(!is_not_simple_translocation(&higher, &lower, StrandSwitch::NoSwitch, true));

        // Reverse-strand deletion, which appears as a reference position switch
        let lower = get_test_region(1, 100, "chr1", 5000, 5099, false, 60);
        let higher = get_test_region(101, 200, "chr1", 1000, 1099, false, 60);
        assert!(is_not_simple_translocation(&lower, &higher, StrandSwitch::NoSwitch, true));
        assert!(!is_not_simple_translocation(&lower, &higher, StrandSwitch::NoSwitch, false));

        // Inversion-style strand switch on one chromosome
        let lower = get_test_region(1, 100, "chr1", 1000, 1099, true, 60);
        let higher = get_test_region(101, 200, "chr1", 5000, 5099, false, 60);
        assert!(is_not_simple_translocation(&lower, &higher, StrandSwitch::ForwardToReverse, false));

        // Inter-chromosomal pairs are always translocations, regardless of strand
        for (fwd1, fwd2) in [(true, true), (true, false), (false, true), (false, false)] {
            let lower = get_test_region(1, 100, "chr1", 1000, 1099, fwd1, 60);
            let higher = get_test_region(101, 200, "chr2", 5000, 5099, fwd2, 60);
            let strand_switch = determine_strand_switch(&lower, &higher);
            let ref_switch = involves_ref_position_switch(&lower, &higher);
            assert!(!is_not_simple_translocation(&lower, &higher, strand_switch, ref_switch));
        }
    }
}
