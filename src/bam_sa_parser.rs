use rust_htslib::bam::{self, record::CigarString};
use simple_error::{SimpleResult, bail, try_with};

use crate::bam_utils::{
    get_complete_read_clip_positions, get_optional_int_aux_tag, get_optional_string_aux_tag,
    get_qname, has_aligned_segments,
};

/// Object to directly represent one segment from a BAM split alignment
pub struct SplitReadSegment {
    /// reference sequence name
    pub rname: String,

    /// reference zero-indexed alignment start position
    pub pos: i64,

    /// Alignment using rust_htslib::bam::record::Cigar object
    pub cigar: CigarString,

    pub is_fwd_strand: bool,

    /// mapping quality
    pub mapq: u8,

    /// alignment edit distance
    pub nm: i32,
}

/// Parse one segment from the bam SA aux tag string into a split alignment object
///
pub fn parse_sa_segment(seg: &str) -> SimpleResult<SplitReadSegment> {
    let sa_fields = seg.split_terminator(',').collect::<Vec<_>>();
    if sa_fields.len() != 6 {
        bail!("Unexpected segment in bam SA tag: '{seg}'");
    }
    let rname = sa_fields[0].to_string();
    let pos = try_with!(
        sa_fields[1].parse::<i64>(),
        "Invalid position in bam SA tag segment: '{seg}'"
    ) - 1;
    let is_fwd_strand = match sa_fields[2] {
        "+" => true,
        "-" => false,
        _ => bail!("Invalid strand in bam SA tag segment: '{seg}'"),
    };
    let cigar = try_with!(
        CigarString::try_from(sa_fields[3].as_bytes()),
        "Invalid CIGAR in bam SA tag segment: '{seg}'"
    );
    let mapq = try_with!(
        sa_fields[4].parse::<u8>(),
        "Invalid MAPQ in bam SA tag segment: '{seg}'"
    );
    let nm = try_with!(
        sa_fields[5].parse::<i32>(),
        "Invalid NM in bam SA tag segment: '{seg}'"
    );
    Ok(SplitReadSegment {
        rname,
        pos,
        cigar,
        is_fwd_strand,
        mapq,
        nm,
    })
}

/// Split the bam SA aux tag into each supplementary alignment, and parse each into a split alignment object
///
pub fn parse_sa_aux_val(sa_aux_val: &str) -> SimpleResult<Vec<SplitReadSegment>> {
    sa_aux_val
        .split_terminator(';')
        .map(parse_sa_segment)
        .collect()
}

/// Object summarizing information for a single segment of a split read alignment
///
/// This is an extension of the simpler SplitReadSegment structure directly parsed from the bam SA tag.
/// It includes read position information consistently translated in sequencing order, and is designed
/// to represent both primary and supplementary alignments.
///
#[derive(Debug)]
pub struct SeqOrderSplitReadSegment {
    /// Sequencer-order read position of left-most position of the alignment segment
    pub seq_order_read_start: usize,

    /// Sequencer-order read position one base after the right-most position of the alignment segment
    pub seq_order_read_end: usize,

    /// Complete read length, including hard-clipped bases
    pub read_size: usize,

    pub chrom: String,
    pub pos: i64,
    pub is_fwd_strand: bool,

    /// Alignment cigar in reference order
    pub cigar: CigarString,
    pub mapq: u8,
    pub nm: i32,
}

/// Get the start and end positions of a split read segment in read coordinates oriented in original sequencing order
///
/// Given read_start and read_end computed for the read segment in the current alignment direction, we need to reverse the
/// computation of start and end to get the read coordinates back to sequencing order.
///
/// Example:
/// For a 100 base read segment mapped in reverse orientation to the reference with CIGAR string 80S15M5S, implying start and end
/// read positions of 80 to 95 in segment mapping orientation, this method reports the position tuple (5,20)
///
fn get_seq_order_read_pos(
    read_start: usize,
    read_end: usize,
    read_size: usize,
    is_fwd_strand: bool,
) -> (usize, usize) {
    if is_fwd_strand {
        (read_start, read_end)
    } else {
        (read_size - read_end, read_size - read_start)
    }
}

/// Parse all read segments from split-read bam record, and order segments in the read sequencing order
///
/// All segments are ordered by their read start position, where the read position is always consistently
/// expressed in the sequencing order of the read. A record without an SA tag yields only its own
/// segment.
///
pub fn get_seq_order_read_split_segments(
    header: &bam::HeaderView,
    record: &bam::Record,
) -> SimpleResult<Vec<SeqOrderSplitReadSegment>> {
    const SA_AUX_TAG: &[u8] = b"SA";
    const NM_AUX_TAG: &[u8] = b"NM";

    let qname = get_qname(record);
    let sa_segments = match get_optional_string_aux_tag(record, SA_AUX_TAG)? {
        Some(sa_aux_val) => parse_sa_aux_val(&sa_aux_val)?,
        None => Vec::new(),
    };

    if record.tid() < 0 {
        bail!("Can't parse split segments from unmapped read {qname}");
    }

    let mut seq_order_read_split_segments = Vec::new();

    // Add the primary alignment first:
    let primary_read_size = {
        let cigar = record.cigar().take();
        let (read_start, read_end, read_size) = get_complete_read_clip_positions(&cigar);
        let is_fwd_strand = !record.is_reverse();
        let (seq_order_read_start, seq_order_read_end) =
            get_seq_order_read_pos(read_start, read_end, read_size, is_fwd_strand);
        let chrom = String::from_utf8_lossy(header.tid2name(record.tid() as u32)).to_string();
        seq_order_read_split_segments.push(SeqOrderSplitReadSegment {
            seq_order_read_start,
            seq_order_read_end,
            read_size,
            chrom,
            pos: record.pos(),
            is_fwd_strand,
            cigar,
            mapq: record.mapq(),
            nm: get_optional_int_aux_tag(record, NM_AUX_TAG)?.unwrap_or(0),
        });
        read_size
    };

    for sa_segment in sa_segments.into_iter() {
        if !has_aligned_segments(&sa_segment.cigar) {
            bail!("Bam record split segment is unaligned in read {qname}");
        }
        let (read_start, read_end, read_size) = get_complete_read_clip_positions(&sa_segment.cigar);
        if read_size != primary_read_size {
            bail!(
                "Bam record split segment length {read_size} does not match primary alignment length {primary_read_size} in read {qname}"
            );
        }
        let (seq_order_read_start, seq_order_read_end) =
            get_seq_order_read_pos(read_start, read_end, read_size, sa_segment.is_fwd_strand);
        seq_order_read_split_segments.push(SeqOrderSplitReadSegment {
            seq_order_read_start,
            seq_order_read_end,
            read_size,
            chrom: sa_segment.rname,
            pos: sa_segment.pos,
            is_fwd_strand: sa_segment.is_fwd_strand,
            cigar: sa_segment.cigar,
            mapq: sa_segment.mapq,
            nm: sa_segment.nm,
        });
    }

    seq_order_read_split_segments.sort_by_key(|x| x.seq_order_read_start);

    // Sanity check the final split read set to ensure that start and end coordinates define a non-empty range in each segment:
    //
    for s in seq_order_read_split_segments.iter() {
        if s.seq_order_read_start >= s.seq_order_read_end {
            bail!(
                "Can't parse consistent split read information from SA tag format in read: {qname}"
            );
        };
    }

    Ok(seq_order_read_split_segments)
}
