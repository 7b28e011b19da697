use std::fmt;

use rust_htslib::bam::record::CigarString;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, bail, try_with};

use crate::genome_segment::GenomeSegment;
use crate::int_range::IntRange;

const PACKED_STRING_SEPARATOR: &str = "_";

/// One contiguous mapping of a contiguous contig sub-range to a contiguous reference range
///
/// This is one segment of the split alignment of a locally assembled contig. Regions are produced
/// from the contig alignment file and are not modified afterward.
///
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AlignmentRegion {
    pub assembly_id: String,
    pub contig_id: String,

    /// Aligned range of the contig, in the contig's own (sequencing) orientation
    pub contig_range: IntRange,

    pub ref_segment: GenomeSegment,

    pub is_fwd_strand: bool,

    /// Alignment cigar along the 5' to 3' direction of the contig
    #[serde(with = "cigar_text")]
    pub cigar: CigarString,

    pub mapq: u8,

    /// Alignment edit distance
    pub mismatches: i32,

    pub contig_len: usize,
}

impl AlignmentRegion {
    /// 1-indexed first aligned contig position
    pub fn start_in_assembled_contig(&self) -> i64 {
        self.contig_range.start + 1
    }

    /// 1-indexed last aligned contig position
    pub fn end_in_assembled_contig(&self) -> i64 {
        self.contig_range.end
    }

    fn strand_char(&self) -> char {
        if self.is_fwd_strand { '+' } else { '-' }
    }

    /// Compact single-token description of the region, used to record regions absorbed as
    /// candidate inserted sequence
    ///
    pub fn to_packed_string(&self) -> String {
        [
            self.start_in_assembled_contig().to_string(),
            self.end_in_assembled_contig().to_string(),
            self.ref_segment.chrom.clone(),
            (self.ref_segment.range.start + 1).to_string(),
            self.ref_segment.range.end.to_string(),
            self.strand_char().to_string(),
            self.cigar.to_string(),
            self.mapq.to_string(),
            self.mismatches.to_string(),
        ]
        .join(PACKED_STRING_SEPARATOR)
    }

    /// Binary encoding of the region, nested within the junction record encoding
    ///
    pub fn encode(&self) -> SimpleResult<Vec<u8>> {
        let buf = try_with!(
            rmp_serde::to_vec(self),
            "Unable to serialize alignment region: {self}"
        );
        Ok(buf)
    }

    pub fn decode(buf: &[u8]) -> SimpleResult<Self> {
        let region: Self = try_with!(
            rmp_serde::from_slice(buf),
            "Unable to deserialize alignment region"
        );
        if region.ref_segment.size() <= 0 {
            bail!(
                "Deserialized alignment region has an empty reference interval: {}",
                region
            );
        }
        Ok(region)
    }
}

impl fmt::Display for AlignmentRegion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.assembly_id,
            self.contig_id,
            self.ref_segment,
            self.strand_char(),
            self.cigar,
            self.mapq,
            self.start_in_assembled_contig(),
            self.end_in_assembled_contig(),
            self.mismatches
        )
    }
}

/// Store cigar strings in their SAM text form
mod cigar_text {
    use rust_htslib::bam::record::CigarString;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(cigar: &CigarString, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&cigar.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<CigarString, D::Error> {
        let text = String::deserialize(d)?;
        CigarString::try_from(text.as_bytes()).map_err(de::Error::custom)
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::*;

    /// Build a test region from 1-indexed closed contig and reference coordinates
    ///
    pub fn get_test_region(
        contig_start: i64,
        contig_end: i64,
        chrom: &str,
        ref_start: i64,
        ref_end: i64,
        is_fwd_strand: bool,
        mapq: u8,
    ) -> AlignmentRegion {
        let aligned_len = contig_end - contig_start + 1;
        AlignmentRegion {
            assembly_id: "asm000001".to_string(),
            contig_id: "tig00001".to_string(),
            contig_range: IntRange::from_pair(contig_start - 1, contig_end),
            ref_segment: GenomeSegment::from_chrom_range(chrom, ref_start - 1, ref_end),
            is_fwd_strand,
            cigar: CigarString::try_from(format!("{aligned_len}M").as_bytes()).unwrap(),
            mapq,
            mismatches: 0,
            contig_len: 500,
        }
    }
}
