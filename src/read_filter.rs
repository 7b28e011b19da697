//! Boolean checks over alignment record flags, used to select the records that can serve as SV
//! evidence
//!

use rust_htslib::bam;

use crate::bam_utils::get_cigar_match_len;

#[derive(Clone, Default)]
pub struct ReadFilter {
    #[allow(dead_code)]
    pub min_evidence_mapq: u8,

    #[allow(dead_code)]
    pub min_evidence_match_len: usize,

    /// Fragments shorter than the read length may align with the reverse-strand read slightly
    /// ahead of its mate. This is the tolerated overhang in reference bases.
    #[allow(dead_code)]
    pub allowed_short_fragment_overhang: i64,
}

impl ReadFilter {
    #[allow(dead_code)]
    pub fn new(
        min_evidence_mapq: u8,
        min_evidence_match_len: usize,
        allowed_short_fragment_overhang: i64,
    ) -> Self {
        Self {
            min_evidence_mapq,
            min_evidence_match_len,
            allowed_short_fragment_overhang,
        }
    }

    pub fn not_junk(&self, record: &bam::Record) -> bool {
        !record.is_duplicate() && !record.is_quality_check_failed()
    }

    pub fn is_primary_line(&self, record: &bam::Record) -> bool {
        !record.is_secondary() && !record.is_supplementary()
    }

    pub fn is_mapped(&self, record: &bam::Record) -> bool {
        self.not_junk(record) && !record.is_unmapped()
    }

    #[allow(dead_code)]
    pub fn is_evidence(&self, record: &bam::Record) -> bool {
        self.is_mapped(record)
            && record.mapq() >= self.min_evidence_mapq
            && get_cigar_match_len(&record.cigar()) >= self.min_evidence_match_len
    }

    /// A properly oriented first-of-pair evidence read, with the mate on the same chromosome
    ///
    #[allow(dead_code)]
    pub fn is_non_discordant_evidence(&self, record: &bam::Record) -> bool {
        self.is_evidence(record)
            && self.is_primary_line(record)
            && record.is_first_in_template()
            && !record.is_mate_unmapped()
            && record.is_reverse() != record.is_mate_reverse()
            && record.tid() == record.mtid()
            && if record.is_reverse() {
                record.pos() + self.allowed_short_fragment_overhang >= record.mpos()
            } else {
                record.pos() - self.allowed_short_fragment_overhang <= record.mpos()
            }
    }
}
