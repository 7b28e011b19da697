//! Read contig split alignments from the contig alignment file
//!

use std::collections::HashSet;
use std::sync::Arc;

use bio::alphabets::dna::revcomp;
use log::info;
use rust_htslib::bam::{self, Read, record::CigarString};
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, bail, try_with};
use thousands::Separable;

use crate::alignment_region::AlignmentRegion;
use crate::bam_sa_parser::{SeqOrderSplitReadSegment, get_seq_order_read_split_segments};
use crate::bam_utils::{get_cigar_ref_offset, get_qname};
use crate::genome_segment::GenomeSegment;
use crate::int_range::IntRange;
use crate::log_utils::debug_msg;
use crate::read_filter::ReadFilter;

/// All alignment regions of one assembled contig, with the contig sequence
///
pub struct ContigAlignments {
    pub assembly_id: String,
    pub contig_id: String,

    /// Alignment regions in contig order
    pub regions: Vec<AlignmentRegion>,

    /// Contig sequence in its assembled orientation
    pub contig_seq: Arc<[u8]>,
}

impl ContigAlignments {
    pub fn get_contig_name(&self) -> String {
        format!("{}:{}", self.assembly_id, self.contig_id)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContigScanStats {
    pub alignment_record_count: usize,

    /// Records skipped as unmapped, duplicate, qc-fail, secondary or supplementary
    pub filtered_record_count: usize,

    pub contig_count: usize,

    /// Contigs excluded by the target contig list
    pub untargeted_contig_count: usize,

    /// Contigs aligned to a single region, which cannot contain a junction
    pub contigs_without_split_alignment: usize,
}

/// Split a contig query name into its assembly and contig ids
///
/// Contig names are expected in the format `<assembly_id>:<contig_id>`, with the assembly id
/// ending at the first ':'.
///
pub fn parse_contig_qname(qname: &str) -> SimpleResult<(&str, &str)> {
    match qname.split_once(':') {
        Some((assembly_id, contig_id)) if !assembly_id.is_empty() && !contig_id.is_empty() => {
            Ok((assembly_id, contig_id))
        }
        _ => bail!("Contig name does not follow the '<assembly_id>:<contig_id>' format: '{qname}'"),
    }
}

fn get_alignment_region(
    assembly_id: &str,
    contig_id: &str,
    segment: SeqOrderSplitReadSegment,
) -> AlignmentRegion {
    let ref_end = segment.pos + get_cigar_ref_offset(&segment.cigar);

    // Express the cigar along the contig in its assembled orientation
    let mut cigar = segment.cigar.0;
    if !segment.is_fwd_strand {
        cigar.reverse();
    }

    AlignmentRegion {
        assembly_id: assembly_id.to_string(),
        contig_id: contig_id.to_string(),
        contig_range: IntRange::from_pair(
            segment.seq_order_read_start as i64,
            segment.seq_order_read_end as i64,
        ),
        ref_segment: GenomeSegment::from_chrom_range(&segment.chrom, segment.pos, ref_end),
        is_fwd_strand: segment.is_fwd_strand,
        cigar: CigarString(cigar),
        mapq: segment.mapq,
        mismatches: segment.nm,
        contig_len: segment.read_size,
    }
}

/// Convert the primary alignment record of one contig into the contig's alignment regions and sequence
///
/// The contig sequence is recovered from the record, and reverse complemented back to the assembled
/// orientation if the primary alignment is on the reverse strand.
///
pub fn get_contig_alignments(
    header: &bam::HeaderView,
    record: &bam::Record,
) -> SimpleResult<ContigAlignments> {
    let qname = get_qname(record);
    let (assembly_id, contig_id) = parse_contig_qname(&qname)?;

    let segments = get_seq_order_read_split_segments(header, record)?;
    let contig_len = segments.first().map(|x| x.read_size).unwrap_or(0);

    let mut contig_seq = record.seq().as_bytes();
    if contig_seq.len() != contig_len {
        bail!(
            "Contig sequence length {} does not match alignment length {contig_len} for contig {qname}",
            contig_seq.len()
        );
    }
    if record.is_reverse() {
        contig_seq = revcomp(&contig_seq);
    }

    let regions = segments
        .into_iter()
        .map(|x| get_alignment_region(assembly_id, contig_id, x))
        .collect();

    Ok(ContigAlignments {
        assembly_id: assembly_id.to_string(),
        contig_id: contig_id.to_string(),
        regions,
        contig_seq: Arc::from(contig_seq),
    })
}

pub struct ContigScanSettings<'a> {
    pub bam_filename: &'a str,

    /// Required to decode CRAM input
    pub ref_filename: Option<&'a str>,

    /// If non-empty, only contigs with these names are scanned
    pub target_contigs: &'a [String],

    pub thread_count: usize,
    pub debug: bool,
}

/// Read all contig alignments from the contig alignment file
///
/// Contigs are returned in file order. Only contigs with split alignments are returned.
///
pub fn scan_contig_alignments(
    settings: &ContigScanSettings,
) -> SimpleResult<(Vec<ContigAlignments>, ContigScanStats)> {
    let bam_filename = settings.bam_filename;
    let mut bam_reader = try_with!(
        bam::Reader::from_path(bam_filename),
        "Unable to open contig alignment file: '{bam_filename}'"
    );
    if let Some(ref_filename) = settings.ref_filename {
        try_with!(
            bam_reader.set_reference(ref_filename),
            "Unable to set reference '{ref_filename}' for contig alignment file"
        );
    }
    if settings.thread_count > 1 {
        try_with!(
            bam_reader.set_threads(settings.thread_count),
            "Unable to set decompression threads for contig alignment file"
        );
    }
    let header = bam_reader.header().clone();

    let read_filter = ReadFilter::default();
    let target_contigs = settings
        .target_contigs
        .iter()
        .map(|x| x.as_str())
        .collect::<HashSet<_>>();

    let mut stats = ContigScanStats::default();
    let mut observed_contigs = HashSet::new();
    let mut contigs = Vec::new();

    let mut record = bam::Record::new();
    while let Some(r) = bam_reader.read(&mut record) {
        try_with!(r, "Failed to parse alignment record from '{bam_filename}'");
        stats.alignment_record_count += 1;

        // The SA tag on the primary record describes all other alignment regions of the contig
        if !(read_filter.is_mapped(&record) && read_filter.is_primary_line(&record)) {
            stats.filtered_record_count += 1;
            continue;
        }

        let qname = get_qname(&record);
        if !observed_contigs.insert(qname.clone()) {
            bail!("Multiple primary alignment records found for contig '{qname}'");
        }
        stats.contig_count += 1;

        if !target_contigs.is_empty() && !target_contigs.contains(qname.as_str()) {
            stats.untargeted_contig_count += 1;
            continue;
        }

        let contig = get_contig_alignments(&header, &record)?;
        if contig.regions.len() < 2 {
            stats.contigs_without_split_alignment += 1;
            continue;
        }

        debug_msg!(
            settings.debug,
            "Contig {qname} has {} alignment regions",
            contig.regions.len()
        );
        contigs.push(contig);
    }

    info!(
        "Scanned {} contigs from {} alignment records, found {} contigs with split alignments",
        stats.contig_count.separate_with_commas(),
        stats.alignment_record_count.separate_with_commas(),
        contigs.len().separate_with_commas()
    );

    Ok((contigs, stats))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::bam_utils::test_utils::get_test_header;

    const TEST_SAM_HEADER: &str = "@HD\tVN:1.6\tSO:unsorted\n\
        @SQ\tSN:chr1\tLN:10000000\n\
        @SQ\tSN:chr2\tLN:10000000\n";

    const SPLIT_CONTIG: &str = "asm000001:tig00001\t0\tchr1\t1001\t60\t10M20S\t*\t0\t0\tACGTACGTACGGGGGGGGGGTTTTTTTTTT\t*\tNM:i:1\tSA:Z:chr2,5001,-,10S10M10S,40,2;chr1,2001,-,20M10S,30,0;";

    #[test]
    fn test_parse_contig_qname() {
        assert_eq!(
            parse_contig_qname("asm000001:tig00001").unwrap(),
            ("asm000001", "tig00001")
        );
        assert_eq!(
            parse_contig_qname("asm000001:tig00001:x").unwrap(),
            ("asm000001", "tig00001:x")
        );
        assert!(parse_contig_qname("asm000001").is_err());
        assert!(parse_contig_qname(":tig00001").is_err());
        assert!(parse_contig_qname("asm000001:").is_err());
    }

    #[test]
    fn test_get_contig_alignments() {
        let header = get_test_header();
        let rec = bam::Record::from_sam(&header, SPLIT_CONTIG.as_bytes()).unwrap();
        let contig = get_contig_alignments(&header, &rec).unwrap();

        assert_eq!(contig.assembly_id, "asm000001");
        assert_eq!(contig.contig_id, "tig00001");
        assert_eq!(contig.get_contig_name(), "asm000001:tig00001");
        assert_eq!(contig.contig_seq.as_ref(), b"ACGTACGTACGGGGGGGGGGTTTTTTTTTT");
        assert_eq!(contig.regions.len(), 3);

        let r = &contig.regions[0];
        assert_eq!(r.to_packed_string(), "1_10_chr1_1001_1010_+_10M20S_60_1");
        assert_eq!(r.contig_len, 30);

        let r = &contig.regions[1];
        assert_eq!(r.to_packed_string(), "11_20_chr2_5001_5010_-_10S10M10S_40_2");

        // Reverse strand cigar is expressed in contig order
        let r = &contig.regions[2];
        assert_eq!(r.to_packed_string(), "11_30_chr1_2001_2020_-_10S20M_30_0");
    }

    #[test]
    fn test_reverse_strand_contig_sequence() {
        let header = get_test_header();
        let sam_line = b"asm000002:tig00003\t16\tchr1\t1001\t60\t10M\t*\t0\t0\tAACCGGTTAN\t*";
        let rec = bam::Record::from_sam(&header, sam_line).unwrap();
        let contig = get_contig_alignments(&header, &rec).unwrap();
        assert_eq!(contig.contig_seq.as_ref(), b"NTAACCGGTT");
        assert_eq!(contig.regions.len(), 1);
    }

    #[test]
    fn test_invalid_contig_name() {
        let header = get_test_header();
        let sam_line = b"tig00003\t0\tchr1\t1001\t60\t10M\t*\t0\t0\tAACCGGTTAN\t*";
        let rec = bam::Record::from_sam(&header, sam_line).unwrap();
        assert!(get_contig_alignments(&header, &rec).is_err());
    }

    fn write_test_sam(records: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".sam").tempfile().unwrap();
        file.write_all(TEST_SAM_HEADER.as_bytes()).unwrap();
        for record in records {
            writeln!(file, "{record}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn get_scan_settings<'a>(
        bam_filename: &'a str,
        target_contigs: &'a [String],
    ) -> ContigScanSettings<'a> {
        ContigScanSettings {
            bam_filename,
            ref_filename: None,
            target_contigs,
            thread_count: 1,
            debug: false,
        }
    }

    #[test]
    fn test_scan_contig_alignments() {
        let file = write_test_sam(&[
            SPLIT_CONTIG,
            "asm000001:tig00001\t2064\tchr2\t5001\t40\t10H10M10H\t*\t0\t0\tGGGGGGGGGG\t*",
            "asm000001:tig00002\t4\t*\t0\t0\t*\t*\t0\t0\tACGTACGTAC\t*",
            "asm000002:tig00001\t0\tchr2\t101\t60\t10M\t*\t0\t0\tACGTACGTAC\t*",
        ]);
        let bam_filename = file.path().to_str().unwrap();

        let (contigs, stats) = scan_contig_alignments(&get_scan_settings(bam_filename, &[])).unwrap();
        assert_eq!(contigs.len(), 1);
        assert_eq!(contigs[0].get_contig_name(), "asm000001:tig00001");
        assert_eq!(
            stats,
            ContigScanStats {
                alignment_record_count: 4,
                filtered_record_count: 2,
                contig_count: 2,
                untargeted_contig_count: 0,
                contigs_without_split_alignment: 1,
            }
        );

        let target_contigs = vec!["asm000002:tig00001".to_string()];
        let (contigs, stats) =
            scan_contig_alignments(&get_scan_settings(bam_filename, &target_contigs)).unwrap();
        assert!(contigs.is_empty());
        assert_eq!(stats.untargeted_contig_count, 1);
    }

    #[test]
    fn test_duplicate_primary_record() {
        let file = write_test_sam(&[SPLIT_CONTIG, SPLIT_CONTIG]);
        let bam_filename = file.path().to_str().unwrap();
        assert!(scan_contig_alignments(&get_scan_settings(bam_filename, &[])).is_err());
    }
}
