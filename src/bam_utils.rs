//! Utilities related to bam-format processing, including cigar-based alignment utilities that may not
//! otherwise be related to a bam record
//!

use rust_htslib::bam::{self, record::Cigar};
use simple_error::{SimpleResult, bail};

/// Is the cigar element any of the alignment match types?
///
pub fn is_alignment_match(c: &Cigar) -> bool {
    matches!(c, Cigar::Match(_) | Cigar::Equal(_) | Cigar::Diff(_))
}

/// Read bases consumed by the cigar element, with hard-clipped bases included
///
pub fn get_cigarseg_complete_read_offset(c: &Cigar) -> usize {
    use Cigar::*;
    match c {
        Ins(len) | SoftClip(len) | HardClip(len) | Diff(len) | Equal(len) | Match(len) => {
            *len as usize
        }
        _ => 0,
    }
}

pub fn get_cigarseg_ref_offset(c: &Cigar) -> i64 {
    use Cigar::*;
    match c {
        Del(len) | RefSkip(len) | Diff(len) | Equal(len) | Match(len) => *len as i64,
        _ => 0,
    }
}

/// Report the reference offset of the cigar alignment
///
pub fn get_cigar_ref_offset(cigar: &[Cigar]) -> i64 {
    cigar.iter().map(get_cigarseg_ref_offset).sum()
}

/// Total length of all alignment match segments (M, = and X)
///
pub fn get_cigar_match_len(cigar: &[Cigar]) -> usize {
    cigar
        .iter()
        .filter(|c| is_alignment_match(c))
        .map(get_cigarseg_complete_read_offset)
        .sum()
}

pub fn has_aligned_segments(cigar: &[Cigar]) -> bool {
    cigar.iter().any(is_alignment_match)
}

/// Report the following positions in read coordinates, where hard-clipped bases are counted as
/// part of the read:
/// 1. The first position after all left-side clipping
/// 2. The first position of all right-side clipping
/// 3. The complete read length
///
pub fn get_complete_read_clip_positions(cigar: &[Cigar]) -> (usize, usize, usize) {
    let mut read_pos = 0;
    let mut left_clip_size = 0;
    let mut right_clip_size = 0;
    let mut left_clip = true;
    for c in cigar.iter() {
        match c {
            Cigar::SoftClip(len) | Cigar::HardClip(len) => {
                if left_clip {
                    left_clip_size += *len as usize;
                } else {
                    right_clip_size += *len as usize;
                }
            }
            _ => {
                left_clip = false;
            }
        };
        read_pos += get_cigarseg_complete_read_offset(c);
    }
    (left_clip_size, read_pos - right_clip_size, read_pos)
}

pub fn get_qname(record: &bam::Record) -> String {
    String::from_utf8_lossy(record.qname()).to_string()
}

/// Retrieve a string aux tag from bam record, if the tag exists
///
/// Returns an error if the tag is present but has a non-string value
///
pub fn get_optional_string_aux_tag(
    record: &bam::Record,
    aux_tag: &[u8],
) -> SimpleResult<Option<String>> {
    match record.aux(aux_tag) {
        Ok(bam::record::Aux::String(val)) => Ok(Some(val.to_string())),
        Ok(aux_val) => bail!(
            "Unexpected {} tag format in read {}: {:?}",
            String::from_utf8_lossy(aux_tag),
            get_qname(record),
            aux_val
        ),
        Err(_) => Ok(None),
    }
}

/// Retrieve an int aux tag from bam record, if the tag exists
///
/// Returns an error if the tag is present but has a non-int value
///
pub fn get_optional_int_aux_tag(record: &bam::Record, aux_tag: &[u8]) -> SimpleResult<Option<i32>> {
    use bam::record::Aux;
    match record.aux(aux_tag) {
        Ok(aux_val) => Ok(Some(match aux_val {
            Aux::U8(val) => val as i32,
            Aux::U16(val) => val as i32,
            Aux::U32(val) => val as i32,
            Aux::I8(val) => val as i32,
            Aux::I16(val) => val as i32,
            Aux::I32(val) => val,
            _ => bail!(
                "Unexpected {} tag format in read {}: {:?}",
                String::from_utf8_lossy(aux_tag),
                get_qname(record),
                aux_val
            ),
        })),
        Err(_) => Ok(None),
    }
}
