//! Binary junction record and junction file format
//!
//! All integers are big-endian. Each junction record is laid out as:
//!
//! 1. lower region: u32 byte length, followed by the region encoding
//! 2. higher region: same as above
//! 3. strand switch: i32 ordinal
//! 4. forward strand representation: one byte, 0 or 1
//! 5. contig sequence: u32 length, followed by the raw sequence bytes
//! 6. insertion mappings: u32 count, then for each entry a u32 length followed by UTF-8 text
//!
//! A junction file is a header of magic bytes, u32 format version and u64 record count, followed by
//! the records.
//!

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::sync::Arc;

use camino::Utf8Path;
use simple_error::{SimpleResult, bail, try_with};

use super::chimeric_alignment::ChimericAlignment;
use super::classifier::StrandSwitch;
use crate::alignment_region::AlignmentRegion;

pub const JUNCTION_FILE_MAGIC: &[u8; 4] = b"SVJN";
pub const JUNCTION_FILE_VERSION: u32 = 1;

fn write_bytes(w: &mut impl Write, buf: &[u8]) -> SimpleResult<()> {
    try_with!(w.write_all(buf), "Failed to write junction data");
    Ok(())
}

fn write_u32(w: &mut impl Write, val: u32) -> SimpleResult<()> {
    write_bytes(w, &val.to_be_bytes())
}

fn write_len_prefixed(w: &mut impl Write, buf: &[u8]) -> SimpleResult<()> {
    let len = try_with!(
        u32::try_from(buf.len()),
        "Junction field of {} bytes is too large to encode",
        buf.len()
    );
    write_u32(w, len)?;
    write_bytes(w, buf)
}

fn read_array<const N: usize>(r: &mut impl Read, label: &str) -> SimpleResult<[u8; N]> {
    let mut buf = [0u8; N];
    try_with!(r.read_exact(&mut buf), "Truncated junction data reading {label}");
    Ok(buf)
}

fn read_u32(r: &mut impl Read, label: &str) -> SimpleResult<u32> {
    Ok(u32::from_be_bytes(read_array(r, label)?))
}

fn read_len_prefixed(r: &mut impl Read, label: &str) -> SimpleResult<Vec<u8>> {
    let len = read_u32(r, label)? as u64;
    let mut buf = Vec::new();
    try_with!(
        r.by_ref().take(len).read_to_end(&mut buf),
        "Failed to read junction data for {label}"
    );
    if buf.len() as u64 != len {
        bail!(
            "Truncated junction data reading {label}: expected {len} bytes, found {}",
            buf.len()
        );
    }
    Ok(buf)
}

/// Write one junction record in binary form
///
pub fn encode_chimeric_alignment(ca: &ChimericAlignment, w: &mut impl Write) -> SimpleResult<()> {
    write_len_prefixed(w, &ca.region_with_lower_coord_on_contig.encode()?)?;
    write_len_prefixed(w, &ca.region_with_higher_coord_on_contig.encode()?)?;
    write_bytes(w, &(ca.strand_switch as i32).to_be_bytes())?;
    write_bytes(w, &[ca.is_forward_strand_representation as u8])?;
    write_len_prefixed(w, &ca.contig_seq)?;

    let insertion_count = try_with!(
        u32::try_from(ca.insertion_mappings.len()),
        "Too many insertion mappings to encode"
    );
    write_u32(w, insertion_count)?;
    for insertion_mapping in ca.insertion_mappings.iter() {
        write_len_prefixed(w, insertion_mapping.as_bytes())?;
    }
    Ok(())
}

/// Read one junction record in binary form
///
/// The junction is rebuilt through the standard constructor, so all construction checks are
/// repeated. The stored strand classification must match the classification recomputed from the
/// two regions.
///
#[allow(unused)]
pub fn decode_chimeric_alignment(r: &mut impl Read) -> SimpleResult<ChimericAlignment> {
    decode_chimeric_alignment_with_seq_cache(r, None)
}

/// Decode a junction, reusing `prev_seq` for the contig sequence if the bytes match
///
fn decode_chimeric_alignment_with_seq_cache(
    r: &mut impl Read,
    prev_seq: Option<&Arc<[u8]>>,
) -> SimpleResult<ChimericAlignment> {
    let lower = AlignmentRegion::decode(&read_len_prefixed(r, "lower alignment region")?)?;
    let higher = AlignmentRegion::decode(&read_len_prefixed(r, "higher alignment region")?)?;

    let ordinal = i32::from_be_bytes(read_array(r, "strand switch")?);
    let strand_switch = match StrandSwitch::from_repr(ordinal) {
        Some(x) => x,
        None => bail!("Invalid strand switch ordinal in junction record: {ordinal}"),
    };

    let [flag] = read_array::<1>(r, "forward strand representation")?;
    let is_forward_strand_representation = match flag {
        0 => false,
        1 => true,
        _ => bail!("Invalid boolean byte in junction record: {flag}"),
    };

    let seq = read_len_prefixed(r, "contig sequence")?;
    let contig_seq = match prev_seq {
        Some(x) if x.as_ref() == seq.as_slice() => x.clone(),
        _ => Arc::from(seq),
    };

    let insertion_count = read_u32(r, "insertion mapping count")?;
    let mut insertion_mappings = Vec::new();
    for _ in 0..insertion_count {
        let buf = read_len_prefixed(r, "insertion mapping")?;
        let insertion_mapping = try_with!(
            String::from_utf8(buf),
            "Invalid UTF-8 in junction insertion mapping"
        );
        insertion_mappings.push(insertion_mapping);
    }

    let ca = ChimericAlignment::new(lower, higher, contig_seq, insertion_mappings)?;
    if ca.strand_switch != strand_switch {
        bail!(
            "Junction record strand switch {strand_switch} is inconsistent with its alignment regions: {}",
            ca.strand_switch
        );
    }
    if ca.is_forward_strand_representation != is_forward_strand_representation {
        bail!(
            "Junction record forward strand representation flag is inconsistent with its alignment regions"
        );
    }
    Ok(ca)
}

/// Write the junction file header and all junction records
///
pub fn write_junctions(junctions: &[ChimericAlignment], w: &mut impl Write) -> SimpleResult<()> {
    write_bytes(w, JUNCTION_FILE_MAGIC)?;
    write_u32(w, JUNCTION_FILE_VERSION)?;
    write_bytes(w, &(junctions.len() as u64).to_be_bytes())?;
    for ca in junctions.iter() {
        encode_chimeric_alignment(ca, w)?;
    }
    Ok(())
}

/// Read a junction file header and all junction records
///
/// Consecutive junctions with identical contig sequences share one copy of the sequence.
///
pub fn read_junctions(r: &mut impl Read) -> SimpleResult<Vec<ChimericAlignment>> {
    let magic = read_array::<4>(r, "junction file magic")?;
    if &magic != JUNCTION_FILE_MAGIC {
        bail!("Input is not a junction file");
    }
    let version = read_u32(r, "junction file version")?;
    if version != JUNCTION_FILE_VERSION {
        bail!(
            "Unsupported junction file version {version}, expected version {JUNCTION_FILE_VERSION}"
        );
    }
    let record_count = u64::from_be_bytes(read_array(r, "junction record count")?);

    let mut junctions: Vec<ChimericAlignment> = Vec::new();
    for _ in 0..record_count {
        let prev_seq = junctions.last().map(|x| &x.contig_seq);
        let ca = decode_chimeric_alignment_with_seq_cache(r, prev_seq)?;
        junctions.push(ca);
    }

    let mut trailing = [0u8; 1];
    if try_with!(r.read(&mut trailing), "Failed to read junction data") != 0 {
        bail!("Unexpected data after the last junction record");
    }
    Ok(junctions)
}

pub fn write_junction_file(filename: &Utf8Path, junctions: &[ChimericAlignment]) -> SimpleResult<()> {
    let f = try_with!(
        File::create(filename),
        "Unable to create junction file: '{filename}'"
    );
    let mut w = BufWriter::new(f);
    write_junctions(junctions, &mut w)?;
    try_with!(w.flush(), "Unable to write junction file: '{filename}'");
    Ok(())
}

pub fn read_junction_file(filename: &Utf8Path) -> SimpleResult<Vec<ChimericAlignment>> {
    let f = try_with!(
        File::open(filename),
        "Unable to open junction file: '{filename}'"
    );
    let mut r = BufReader::new(f);
    match read_junctions(&mut r) {
        Ok(x) => Ok(x),
        Err(e) => bail!("Error reading junction file '{filename}': {e}"),
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;

    use super::*;
    use crate::alignment_region::test_utils::get_test_region;

    fn get_test_junction() -> ChimericAlignment {
        let lower = get_test_region(1, 100, "chr1", 5000, 5099, true, 60);
        let higher = get_test_region(111, 210, "chr1", 1000, 1099, false, 60);
        let contig_seq: Arc<[u8]> = Arc::from(b"ACGT\xff\x00\xc3NNacgt".as_slice());
        let insertion_mappings = vec![
            "101_110_chr5_1_10_-_10M_5_0".to_string(),
            "tig_\u{e9}\u{4e2d}".to_string(),
        ];
        ChimericAlignment::new(lower, higher, contig_seq, insertion_mappings).unwrap()
    }

    fn encode(ca: &ChimericAlignment) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_chimeric_alignment(ca, &mut buf).unwrap();
        buf
    }

    /// Offset of the strand switch ordinal in the record encoding
    fn get_strand_switch_offset(ca: &ChimericAlignment) -> usize {
        let lower_len = ca.region_with_lower_coord_on_contig.encode().unwrap().len();
        let higher_len = ca.region_with_higher_coord_on_contig.encode().unwrap().len();
        8 + lower_len + higher_len
    }

    #[test]
    fn test_record_round_trip() {
        let ca = get_test_junction();
        let buf = encode(&ca);
        let decoded = decode_chimeric_alignment(&mut buf.as_slice()).unwrap();

        assert_eq!(decoded, ca);
        assert_eq!(decoded.strand_switch, StrandSwitch::ForwardToReverse);
        assert_eq!(decoded.insertion_mappings[1], "tig_\u{e9}\u{4e2d}");
        assert_eq!(decoded.contig_seq[4], 0xff);
    }

    #[test]
    fn test_strand_switch_layout() {
        let ca = get_test_junction();
        let buf = encode(&ca);
        let offset = get_strand_switch_offset(&ca);
        assert_eq!(&buf[offset..offset + 4], &[0, 0, 0, 1]);

        // forward strand representation flag
        assert_eq!(buf[offset + 4], 0);
    }

    #[test]
    fn test_corrupt_strand_switch_ordinal() {
        let ca = get_test_junction();
        let mut buf = encode(&ca);
        let offset = get_strand_switch_offset(&ca);
        buf[offset + 3] = 7;
        assert!(decode_chimeric_alignment(&mut buf.as_slice()).is_err());

        // A valid ordinal inconsistent with the regions
        buf[offset + 3] = 2;
        assert!(decode_chimeric_alignment(&mut buf.as_slice()).is_err());
    }

    #[test]
    fn test_corrupt_boolean_byte() {
        let ca = get_test_junction();
        let mut buf = encode(&ca);
        let offset = get_strand_switch_offset(&ca) + 4;
        buf[offset] = 2;
        assert!(decode_chimeric_alignment(&mut buf.as_slice()).is_err());
    }

    #[test]
    fn test_truncated_record() {
        let ca = get_test_junction();
        let buf = encode(&ca);
        for len in [0, 3, buf.len() / 2, buf.len() - 1] {
            assert!(decode_chimeric_alignment(&mut &buf[..len]).is_err());
        }
    }

    #[test]
    fn test_invalid_insertion_utf8() {
        let ca = get_test_junction();
        let mut buf = encode(&ca);
        let last = buf.len() - 1;
        buf[last] = 0xff;
        assert!(decode_chimeric_alignment(&mut buf.as_slice()).is_err());
    }

    #[test]
    fn test_bad_file_header() {
        let junctions = vec![get_test_junction()];
        let mut buf = Vec::new();
        write_junctions(&junctions, &mut buf).unwrap();
        assert_eq!(&buf[..4], JUNCTION_FILE_MAGIC);

        let mut bad_magic = buf.clone();
        bad_magic[0] = b'X';
        assert!(read_junctions(&mut bad_magic.as_slice()).is_err());

        let mut bad_version = buf.clone();
        bad_version[7] = 2;
        assert!(read_junctions(&mut bad_version.as_slice()).is_err());

        let mut trailing_data = buf.clone();
        trailing_data.push(0);
        assert!(read_junctions(&mut trailing_data.as_slice()).is_err());
    }

    #[test]
    fn test_junction_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let filename = Utf8PathBuf::from_path_buf(dir.path().join("junctions.bin")).unwrap();

        let ca1 = get_test_junction();
        let mut ca2 = ca1.clone();
        ca2.insertion_mappings.clear();
        let junctions = vec![ca1, ca2];

        write_junction_file(&filename, &junctions).unwrap();
        let decoded = read_junction_file(&filename).unwrap();

        assert_eq!(decoded, junctions);
        assert!(Arc::ptr_eq(&decoded[0].contig_seq, &decoded[1].contig_seq));

        let empty_filename = Utf8PathBuf::from_path_buf(dir.path().join("empty.bin")).unwrap();
        write_junction_file(&empty_filename, &[]).unwrap();
        assert!(read_junction_file(&empty_filename).unwrap().is_empty());
    }
}
