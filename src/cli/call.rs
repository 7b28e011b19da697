use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use const_format::concatcp;
use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, bail};
use unwrap::unwrap;

use super::utils::{canonicalize_string_path, check_optional_filename, check_required_filename};
use crate::filenames::CALL_SETTINGS_FILENAME;
use crate::junction::{DEFAULT_MIN_ALIGN_LENGTH, DEFAULT_MIN_MAPQ, JunctionFilterSettings};

#[derive(Args, Default, Deserialize, Serialize)]
pub struct CallSettings {
    /// Directory for all call command output (must not already exist)
    #[arg(long, value_name = "DIR", default_value = concatcp!(env!("CARGO_PKG_NAME"), "_call_output"))]
    pub output_dir: Utf8PathBuf,

    /// Alignment file for assembled contigs in BAM, SAM or CRAM format.
    ///
    /// Contig names must follow the format '<assembly_id>:<contig_id>'. Each contig's primary
    /// alignment record should describe all other alignment regions of the contig in its SA tag.
    ///
    #[arg(long = "bam", value_name = "FILE")]
    pub bam_filename: String,

    /// Genome reference in FASTA format, required for CRAM input
    #[arg(long = "ref", value_name = "FILE")]
    pub ref_filename: Option<String>,

    /// Alignment regions with mapping quality below this value are not used as junction flanks
    ///
    /// Such regions are instead reported as potential inserted sequence when found between two
    /// junction flanks.
    ///
    #[arg(long, default_value_t = DEFAULT_MIN_MAPQ)]
    pub min_mapq: u8,

    /// Minimum reference length of an alignment region used as a junction flank, after removing
    /// any contig sequence shared with the neighboring region.
    ///
    #[arg(long, default_value_t = DEFAULT_MIN_ALIGN_LENGTH)]
    pub min_align_length: i64,

    /// Restrict junction calling to the named contigs, and print extra debug output for each
    ///
    /// This option is intended for debugging only. Contig names are given in the
    /// '<assembly_id>:<contig_id>' format.
    ///
    #[arg(hide = true, long = "target-contig", value_name = "NAME")]
    pub target_contigs: Vec<String>,

    /// Don't canonicalize input file paths
    ///
    /// By default, all input file paths are canonicalized before they are stored in the call
    /// settings file in the output directory.
    ///
    #[arg(long)]
    pub disable_path_canonicalization: bool,
}

impl CallSettings {
    pub fn get_junction_filter_settings(&self) -> JunctionFilterSettings {
        JunctionFilterSettings {
            min_mapq: self.min_mapq,
            min_align_length: self.min_align_length,
        }
    }
}

/// Validate settings and update to parameters that can't be processed automatically by clap.
///
/// Assumes that the logger is not setup
///
pub fn validate_and_fix_call_settings(
    mut settings: CallSettings,
    clobber: bool,
) -> SimpleResult<CallSettings> {
    check_required_filename(&settings.bam_filename, "alignment")?;
    check_optional_filename(settings.ref_filename.as_ref(), "reference")?;

    if settings.output_dir.exists() {
        if !clobber {
            bail!(
                "Output directory already exists: '{}', use --clobber to overwrite",
                settings.output_dir
            );
        }
        if !settings.output_dir.is_dir() {
            bail!(
                "Output directory path is not a directory: '{}'",
                settings.output_dir
            );
        }
    }

    if settings.min_align_length < 0 {
        bail!("--min-align-length argument must not be negative");
    }

    if let Some(x) = settings.target_contigs.iter().duplicates().next() {
        bail!("Duplicate --target-contig argument: '{x}'");
    }

    if !settings.disable_path_canonicalization {
        settings.bam_filename = canonicalize_string_path(&settings.bam_filename)?;
        settings.ref_filename = match settings.ref_filename {
            Some(x) => Some(canonicalize_string_path(&x)?),
            None => None,
        };
    }

    Ok(settings)
}

/// Write call settings out in json format
pub fn write_call_settings(output_dir: &Utf8Path, settings: &CallSettings) {
    let filename = output_dir.join(CALL_SETTINGS_FILENAME);

    info!("Writing call settings to file: '{filename}'");

    let f = unwrap!(
        std::fs::File::create(&filename),
        "Unable to create call settings json file: '{filename}'"
    );

    unwrap!(
        serde_json::to_writer_pretty(&f, &settings),
        "Unable to write call settings json file: '{filename}'"
    );
}
