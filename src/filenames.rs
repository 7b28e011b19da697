//! Names of files written to the output directory
//!

pub const CALL_SETTINGS_FILENAME: &str = "call.settings.json";
pub const RUN_STATS_FILENAME: &str = "run.stats.json";

/// Junctions in text form, one per line
pub const JUNCTION_TEXT_FILENAME: &str = "junctions.tsv";

/// Junctions in the versioned binary junction file format
pub const JUNCTION_BINARY_FILENAME: &str = "junctions.bin";
