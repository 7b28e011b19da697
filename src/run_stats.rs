//! Track stats for the whole svjunction run
//!

use std::fs::File;

use camino::Utf8Path;
use log::info;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, try_with};
use unwrap::unwrap;

use crate::contig_scanner::ContigScanStats;
use crate::filenames::RUN_STATS_FILENAME;
use crate::junction::JunctionBuildStats;

#[derive(Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct CallRunStats {
    pub scan_stats: ContigScanStats,

    /// Junction build stats summed over all contigs
    pub junction_stats: JunctionBuildStats,

    pub total_runtime_secs: f64,
}

/// Write run_stats structure out in json format
pub fn write_call_run_stats(output_dir: &Utf8Path, run_stats: &CallRunStats) {
    let filename = output_dir.join(RUN_STATS_FILENAME);

    info!("Writing run statistics to file: '{filename}'");

    let f = unwrap!(
        File::create(&filename),
        "Unable to create run statistics json file: '{filename}'"
    );

    unwrap!(
        serde_json::to_writer_pretty(&f, &run_stats),
        "Unable to write run statistics json file: '{filename}'"
    );
}

#[allow(unused)]
pub fn read_call_run_stats(output_dir: &Utf8Path) -> SimpleResult<CallRunStats> {
    use std::io::BufReader;

    let filename = output_dir.join(RUN_STATS_FILENAME);
    let file = try_with!(
        File::open(&filename),
        "Unable to read run statistics json file: '{filename}'"
    );

    let reader = BufReader::new(file);
    let run_stats = try_with!(
        serde_json::from_reader(reader),
        "Unable to parse run statistics from json file: '{filename}'"
    );

    Ok(run_stats)
}
