//! Run the call command: find breakpoint junctions in all contig split alignments
//!

use std::sync::mpsc::channel;

use log::info;
use simple_error::{SimpleResult, bail, try_with};

use crate::cli;
use crate::contig_scanner::{ContigAlignments, ContigScanSettings, scan_contig_alignments};
use crate::filenames::{JUNCTION_BINARY_FILENAME, JUNCTION_TEXT_FILENAME};
use crate::junction::{
    ChimericAlignment, JunctionBuildStats, JunctionFilterSettings, from_split_alignments,
    write_junction_file,
};
use crate::junction_output::write_junction_text_file;
use crate::run_stats::{CallRunStats, write_call_run_stats};

/// Build junctions for every contig on the worker thread pool
///
/// Junctions are returned in contig input order, independent of thread scheduling.
///
fn build_all_contig_junctions(
    thread_count: usize,
    filter_settings: &JunctionFilterSettings,
    contigs: Vec<ContigAlignments>,
    debug: bool,
) -> SimpleResult<(Vec<ChimericAlignment>, JunctionBuildStats)> {
    let worker_pool = try_with!(
        rayon::ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .build(),
        "Unable to create worker thread pool"
    );

    let (tx, rx) = channel();

    worker_pool.scope(move |scope| {
        for (contig_index, contig) in contigs.into_iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let contig_name = contig.get_contig_name();
                let mut stats = JunctionBuildStats::default();
                let result = from_split_alignments(
                    filter_settings,
                    contig.regions,
                    contig.contig_seq,
                    &mut stats,
                    debug,
                );
                tx.send((contig_index, contig_name, result, stats)).unwrap();
            });
        }
    });

    let mut contig_results = rx.into_iter().collect::<Vec<_>>();
    contig_results.sort_by_key(|x| x.0);

    let mut junctions = Vec::new();
    let mut junction_stats = JunctionBuildStats::default();
    for (_, contig_name, result, stats) in contig_results {
        match result {
            Ok(x) => junctions.extend(x),
            Err(e) => bail!("Failed to build junctions for contig {contig_name}: {e}"),
        }
        junction_stats.merge(&stats);
    }

    Ok((junctions, junction_stats))
}

pub fn run_call(
    shared_settings: &cli::SharedSettings,
    settings: &cli::CallSettings,
) -> SimpleResult<()> {
    let start = std::time::Instant::now();
    cli::write_call_settings(&settings.output_dir, settings);

    // Targeted runs print per-contig debug output
    let debug = !settings.target_contigs.is_empty();

    let scan_settings = ContigScanSettings {
        bam_filename: &settings.bam_filename,
        ref_filename: settings.ref_filename.as_deref(),
        target_contigs: &settings.target_contigs,
        thread_count: shared_settings.thread_count,
        debug,
    };
    let (contigs, scan_stats) = scan_contig_alignments(&scan_settings)?;

    info!("Building junctions from {} contigs", contigs.len());
    let filter_settings = settings.get_junction_filter_settings();
    let (junctions, junction_stats) = build_all_contig_junctions(
        shared_settings.thread_count,
        &filter_settings,
        contigs,
        debug,
    )?;
    info!(
        "Found {} junctions, filtered {} simple translocations",
        junction_stats.junction_count, junction_stats.simple_translocation_count
    );

    write_junction_text_file(&settings.output_dir.join(JUNCTION_TEXT_FILENAME), &junctions)?;

    let junction_filename = settings.output_dir.join(JUNCTION_BINARY_FILENAME);
    info!("Writing binary junction file: '{junction_filename}'");
    write_junction_file(&junction_filename, &junctions)?;

    let run_stats = CallRunStats {
        scan_stats,
        junction_stats,
        total_runtime_secs: start.elapsed().as_secs_f64(),
    };
    write_call_run_stats(&settings.output_dir, &run_stats);

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::alignment_region::test_utils::get_test_region;

    fn get_test_contig(contig_id: &str, chrom: &str) -> ContigAlignments {
        let mut regions = vec![
            get_test_region(1, 100, chrom, 1000, 1099, true, 60),
            get_test_region(101, 200, chrom, 5000, 5099, true, 60),
        ];
        for r in regions.iter_mut() {
            r.contig_id = contig_id.to_string();
        }
        ContigAlignments {
            assembly_id: "asm000001".to_string(),
            contig_id: contig_id.to_string(),
            regions,
            contig_seq: Arc::from(vec![b'A'; 200]),
        }
    }

    #[test]
    fn test_build_all_contig_junctions() {
        let filter_settings = JunctionFilterSettings::default();
        let get_contigs = || {
            (0..20)
                .map(|i| {
                    let chrom = if i % 5 == 0 { "chr2" } else { "chr1" };
                    get_test_contig(&format!("tig{i:05}"), chrom)
                })
                .collect::<Vec<_>>()
        };

        let (junctions, stats) =
            build_all_contig_junctions(4, &filter_settings, get_contigs(), false).unwrap();
        assert_eq!(junctions.len(), 20);
        assert_eq!(stats.alignment_region_count, 40);
        assert_eq!(stats.junction_count, 20);

        // Output order follows contig input order
        for (i, ca) in junctions.iter().enumerate() {
            assert_eq!(ca.region_with_lower_coord_on_contig.contig_id, format!("tig{i:05}"));
        }

        let (single_thread_junctions, _) =
            build_all_contig_junctions(1, &filter_settings, get_contigs(), false).unwrap();
        assert_eq!(junctions, single_thread_junctions);
    }

    #[test]
    fn test_contig_error_is_reported() {
        let filter_settings = JunctionFilterSettings::default();
        let mut contig = get_test_contig("tig00001", "chr1");
        contig.regions[1].assembly_id = "asm000002".to_string();
        let result = build_all_contig_junctions(2, &filter_settings, vec![contig], false);
        assert!(result.is_err());
    }
}
