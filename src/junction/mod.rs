//! Conversion of contig split alignments into SV breakpoint junctions
//!

mod alignment_filter;
mod builder;
mod chimeric_alignment;
mod classifier;
mod codec;

pub use self::alignment_filter::{
    DEFAULT_MIN_ALIGN_LENGTH, DEFAULT_MIN_MAPQ, JunctionFilterSettings,
};
pub use self::builder::{JunctionBuildStats, from_split_alignments};
pub use self::chimeric_alignment::ChimericAlignment;
pub use self::codec::{read_junction_file, write_junction_file};
