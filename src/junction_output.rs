//! Text output of junctions
//!

use std::fs::File;
use std::io::{BufWriter, Write};

use camino::Utf8Path;
use log::info;
use simple_error::{SimpleResult, try_with};

use crate::junction::ChimericAlignment;

/// Write each junction as one tab-separated line
///
pub fn write_junction_text(
    junctions: &[ChimericAlignment],
    w: &mut impl Write,
) -> SimpleResult<()> {
    for ca in junctions.iter() {
        try_with!(writeln!(w, "{ca}"), "Failed to write junction text");
    }
    try_with!(w.flush(), "Failed to write junction text");
    Ok(())
}

pub fn write_junction_text_file(
    filename: &Utf8Path,
    junctions: &[ChimericAlignment],
) -> SimpleResult<()> {
    info!("Writing {} junctions to file: '{filename}'", junctions.len());

    let f = try_with!(
        File::create(filename),
        "Unable to create junction text file: '{filename}'"
    );
    let mut w = BufWriter::new(f);
    write_junction_text(junctions, &mut w)
}
