//! Run the view command: print a binary junction file in text form
//!

use camino::Utf8Path;
use log::info;
use simple_error::SimpleResult;

use crate::cli;
use crate::junction::read_junction_file;
use crate::junction_output::write_junction_text;

pub fn run_view(settings: &cli::ViewSettings) -> SimpleResult<()> {
    let junction_filename = Utf8Path::new(&settings.junction_filename);
    let junctions = read_junction_file(junction_filename)?;
    info!(
        "Read {} junctions from file: '{junction_filename}'",
        junctions.len()
    );

    let stdout = std::io::stdout();
    let mut w = std::io::BufWriter::new(stdout.lock());
    write_junction_text(&junctions, &mut w)
}
