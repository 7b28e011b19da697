use camino::Utf8PathBuf;
use simple_error::{SimpleResult, bail, try_with};

/// Check a required input filename
///
/// Assumes no logger has been configured yet
///
pub fn check_required_filename(filename: &str, label: &str) -> SimpleResult<()> {
    if filename.is_empty() {
        bail!("Must specify {label} file");
    }
    check_filename(filename, label)
}

/// Check an optional input filename
///
/// Assumes no logger has been configured yet
///
pub fn check_optional_filename(filename_opt: Option<&String>, label: &str) -> SimpleResult<()> {
    if let Some(filename) = filename_opt {
        check_filename(filename, label)?;
    }
    Ok(())
}

fn check_filename(filename: &str, label: &str) -> SimpleResult<()> {
    let path = std::path::Path::new(&filename);
    if !path.exists() {
        bail!("Can't find specified {label} file: '{filename}'");
    }
    if !path.is_file() {
        bail!("Specified {label} file path does not appear to be a file: '{filename}'");
    }
    Ok(())
}

pub fn canonicalize_string_path(s: &str) -> SimpleResult<String> {
    let path = try_with!(
        Utf8PathBuf::from(s).canonicalize_utf8(),
        "Unable to canonicalize file path: '{s}'"
    );
    Ok(path.to_string())
}
