use clap::Args;
use simple_error::SimpleResult;

use super::utils::check_required_filename;

#[derive(Args)]
pub struct ViewSettings {
    /// Binary junction file written by the call command
    #[arg(long = "junctions", value_name = "FILE")]
    pub junction_filename: String,
}

/// Validate settings and update to parameters that can't be processed automatically by clap.
///
pub fn validate_and_fix_view_settings(settings: ViewSettings) -> SimpleResult<ViewSettings> {
    check_required_filename(&settings.junction_filename, "junction")?;
    Ok(settings)
}
