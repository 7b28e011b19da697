mod call;
mod shared;
mod utils;
mod view;

use camino::Utf8Path;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use simple_error::SimpleResult;

use self::call::validate_and_fix_call_settings;
pub use self::call::{CallSettings, write_call_settings};
use self::shared::validate_and_fix_shared_settings;
pub use self::shared::SharedSettings;
use self::view::validate_and_fix_view_settings;
pub use self::view::ViewSettings;

#[derive(Subcommand)]
pub enum Commands {
    /// Find SV breakpoint junctions in the split alignments of locally assembled contigs
    Call(CallSettings),

    /// Print the junctions from a binary junction file in text form
    View(ViewSettings),
}

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    after_help = format!("Copyright (C) 2004-{}     Pacific Biosciences of California, Inc.
This program comes with ABSOLUTELY NO WARRANTY; it is intended for
Research Use Only and not for use in diagnostic procedures.", chrono::Utc::now().year()),
    help_template = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}"
)]
#[clap(propagate_version = true, rename_all = "kebab_case")]
pub struct Settings {
    #[command(flatten)]
    pub shared: SharedSettings,

    #[command(subcommand)]
    pub command: Commands,
}

impl Settings {
    /// Output directory for the command, if it writes one
    pub fn get_output_dir(&self) -> Option<&Utf8Path> {
        match &self.command {
            Commands::Call(x) => Some(&x.output_dir),
            Commands::View(_) => None,
        }
    }
}

/// Validate settings and update parameters that can't be processed by clap
///
/// Parts of this process assume logging is already setup
///
pub fn validate_and_fix_settings_impl(mut settings: Settings) -> SimpleResult<Settings> {
    settings.shared = validate_and_fix_shared_settings(settings.shared)?;

    settings.command = match settings.command {
        Commands::Call(x) => {
            let x = validate_and_fix_call_settings(x, settings.shared.clobber)?;
            Commands::Call(x)
        }
        Commands::View(x) => {
            let x = validate_and_fix_view_settings(x)?;
            Commands::View(x)
        }
    };

    Ok(settings)
}

/// Validate settings and update to parameters that can't be processed automatically by clap.
///
pub fn validate_and_fix_settings(settings: Settings) -> Settings {
    match validate_and_fix_settings_impl(settings) {
        Ok(x) => x,
        Err(msg) => {
            eprintln!("Invalid command-line setting: {}", msg);
            std::process::exit(exitcode::USAGE);
        }
    }
}

pub fn parse_settings() -> Settings {
    Settings::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_call_command() {
        let settings = Settings::try_parse_from([
            "svjunction",
            "call",
            "--bam",
            "contigs.bam",
            "--min-mapq",
            "30",
            "--threads",
            "4",
        ])
        .unwrap();
        assert_eq!(settings.shared.thread_count, 0);
        let settings_shared = validate_and_fix_shared_settings(settings.shared).unwrap();
        assert_eq!(settings_shared.thread_count, 4);

        match &settings.command {
            Commands::Call(x) => {
                assert_eq!(x.bam_filename, "contigs.bam");
                assert_eq!(x.min_mapq, 30);
                assert_eq!(x.min_align_length, 50);
                assert_eq!(x.output_dir.as_str(), "svjunction_call_output");
            }
            Commands::View(_) => panic!("Unexpected subcommand"),
        }
    }

    #[test]
    fn test_zero_threads() {
        let settings =
            Settings::try_parse_from(["svjunction", "view", "--junctions", "x.bin", "--threads", "0"])
                .unwrap();
        assert!(validate_and_fix_shared_settings(settings.shared).is_err());
    }
}
