//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use scimon_core::DEFAULT_MAX_RETRIES;
use scimon_core::resolver::{DEFAULT_FALLBACK_TEMPLATE, DEFAULT_PRIMARY_BASE};

/// Monitor DOIs on Sci-Hub and fetch papers once they appear.
///
/// With no flags, every DOI in the monitored list is checked; DOIs that became
/// available are announced and removed from the list.
#[derive(Parser, Debug)]
#[command(name = "scimon")]
#[command(author, version, about)]
pub struct Args {
    /// Check a DOI without touching the monitored list
    #[arg(long, value_name = "DOI", conflicts_with = "add")]
    pub check: Option<String>,

    /// Check a DOI and monitor it if not yet available
    #[arg(long, value_name = "DOI")]
    pub add: Option<String>,

    /// Download the paper when it is available
    #[arg(short, long)]
    pub download: bool,

    /// Directory to download papers to (default: current directory)
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output below errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Maximum retry attempts for transient failures (0-10)
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_RETRIES as u8, value_parser = clap::value_parser!(u8).range(0..=10))]
    pub max_retries: u8,

    /// State directory holding doi_urls.txt and config.json (default: $SCIMON_HOME or ~/.scimon)
    #[arg(long, value_name = "PATH")]
    pub state_dir: Option<PathBuf>,

    /// Disable colored status markers
    #[arg(long)]
    pub no_color: bool,

    /// Primary mirror base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_PRIMARY_BASE)]
    pub mirror_url: String,

    /// Fallback PDF URL template; `{doi}` is replaced by the bare DOI
    #[arg(long, value_name = "TEMPLATE", default_value = DEFAULT_FALLBACK_TEMPLATE)]
    pub fallback_url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["scimon"]).unwrap();
        assert!(args.check.is_none());
        assert!(args.add.is_none());
        assert!(!args.download);
        assert!(args.dir.is_none());
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert_eq!(args.max_retries, 3); // DEFAULT_MAX_RETRIES
        assert!(!args.no_color);
        assert_eq!(args.mirror_url, "https://sci-hub.se/");
        assert_eq!(args.fallback_url, "https://sci.bban.top/pdf/{doi}.pdf");
    }

    #[test]
    fn test_cli_check_takes_doi() {
        let args = Args::try_parse_from(["scimon", "--check", "10.1000/xyz123"]).unwrap();
        assert_eq!(args.check.as_deref(), Some("10.1000/xyz123"));
    }

    #[test]
    fn test_cli_add_with_download_and_dir() {
        let args = Args::try_parse_from([
            "scimon",
            "--add",
            "https://doi.org/10.1000/xyz123",
            "--download",
            "--dir",
            "papers",
        ])
        .unwrap();
        assert_eq!(args.add.as_deref(), Some("https://doi.org/10.1000/xyz123"));
        assert!(args.download);
        assert_eq!(args.dir, Some(PathBuf::from("papers")));
    }

    #[test]
    fn test_cli_check_and_add_conflict() {
        let result = Args::try_parse_from(["scimon", "--check", "10.1/a", "--add", "10.1/b"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_check_requires_value() {
        assert!(Args::try_parse_from(["scimon", "--check"]).is_err());
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["scimon", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["scimon", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["scimon", "--quiet"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["scimon", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["scimon", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["scimon", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    // ==================== Max Retries Tests ====================

    #[test]
    fn test_cli_max_retries_bounds() {
        let args = Args::try_parse_from(["scimon", "-r", "0"]).unwrap();
        assert_eq!(args.max_retries, 0);

        let args = Args::try_parse_from(["scimon", "--max-retries", "10"]).unwrap();
        assert_eq!(args.max_retries, 10);
    }

    #[test]
    fn test_cli_max_retries_over_max_rejected() {
        let err = Args::try_parse_from(["scimon", "-r", "11"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_state_dir_and_mirror_overrides() {
        let args = Args::try_parse_from([
            "scimon",
            "--state-dir",
            "/tmp/scimon",
            "--mirror-url",
            "http://127.0.0.1:9000/",
            "--fallback-url",
            "http://127.0.0.1:9001/pdf/{doi}.pdf",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(args.state_dir, Some(PathBuf::from("/tmp/scimon")));
        assert_eq!(args.mirror_url, "http://127.0.0.1:9000/");
        assert_eq!(args.fallback_url, "http://127.0.0.1:9001/pdf/{doi}.pdf");
        assert!(args.no_color);
    }
}
