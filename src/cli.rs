use clap::Parser;
use std::path::PathBuf;

use crate::adapters::outbound::network::DEFAULT_BASE_URL;

/// Check a list of item barcodes against the library catalog
#[derive(Parser, Debug)]
#[command(name = "shelfcheck")]
#[command(version)]
#[command(about = "Check item barcodes against library catalog holdings", long_about = None)]
pub struct Args {
    /// Input file containing the list of barcodes (CSV or one per line)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file where results are written as CSV
    #[arg(short, long)]
    pub output: PathBuf,

    /// Catalog access user name (default: stored credentials, or ask)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Catalog access password (default: stored credentials, or ask)
    #[arg(short, long)]
    pub password: Option<String>,

    /// Do not read or store credentials in the system keyring
    #[arg(short = 'K', long)]
    pub no_keyring: bool,

    /// Do not color-code terminal output
    #[arg(short = 'C', long)]
    pub no_color: bool,

    /// Only print important diagnostic messages while working
    #[arg(short, long)]
    pub quiet: bool,

    /// Base URL of the catalog service
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub server: String,

    /// Lookup attempts per barcode before giving up
    #[arg(long, default_value_t = 3, value_name = "N")]
    pub max_retries: u32,

    /// Base delay between retries in milliseconds, doubling per attempt
    #[arg(long, default_value_t = 500, value_name = "MS")]
    pub retry_wait_ms: u64,

    /// Write a detailed trace to the given destination ('-' for stderr)
    #[arg(long = "debug", value_name = "OUT")]
    pub debug: Option<String>,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv.iter().copied()).unwrap()
    }

    #[test]
    fn test_minimal_invocation_uses_defaults() {
        let args = parse(&["shelfcheck", "-i", "scan.csv", "-o", "report.csv"]);
        assert_eq!(args.input, PathBuf::from("scan.csv"));
        assert_eq!(args.output, PathBuf::from("report.csv"));
        assert_eq!(args.server, DEFAULT_BASE_URL);
        assert_eq!(args.max_retries, 3);
        assert_eq!(args.retry_wait_ms, 500);
        assert!(args.user.is_none());
        assert!(args.password.is_none());
        assert!(!args.no_keyring);
        assert!(!args.no_color);
        assert!(!args.quiet);
        assert!(args.debug.is_none());
    }

    #[test]
    fn test_input_and_output_are_required() {
        assert!(Args::try_parse_from(["shelfcheck"]).is_err());
        assert!(Args::try_parse_from(["shelfcheck", "-i", "scan.csv"]).is_err());
    }

    #[test]
    fn test_credential_and_mode_flags() {
        let args = parse(&[
            "shelfcheck",
            "-i", "scan.csv",
            "-o", "report.csv",
            "-u", "librarian",
            "-p", "hunter2",
            "-K",
            "-C",
            "-q",
        ]);
        assert_eq!(args.user.as_deref(), Some("librarian"));
        assert_eq!(args.password.as_deref(), Some("hunter2"));
        assert!(args.no_keyring);
        assert!(args.no_color);
        assert!(args.quiet);
    }

    #[test]
    fn test_retry_and_server_overrides() {
        let args = parse(&[
            "shelfcheck",
            "-i", "scan.csv",
            "-o", "report.csv",
            "--server", "http://localhost:8080",
            "--max-retries", "5",
            "--retry-wait-ms", "50",
            "--debug", "-",
        ]);
        assert_eq!(args.server, "http://localhost:8080");
        assert_eq!(args.max_retries, 5);
        assert_eq!(args.retry_wait_ms, 50);
        assert_eq!(args.debug.as_deref(), Some("-"));
    }
}
