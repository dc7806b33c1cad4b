use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes let wrapper scripts distinguish between the different ways
/// a run can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - report written
    Success = 0,
    /// The catalog rejected the supplied credentials
    AuthenticationFailure = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Unreadable or barcode-free input file
    InputError = 3,
    /// The report could not be written
    OutputError = 4,
    /// Every requested barcode ended not-found or failed
    NoRecordsResolved = 5,
    /// Any other application error
    ApplicationError = 6,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::AuthenticationFailure => write!(f, "Authentication Failure (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::InputError => write!(f, "Input Error (3)"),
            ExitCode::OutputError => write!(f, "Output Error (4)"),
            ExitCode::NoRecordsResolved => write!(f, "No Records Resolved (5)"),
            ExitCode::ApplicationError => write!(f, "Application Error (6)"),
        }
    }
}

/// Application-level fatal errors.
///
/// Uses thiserror to derive Display and Error traits automatically. Each
/// variant maps to a distinct exit code; recoverable per-barcode problems
/// never appear here - they surface as diagnostics instead.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Cannot use the input file: {path}\nDetails: {details}\n\n💡 Hint: Supply a CSV or plain text file with one barcode per line")]
    InputFormat { path: PathBuf, details: String },

    #[error("Failed to write the report: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    OutputWrite { path: PathBuf, details: String },

    #[error("Authentication with the catalog failed: {details}\n\n💡 Hint: Check your user name and password, or retry without stored credentials")]
    Authentication { details: String },

    #[error("None of the {attempted} requested barcode(s) could be resolved\n\n💡 Hint: Check the diagnostics above for not-found barcodes and network failures")]
    NoRecordsResolved { attempted: usize },
}

impl CheckError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CheckError::InputFormat { .. } => ExitCode::InputError,
            CheckError::OutputWrite { .. } => ExitCode::OutputError,
            CheckError::Authentication { .. } => ExitCode::AuthenticationFailure,
            CheckError::NoRecordsResolved { .. } => ExitCode::NoRecordsResolved,
        }
    }
}
