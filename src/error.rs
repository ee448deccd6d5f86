//! Structured error handling and exit codes.

use serde::Serialize;

use crate::duplicates::{FinderError, ScanReport};

/// Exit codes for the dupehash application.
///
/// - 0: Scan completed, duplicates found
/// - 1: General error (including invalid roots or exclusions)
/// - 2: Scan completed, no duplicates
/// - 3: Scan completed but some entries were skipped
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Scan completed and duplicates were found.
    Success = 0,
    /// An error stopped the run.
    GeneralError = 1,
    /// Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Scan completed but some entries could not be read.
    PartialSuccess = 3,
    /// Scan was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DH000",
            Self::GeneralError => "DH001",
            Self::NoDuplicates => "DH002",
            Self::PartialSuccess => "DH003",
            Self::Interrupted => "DH130",
        }
    }

    /// Exit code for a finished scan.
    ///
    /// Interruption wins over skipped entries, which win over the
    /// duplicates/no-duplicates distinction.
    #[must_use]
    pub fn for_report(report: &ScanReport) -> Self {
        if report.summary.interrupted {
            Self::Interrupted
        } else if report.summary.has_errors() {
            Self::PartialSuccess
        } else if report.is_empty() {
            Self::NoDuplicates
        } else {
            Self::Success
        }
    }

    /// Exit code for an error that stopped the run.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<FinderError>() {
            Some(FinderError::Interrupted) => Self::Interrupted,
            _ => Self::GeneralError,
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DH001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
