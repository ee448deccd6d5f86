//! Command-line interface definitions for dupehash.
//!
//! Global options (verbosity, color, config file) apply to every
//! subcommand. Scan options left unset fall back to the layered
//! configuration (see [`crate::config`]).
//!
//! # Example
//!
//! ```bash
//! # Scan two trees, skipping a cache directory
//! dupehash scan ~/Pictures /mnt/backup -x ~/Pictures/.thumbnails
//!
//! # JSON output with SHA-256 and eight hashing threads
//! dupehash scan ~/Downloads --algorithm sha256 --io-threads 8 --output json
//!
//! # Show the effective configuration
//! dupehash config
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scanner::DigestAlgorithm;

/// Concurrent duplicate file finder.
///
/// dupehash walks one or more directory trees, hashes every regular file on
/// a bounded pool of worker threads, and reports groups of files with
/// identical content.
#[derive(Debug, Parser)]
#[command(name = "dupehash")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (TOML) to use instead of the platform default
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan directories for duplicate files
    Scan(ScanArgs),
    /// Print the effective configuration as TOML
    Config,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Root directories to scan
    #[arg(value_name = "ROOT", required = true, num_args = 1..)]
    pub roots: Vec<PathBuf>,

    /// Directory to leave out, with everything beneath it (repeatable)
    ///
    /// Matching is by exact path after both sides are canonicalized.
    #[arg(short = 'x', long = "exclude", value_name = "DIR")]
    pub exclude: Vec<PathBuf>,

    /// Number of hashing threads (default: 4)
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Paths that may wait for a free hashing thread (default: 1024)
    #[arg(long, value_name = "N")]
    pub queue_capacity: Option<usize>,

    /// Content digest algorithm (default: blake3)
    #[arg(long, value_enum)]
    pub algorithm: Option<DigestAlgorithm>,

    /// Read buffer size per file (e.g., 64KiB, 1MiB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub buffer_size: Option<u64>,

    /// Output format (default: text)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Do not draw the progress line
    #[arg(long)]
    pub no_progress: bool,
}

/// Report output format.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Parse a human-readable size such as `64KiB` or `1.5MB` into bytes.
///
/// Decimal suffixes (KB, MB, ...) are powers of 1000; binary suffixes
/// (KiB, MiB, ...) are powers of 1024. Suffixes are case-insensitive.
///
/// # Errors
///
/// Returns a message suitable for clap if the number or suffix is invalid.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
