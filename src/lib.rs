//! dupehash - concurrent duplicate file finder
//!
//! Walks one or more directory trees on a single coordinating thread,
//! hashes every regular file on a bounded pool of worker threads, and
//! reports groups of files whose content digests collide.
//!
//! # Example
//!
//! ```no_run
//! use dupehash::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_io_threads(8));
//! let report = finder
//!     .find_duplicates_in_paths(
//!         &[PathBuf::from("/data"), PathBuf::from("/backup")],
//!         &[PathBuf::from("/data/tmp")],
//!     )
//!     .unwrap();
//!
//! for group in &report.groups {
//!     println!("{} x{} ({} bytes each)", group.hash_hex(), group.len(), group.size);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use cli::{Cli, Commands, OutputFormat, ScanArgs};
use config::Config;
use duplicates::DuplicateFinder;
use error::ExitCode;
use output::{JsonOutput, TextOutput};
use progress::{Progress, ProgressCallback};

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error for invalid configuration, invalid roots or
/// exclusions, a refused thread pool, or a failure writing the report.
/// Per-file problems are not errors; they show up in the exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    if cli.no_color {
        yansi::disable();
    }

    let mut config = Config::load(cli.config.as_deref())?;

    let progress = match &cli.command {
        Commands::Scan(args) => {
            config.apply_scan_args(args)?;
            let draw = config.progress && !cli.quiet && io::stderr().is_terminal();
            draw.then(|| Arc::new(Progress::new(false)))
        }
        Commands::Config => None,
    };

    logging::init_logging(cli.verbose, cli.quiet, progress.as_ref().map(|p| p.multi()));
    log::debug!("Log level: {}", logging::current_level_name());

    match cli.command {
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(ExitCode::Success)
        }
        Commands::Scan(ref args) => run_scan(args, &config, progress, cli.no_color),
    }
}

fn run_scan(
    args: &ScanArgs,
    config: &Config,
    progress: Option<Arc<Progress>>,
    no_color: bool,
) -> Result<ExitCode> {
    let handler = signal::install_handler()?;

    let mut finder_config = config.finder_config().with_shutdown_flag(handler.get_flag());
    if let Some(progress) = progress {
        finder_config = finder_config.with_progress_callback(progress as Arc<dyn ProgressCallback>);
    }

    let finder = DuplicateFinder::new(finder_config);
    let report = finder.find_duplicates_in_paths(&args.roots, &args.exclude)?;
    let exit_code = ExitCode::for_report(&report);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match config.output {
        OutputFormat::Text => {
            let color = !no_color && stdout.is_terminal();
            TextOutput::new(&report)
                .with_color(color)
                .write_to(&mut out)
                .context("Failed to write report")?;
        }
        OutputFormat::Json => {
            JsonOutput::new(&report, exit_code).write_to(&mut out, true)?;
        }
    }
    out.flush().context("Failed to write report")?;

    Ok(exit_code)
}
