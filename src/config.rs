//! Application configuration management.
//!
//! Settings are layered with `figment`, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file: `--config FILE`, or `config.toml` in the platform config
//!    directory when it exists
//! 3. `DUPEHASH_*` environment variables (e.g. `DUPEHASH_IO_THREADS=8`)
//! 4. Command-line flags, applied by [`Config::apply_scan_args`]

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{OutputFormat, ScanArgs};
use crate::duplicates::{FinderConfig, DEFAULT_IO_THREADS, DEFAULT_QUEUE_CAPACITY};
use crate::scanner::{DigestAlgorithm, DEFAULT_BUFFER_SIZE};

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "DUPEHASH_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of hashing threads.
    pub io_threads: usize,
    /// Dispatch queue capacity.
    pub queue_capacity: usize,
    /// Digest algorithm.
    pub algorithm: DigestAlgorithm,
    /// Per-file read buffer in bytes.
    pub buffer_size: usize,
    /// Draw the progress line.
    pub progress: bool,
    /// Report format.
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            algorithm: DigestAlgorithm::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            progress: true,
            output: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Build the figment for `path`, or for the default location.
    ///
    /// The default location is only used when the file exists.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match path {
            Some(p) => figment = figment.merge(Toml::file(p)),
            None => {
                if let Some(default) = Self::config_path().filter(|p| p.exists()) {
                    log::debug!("Using config file {}", default.display());
                    figment = figment.merge(Toml::file(default));
                }
            }
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate the layered configuration.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, a value has the wrong
    /// type, or [`validate`](Self::validate) rejects the result.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(p) = path {
            ensure!(p.is_file(), "Config file not found: {}", p.display());
        }
        let config: Self = Self::figment(path)
            .extract()
            .context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the scanner cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first zero-valued setting.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.io_threads > 0, "io_threads must be at least 1");
        ensure!(self.queue_capacity > 0, "queue_capacity must be at least 1");
        ensure!(self.buffer_size > 0, "buffer_size must be at least 1 byte");
        Ok(())
    }

    /// Apply scan flags that were given on the command line.
    ///
    /// # Errors
    ///
    /// Fails if the result no longer validates (e.g. `--io-threads 0`).
    pub fn apply_scan_args(&mut self, args: &ScanArgs) -> Result<()> {
        if let Some(n) = args.io_threads {
            self.io_threads = n;
        }
        if let Some(n) = args.queue_capacity {
            self.queue_capacity = n;
        }
        if let Some(algorithm) = args.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(size) = args.buffer_size {
            self.buffer_size = usize::try_from(size).context("buffer_size is too large")?;
        }
        if let Some(output) = args.output {
            self.output = output;
        }
        if args.no_progress {
            self.progress = false;
        }
        self.validate()
    }

    /// Finder settings derived from this configuration.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_io_threads(self.io_threads)
            .with_queue_capacity(self.queue_capacity)
            .with_algorithm(self.algorithm)
            .with_buffer_size(self.buffer_size)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupehash", "dupehash")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
