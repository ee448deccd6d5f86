//! Duplicate finder: the scan orchestrator.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs one complete scan:
//!
//! 1. **Traverse** - the [`Frontier`] walks the roots on the calling thread
//! 2. **Hash** - every regular file is dispatched to the [`WorkerPool`],
//!    whose workers stream it through the [`Hasher`] and record the digest
//!    in the shared [`DigestTable`]
//! 3. **Join** - the pool drains; only then is the table read
//! 4. **Report** - collision groups and totals become a [`ScanReport`]
//!
//! # Example
//!
//! ```no_run
//! use dupehash::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let config = FinderConfig::default().with_io_threads(4);
//! let finder = DuplicateFinder::new(config);
//!
//! let report = finder.find_duplicates(Path::new("/some/path")).unwrap();
//!
//! println!("Found {} duplicate groups", report.summary.duplicate_groups);
//! println!("Reclaimable space: {}", report.summary.reclaimable_display());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::groups::{build_groups, ScanReport, ScanSummary};
use super::pool::{
    Diagnostics, PoolError, Worker, WorkerPool, DEFAULT_IO_THREADS, DEFAULT_QUEUE_CAPACITY,
};
use super::table::DigestTable;
use crate::progress::ProgressCallback;
use crate::scanner::{
    DigestAlgorithm, ExclusionSet, Frontier, Hasher, RootSet, DEFAULT_BUFFER_SIZE,
};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Paths that may wait in the dispatch queue before the coordinator blocks.
    pub queue_capacity: usize,
    /// Digest algorithm.
    pub algorithm: DigestAlgorithm,
    /// Read buffer size per file, in bytes.
    pub buffer_size: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("queue_capacity", &self.queue_capacity)
            .field("algorithm", &self.algorithm)
            .field("buffer_size", &self.buffer_size)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            algorithm: DigestAlgorithm::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Create a new configuration with custom I/O thread count.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the dispatch queue capacity.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the per-file read buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Errors that stop a scan before it starts.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while validating a path.
    #[error("I/O error for {path}: {source}")]
    IoWithPath {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The hashing pool could not be created.
    #[error(transparent)]
    ThreadPool(#[from] PoolError),
}

/// Check that `path` exists and is a directory, returning its canonical form.
///
/// Canonical paths make the exact-match exclusion test reliable.
///
/// # Errors
///
/// Returns [`FinderError::PathNotFound`] or [`FinderError::NotADirectory`].
pub fn validate_directory(path: &Path) -> Result<PathBuf, FinderError> {
    if !path.exists() {
        return Err(FinderError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(FinderError::NotADirectory(path.to_path_buf()));
    }
    std::fs::canonicalize(path).map_err(|source| FinderError::IoWithPath {
        path: path.to_path_buf(),
        source,
    })
}

/// Duplicate finder that orchestrates traversal, hashing and reporting.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let hasher = Hasher::new(config.algorithm).with_buffer_size(config.buffer_size);
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Find all duplicate files beneath a single directory.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if the path does not exist, is not a
    /// directory, or shutdown was requested before the scan began.
    pub fn find_duplicates(&self, path: &Path) -> Result<ScanReport, FinderError> {
        self.find_duplicates_in_paths(&[path.to_path_buf()], &[])
    }

    /// Validate roots and exclusions, then scan.
    ///
    /// All paths are canonicalized before the scan so that exclusion
    /// matching compares like with like.
    ///
    /// # Errors
    ///
    /// Fails on the first root or exclusion that is missing or is not a
    /// directory; nothing is scanned in that case.
    pub fn find_duplicates_in_paths(
        &self,
        roots: &[PathBuf],
        exclusions: &[PathBuf],
    ) -> Result<ScanReport, FinderError> {
        let roots = roots
            .iter()
            .map(|p| validate_directory(p))
            .collect::<Result<Vec<_>, _>>()?;
        let exclusions = exclusions
            .iter()
            .map(|p| validate_directory(p))
            .collect::<Result<Vec<_>, _>>()?;

        self.scan(&RootSet::new(roots), &ExclusionSet::new(exclusions))
    }

    /// Scan already validated roots.
    ///
    /// Per-entry failures never make this fail; they are logged and listed
    /// in the summary.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if shutdown was requested before
    /// traversal began, or [`FinderError::ThreadPool`] if the hashing
    /// threads cannot be spawned.
    pub fn scan(&self, roots: &RootSet, exclusions: &ExclusionSet) -> Result<ScanReport, FinderError> {
        let start_time = Instant::now();

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        log::info!(
            "Starting duplicate scan of {} root(s) with {} ({} threads)",
            roots.len(),
            self.config.algorithm,
            self.config.io_threads
        );
        for root in roots.iter() {
            log::debug!("Root: {}", root.display());
        }

        let pool = WorkerPool::new(self.config.io_threads, self.config.queue_capacity)?;
        let table = DigestTable::new();
        let diagnostics = Diagnostics::new();

        let mut worker = Worker::new(self.hasher, &table, &diagnostics);
        if let Some(ref callback) = self.config.progress_callback {
            worker = worker.with_progress(callback.as_ref());
        }
        if let Some(ref flag) = self.config.shutdown_flag {
            worker = worker.with_shutdown_flag(flag.as_ref());
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_scan_start(roots.len());
        }

        let mut frontier = Frontier::new(roots, exclusions);
        if let Some(ref flag) = self.config.shutdown_flag {
            frontier = frontier.with_shutdown_flag(Arc::clone(flag));
        }

        // Returns only after every dispatched file has been processed.
        let traversal = pool.run(&worker, |dispatcher| {
            frontier.expand(|path| dispatcher.dispatch(path))
        });
        drop(worker);

        let interrupted = traversal.interrupted || self.config.is_shutdown_requested();
        if interrupted {
            log::info!("Scan interrupted by shutdown signal; reporting partial results");
        }

        let (mut scan_errors, rejected_records) = diagnostics.into_parts();
        let mut errors = traversal.errors;
        errors.append(&mut scan_errors);

        let (total_files, total_size, groups) = build_groups(table);

        let mut summary = ScanSummary {
            algorithm: self.config.algorithm,
            total_files,
            total_size,
            directories_scanned: traversal.directories_expanded,
            symlinks_skipped: traversal.symlinks_skipped,
            excluded_entries: traversal.excluded,
            interrupted,
            scan_errors: errors,
            rejected_records,
            ..Default::default()
        };
        summary.calculate_wasted_space(&groups);
        summary.scan_duration = start_time.elapsed();

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_scan_end();
        }

        log::info!(
            "Scan complete: {} files, {} groups, {} duplicates, {} bytes reclaimable, {} skipped",
            summary.total_files,
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_space,
            summary.skipped_entries()
        );

        Ok(ScanReport { groups, summary })
    }
}
