//! Bounded hashing worker pool.
//!
//! # Overview
//!
//! [`WorkerPool`] owns a dedicated rayon thread pool with `io_threads`
//! threads. For each scan it opens a bounded crossbeam channel, parks one
//! long-lived [`Worker`] loop on every pool thread, and then runs the
//! coordinator on the calling thread with a [`Dispatcher`] for the sending
//! side.
//!
//! - Dispatch is fire-and-forget. The coordinator only blocks when the queue
//!   is full.
//! - When the coordinator returns, the channel closes; workers finish what
//!   is queued and exit.
//! - [`WorkerPool::run`] returns only after every worker has exited. That is
//!   the join barrier: no result may be read before it.
//!
//! ```text
//! coordinator (caller thread) ──bounded queue──┬── worker 0: open → hash → record
//!                                              ├── worker 1: open → hash → record
//!                                              └── worker N: open → hash → record
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crossbeam_channel::{bounded, Receiver, Sender};

use super::table::{DigestTable, RecordError};
use crate::progress::ProgressCallback;
use crate::scanner::{HashError, Hasher, ScanError};

/// Default number of hashing threads.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Default number of dispatched paths that may wait for a free worker.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Errors raised while building the pool.
#[derive(thiserror::Error, Debug)]
#[error("Failed to build hashing thread pool: {0}")]
pub struct PoolError(#[from] rayon::ThreadPoolBuildError);

/// Non-fatal problems collected from all workers.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Mutex<Vec<ScanError>>,
    rejected: Mutex<Vec<RecordError>>,
}

impl Diagnostics {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep a per-entry filesystem error.
    pub fn push_error(&self, error: ScanError) {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }

    /// Keep a record the table refused.
    pub fn push_rejected(&self, error: RecordError) {
        self.rejected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error);
    }

    /// Number of filesystem errors so far.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Split into filesystem errors and rejected records.
    #[must_use]
    pub fn into_parts(self) -> (Vec<ScanError>, Vec<RecordError>) {
        (
            self.errors
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
            self.rejected
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

/// Per-scan state shared by every worker loop.
pub struct Worker<'a> {
    hasher: Hasher,
    table: &'a DigestTable,
    diagnostics: &'a Diagnostics,
    progress: Option<&'a dyn ProgressCallback>,
    shutdown_flag: Option<&'a AtomicBool>,
}

impl<'a> Worker<'a> {
    /// Create a worker context recording into `table`.
    #[must_use]
    pub fn new(hasher: Hasher, table: &'a DigestTable, diagnostics: &'a Diagnostics) -> Self {
        Self {
            hasher,
            table,
            diagnostics,
            progress: None,
            shutdown_flag: None,
        }
    }

    /// Report per-file progress to `callback`.
    #[must_use]
    pub fn with_progress(mut self, callback: &'a dyn ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Stop hashing queued files once `flag` is set.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Pull paths until the channel closes.
    fn drain(&self, id: usize, rx: Receiver<PathBuf>) {
        let mut processed = 0usize;
        let mut skipped = 0usize;

        for path in rx.iter() {
            if self.is_shutdown_requested() {
                skipped += 1;
                continue;
            }
            self.process(&path);
            processed += 1;
        }

        log::trace!(
            "Worker {} exiting: {} processed, {} skipped after shutdown",
            id,
            processed,
            skipped
        );
    }

    /// Open, hash and record a single file.
    ///
    /// Failures are logged and kept in [`Diagnostics`]; they never reach
    /// other units of work.
    pub fn process(&self, path: &Path) {
        if let Some(callback) = self.progress {
            callback.on_file_start(path);
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                log::warn!("Cannot open {}: {}", path.display(), e);
                self.diagnostics
                    .push_error(HashError::from_io(path, e).into());
                return;
            }
        };

        // The handle is consumed and closed inside the hasher.
        let (digest, size) = match self.hasher.hash_open_file(path, file) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Failed to hash {}: {}", path.display(), e);
                self.diagnostics.push_error(e.into());
                return;
            }
        };

        log::trace!("{} {}", digest, path.display());

        match self.table.record(path, &digest, size) {
            Ok(()) => {
                if let Some(callback) = self.progress {
                    callback.on_file_recorded(self.table.snapshot());
                }
            }
            Err(e) => self.diagnostics.push_rejected(e),
        }
    }
}

/// Sending half handed to the coordinator.
pub struct Dispatcher {
    tx: Sender<PathBuf>,
}

impl Dispatcher {
    /// Queue `path` for hashing.
    ///
    /// Blocks only while the queue is full.
    pub fn dispatch(&self, path: PathBuf) {
        if let Err(e) = self.tx.send(path) {
            // Only possible if every worker has gone away.
            log::error!("No hashing worker available for {}", e.0.display());
        }
    }
}

/// Fixed-size pool of hashing threads.
#[derive(Debug)]
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    io_threads: usize,
    queue_capacity: usize,
}

impl WorkerPool {
    /// Build a pool of `io_threads` threads (at least one) with a dispatch
    /// queue of `queue_capacity` slots (at least one).
    ///
    /// # Errors
    ///
    /// Returns [`PoolError`] if the operating system refuses to spawn the
    /// threads.
    pub fn new(io_threads: usize, queue_capacity: usize) -> Result<Self, PoolError> {
        let io_threads = io_threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(io_threads)
            .thread_name(|i| format!("dupehash-worker-{}", i))
            .build()?;

        Ok(Self {
            pool,
            io_threads,
            queue_capacity: queue_capacity.max(1),
        })
    }

    /// Number of hashing threads.
    #[must_use]
    pub fn io_threads(&self) -> usize {
        self.io_threads
    }

    /// Capacity of the dispatch queue.
    #[must_use]
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Run `coordinator` on the calling thread while the workers hash what
    /// it dispatches.
    ///
    /// Returns the coordinator's result after all dispatched work has
    /// completed.
    pub fn run<R, C>(&self, worker: &Worker<'_>, coordinator: C) -> R
    where
        C: FnOnce(&Dispatcher) -> R,
    {
        let (tx, rx) = bounded::<PathBuf>(self.queue_capacity);

        self.pool.in_place_scope(|scope| {
            for id in 0..self.io_threads {
                let rx = rx.clone();
                scope.spawn(move |_| worker.drain(id, rx));
            }
            drop(rx);

            let dispatcher = Dispatcher { tx };
            let result = coordinator(&dispatcher);
            // Closing the channel lets the workers run dry and exit.
            drop(dispatcher);
            result
        })
    }
}
