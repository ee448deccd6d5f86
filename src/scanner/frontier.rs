//! Traversal frontier: the single-threaded coordinator of a scan.
//!
//! # Overview
//!
//! The [`Frontier`] owns a FIFO queue of paths awaiting classification. It
//! is seeded with the root directories and drained one entry at a time:
//!
//! - regular files are handed to a dispatcher closure (normally the worker
//!   pool),
//! - directories are listed one level deep and their children queued,
//! - everything else is skipped.
//!
//! The queue is never shared with other threads, so no locking is needed on
//! traversal state.
//!
//! # Symbolic links
//!
//! Entries are classified with `symlink_metadata`, and every symbolic link is
//! skipped, whether it points at a file or a directory. Directories are
//! additionally tracked by canonical path and expanded at most once, so
//! overlapping roots and bind mounts cannot cause repeated expansion.
//!
//! # Errors
//!
//! Inaccessible entries are logged, collected in [`FrontierStats::errors`]
//! and skipped. The frontier never fails as a whole.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{ExclusionSet, RootSet, ScanError};

/// Counters collected while draining the frontier.
#[derive(Debug, Default)]
pub struct FrontierStats {
    /// Regular files handed to the dispatcher
    pub files_dispatched: usize,
    /// Directories whose children were listed
    pub directories_expanded: usize,
    /// Symbolic links that were skipped
    pub symlinks_skipped: usize,
    /// Entries dropped because they are in the exclusion set
    pub excluded: usize,
    /// Non-fatal errors for entries that could not be classified or listed
    pub errors: Vec<ScanError>,
    /// Whether traversal stopped early because shutdown was requested
    pub interrupted: bool,
}

/// Breadth-first traversal coordinator.
#[derive(Debug)]
pub struct Frontier<'a> {
    roots: &'a RootSet,
    exclusions: &'a ExclusionSet,
    queue: VecDeque<PathBuf>,
    visited: HashSet<PathBuf>,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl<'a> Frontier<'a> {
    /// Create a frontier over the given roots.
    #[must_use]
    pub fn new(roots: &'a RootSet, exclusions: &'a ExclusionSet) -> Self {
        Self {
            roots,
            exclusions,
            queue: VecDeque::new(),
            visited: HashSet::new(),
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// Once the flag is set the frontier stops popping entries; nothing
    /// further is dispatched.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Drain the frontier, calling `dispatch` for every regular file found.
    ///
    /// Returns once the queue is empty (or shutdown was requested). The
    /// caller is responsible for waiting on any asynchronous work started by
    /// `dispatch`.
    pub fn expand<F>(&mut self, mut dispatch: F) -> FrontierStats
    where
        F: FnMut(PathBuf),
    {
        let mut stats = FrontierStats::default();

        for root in self.roots.iter() {
            if self.exclusions.contains(root) {
                log::debug!("Root is excluded: {}", root.display());
                stats.excluded += 1;
                continue;
            }
            self.queue.push_back(root.to_path_buf());
        }

        while let Some(path) = self.queue.pop_front() {
            if self.is_shutdown_requested() {
                log::debug!("Frontier: Shutdown requested, stopping traversal");
                stats.interrupted = true;
                self.queue.clear();
                break;
            }

            let metadata = match fs::symlink_metadata(&path) {
                Ok(m) => m,
                Err(e) => {
                    log::warn!("Cannot access {}: {}", path.display(), e);
                    stats.errors.push(ScanError::from_io(&path, e));
                    continue;
                }
            };

            let file_type = metadata.file_type();
            if file_type.is_symlink() {
                log::debug!("Skipping symlink: {}", path.display());
                stats.symlinks_skipped += 1;
            } else if file_type.is_file() {
                log::trace!("Dispatching {}", path.display());
                stats.files_dispatched += 1;
                dispatch(path);
            } else if file_type.is_dir() {
                self.expand_directory(&path, &mut stats);
            } else {
                log::warn!("Skipping unsupported entry: {}", path.display());
                stats.errors.push(ScanError::UnsupportedEntry(path));
            }
        }

        log::debug!(
            "Frontier drained: {} files, {} directories, {} symlinks skipped, {} excluded, {} errors",
            stats.files_dispatched,
            stats.directories_expanded,
            stats.symlinks_skipped,
            stats.excluded,
            stats.errors.len()
        );

        stats
    }

    /// List one directory level and queue its children.
    fn expand_directory(&mut self, dir: &Path, stats: &mut FrontierStats) {
        let canonical = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        if !self.visited.insert(canonical) {
            log::debug!("Directory already expanded: {}", dir.display());
            return;
        }

        let read_dir = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(e) => {
                log::warn!("Cannot read directory {}: {}", dir.display(), e);
                stats.errors.push(ScanError::from_io(dir, e));
                return;
            }
        };
        stats.directories_expanded += 1;

        let mut children = Vec::new();
        for entry in read_dir {
            match entry {
                Ok(entry) => children.push(entry.path()),
                Err(e) => {
                    log::warn!("Cannot read entry in {}: {}", dir.display(), e);
                    stats.errors.push(ScanError::from_io(dir, e));
                }
            }
        }

        // Deterministic discovery order
        children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        for child in children {
            if self.exclusions.contains(&child) {
                log::trace!("Excluded: {}", child.display());
                stats.excluded += 1;
                continue;
            }
            self.queue.push_back(child);
        }
    }
}
