//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Breadth-first traversal of the root directories ([`frontier`])
//! - Streaming content hashing with BLAKE3 or SHA-2 ([`hasher`])
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`frontier`]: Single-threaded coordinator that classifies entries and
//!   hands regular files to a dispatcher
//! - [`hasher`]: Streaming file hashing
//!
//! # Example
//!
//! ```no_run
//! use dupehash::scanner::{ExclusionSet, Frontier, RootSet};
//! use std::path::PathBuf;
//!
//! let roots = RootSet::new(vec![PathBuf::from("/home/user/Downloads")]);
//! let exclusions = ExclusionSet::default();
//!
//! let mut frontier = Frontier::new(&roots, &exclusions);
//! let stats = frontier.expand(|path| println!("{}", path.display()));
//! println!("{} files, {} directories", stats.files_dispatched, stats.directories_expanded);
//! ```

pub mod frontier;
pub mod hasher;

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

// Re-export main types
pub use frontier::{Frontier, FrontierStats};
pub use hasher::{hash_to_hex, hex_to_hash, Digest, DigestAlgorithm, Hasher, DEFAULT_BUFFER_SIZE};

/// Ordered list of validated root directories.
///
/// Roots are scanned in the order given. Immutable once a scan begins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootSet {
    roots: Vec<PathBuf>,
}

impl RootSet {
    /// Create a root set from already validated directories.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Iterate roots in order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().map(PathBuf::as_path)
    }

    /// Number of roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether no roots were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Set of excluded directories.
///
/// Matching is by exact path equality, not prefix: an entry is excluded only
/// if its path is literally a member. Because excluded directories are never
/// expanded, everything beneath them is unreachable as well.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    paths: HashSet<PathBuf>,
}

impl ExclusionSet {
    /// Create an exclusion set.
    #[must_use]
    pub fn new<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    /// Whether `path` is excluded.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Number of excluded directories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether nothing is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Non-fatal errors for a single filesystem entry.
///
/// These never stop a scan; the offending entry is skipped and the error is
/// kept for the summary.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The entry is neither a regular file nor a directory.
    #[error("Unsupported entry type: {0}")]
    UnsupportedEntry(PathBuf),

    /// An I/O error occurred while accessing an entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl ScanError {
    /// Classify an I/O error raised while touching `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path of the entry that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::UnsupportedEntry(p) => p,
            Self::Io { path, .. } => path,
            Self::Hash(e) => e.path(),
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while opening or reading `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}
