//! Shared digest table.
//!
//! # Overview
//!
//! [`DigestTable`] maps each content digest to the group of files that
//! produced it. Worker threads call [`DigestTable::record`] concurrently; all
//! of the table state (groups, collision set and processed-file counter)
//! lives behind a single mutex, so every record is applied as one critical
//! section and readers never see half of an insert.
//!
//! Iteration over the groups is only possible through
//! [`DigestTable::into_groups`], which consumes the table. The pool must
//! have drained before that point.
//!
//! # Example
//!
//! ```
//! use dupehash::duplicates::DigestTable;
//! use dupehash::scanner::Hasher;
//! use std::path::Path;
//!
//! let table = DigestTable::new();
//! let digest = Hasher::default().hash_bytes(b"same");
//!
//! table.record(Path::new("/a"), &digest, 4).unwrap();
//! table.record(Path::new("/b"), &digest, 4).unwrap();
//!
//! let snapshot = table.snapshot();
//! assert_eq!(snapshot.files_processed, 2);
//! assert_eq!(snapshot.collision_groups, 1);
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::scanner::Digest;

/// All files observed with one digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestGroup {
    /// Shared content digest
    pub digest: Digest,
    /// Size in bytes of each member file
    pub size: u64,
    /// Member paths in the order they were recorded
    pub paths: Vec<PathBuf>,
}

impl DigestGroup {
    fn new(digest: Digest, size: u64, path: PathBuf) -> Self {
        Self {
            digest,
            size,
            paths: vec![path],
        }
    }

    /// Number of member files. Always at least one.
    #[must_use]
    pub fn count(&self) -> usize {
        self.paths.len()
    }

    /// Whether two or more files share this digest.
    #[must_use]
    pub fn is_collision(&self) -> bool {
        self.paths.len() > 1
    }

    /// Bytes freed by keeping a single copy.
    #[must_use]
    pub fn reclaimable(&self) -> u64 {
        self.size * (self.paths.len() as u64).saturating_sub(1)
    }
}

/// Reasons a record is rejected without touching the table.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The path was empty.
    #[error("Refusing to record an empty path")]
    EmptyPath,

    /// The digest was empty.
    #[error("Refusing to record an empty digest for {0}")]
    EmptyDigest(PathBuf),

    /// The digest is already known with a different size.
    #[error("Size mismatch for digest {digest} at {path}: group has {expected} bytes, file has {actual}")]
    SizeMismatch {
        /// Path of the rejected file
        path: PathBuf,
        /// Hex digest shared with the existing group
        digest: String,
        /// Size recorded for the existing group
        expected: u64,
        /// Size reported for the rejected file
        actual: u64,
    },
}

/// Consistent view of the live counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableSnapshot {
    /// Files successfully recorded so far
    pub files_processed: usize,
    /// Digests currently shared by two or more files
    pub collision_groups: usize,
}

#[derive(Debug, Default)]
struct TableState {
    groups: HashMap<Digest, DigestGroup>,
    collisions: HashSet<Digest>,
    files_processed: usize,
}

/// Concurrency-safe digest → group table.
#[derive(Debug, Default)]
pub struct DigestTable {
    state: Mutex<TableState>,
}

impl DigestTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a half-applied record:
    // every mutation below happens after all checks have passed.
    fn lock(&self) -> MutexGuard<'_, TableState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record that `path` hashed to `digest` and holds `size` bytes.
    ///
    /// Appends to an existing group or creates a new one, updates the
    /// collision set and bumps the processed counter, all under one lock.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] (after logging it) for an empty path, an
    /// empty digest, or a size that disagrees with the existing group. The
    /// table is left untouched in each case.
    pub fn record(&self, path: &Path, digest: &Digest, size: u64) -> Result<(), RecordError> {
        if path.as_os_str().is_empty() {
            log::error!("Internal error: {}", RecordError::EmptyPath);
            return Err(RecordError::EmptyPath);
        }
        if digest.is_empty() {
            let err = RecordError::EmptyDigest(path.to_path_buf());
            log::error!("Internal error: {}", err);
            return Err(err);
        }

        let mut state = self.lock();

        if let Some(group) = state.groups.get_mut(digest) {
            if group.size != size {
                let err = RecordError::SizeMismatch {
                    path: path.to_path_buf(),
                    digest: digest.to_hex(),
                    expected: group.size,
                    actual: size,
                };
                drop(state);
                log::error!("Internal error: {}", err);
                return Err(err);
            }
            group.paths.push(path.to_path_buf());
            if group.count() == 2 {
                state.collisions.insert(digest.clone());
            }
        } else {
            state.groups.insert(
                digest.clone(),
                DigestGroup::new(digest.clone(), size, path.to_path_buf()),
            );
        }
        state.files_processed += 1;

        Ok(())
    }

    /// Read the live counters atomically with respect to [`record`](Self::record).
    #[must_use]
    pub fn snapshot(&self) -> TableSnapshot {
        let state = self.lock();
        TableSnapshot {
            files_processed: state.files_processed,
            collision_groups: state.collisions.len(),
        }
    }

    /// Whether `digest` is currently shared by two or more files.
    #[must_use]
    pub fn is_collision(&self, digest: &Digest) -> bool {
        self.lock().collisions.contains(digest)
    }

    /// Number of distinct digests recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().groups.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().groups.is_empty()
    }

    /// Consume the table, returning the processed count and every group.
    ///
    /// Groups come back in arbitrary order.
    #[must_use]
    pub fn into_groups(self) -> (usize, Vec<DigestGroup>) {
        let state = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        (state.files_processed, state.groups.into_values().collect())
    }
}
