//! Duplicate groups and scan summaries.
//!
//! # Overview
//!
//! After the worker pool has drained, the final [`DigestTable`] state is
//! turned into a [`ScanReport`]: one [`DuplicateGroup`] per digest shared by
//! two or more files, plus a [`ScanSummary`] with totals.
//!
//! Groups are sorted by reclaimable space (largest first), then by digest,
//! so a report is stable for a given tree. Paths inside a group keep the
//! order in which they were recorded.
//!
//! [`DigestTable`]: super::DigestTable
//!
//! # Example
//!
//! ```
//! use dupehash::duplicates::{build_groups, DigestTable};
//! use dupehash::scanner::Hasher;
//! use std::path::Path;
//!
//! let table = DigestTable::new();
//! let digest = Hasher::default().hash_bytes(b"abc");
//! table.record(Path::new("/one"), &digest, 3).unwrap();
//! table.record(Path::new("/two"), &digest, 3).unwrap();
//!
//! let (total_files, total_size, groups) = build_groups(table);
//! assert_eq!(total_files, 2);
//! assert_eq!(total_size, 6);
//! assert_eq!(groups[0].reclaimable(), 3);
//! ```

use std::path::PathBuf;
use std::time::Duration;

use super::table::{DigestGroup, DigestTable, RecordError};
use crate::scanner::{Digest, DigestAlgorithm, ScanError};

/// Confirmed duplicate group of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Content digest shared by every file
    pub digest: Digest,
    /// File size in bytes (shared by all files in the group)
    pub size: u64,
    /// Paths in discovery order
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(digest: Digest, size: u64, paths: Vec<PathBuf>) -> Self {
        Self {
            digest,
            size,
            paths,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of redundant copies (all files minus one).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Space freed by keeping a single copy.
    #[must_use]
    pub fn reclaimable(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size * self.paths.len() as u64
    }

    /// Digest as lowercase hexadecimal.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        self.digest.to_hex()
    }
}

impl From<DigestGroup> for DuplicateGroup {
    fn from(group: DigestGroup) -> Self {
        Self::new(group.digest, group.size, group.paths)
    }
}

/// Convert the drained table into sorted duplicate groups.
///
/// Returns `(files processed, bytes processed, groups)`. Singleton groups
/// only contribute to the totals.
#[must_use]
pub fn build_groups(table: DigestTable) -> (usize, u64, Vec<DuplicateGroup>) {
    let (files_processed, groups) = table.into_groups();

    let total_size = groups.iter().map(|g| g.size * g.count() as u64).sum();

    let mut duplicates: Vec<DuplicateGroup> = groups
        .into_iter()
        .filter(DigestGroup::is_collision)
        .map(DuplicateGroup::from)
        .collect();

    duplicates.sort_by(|a, b| {
        b.reclaimable()
            .cmp(&a.reclaimable())
            .then_with(|| a.digest.cmp(&b.digest))
    });

    for group in &duplicates {
        log::debug!(
            "Duplicate group {}: {} files, {} bytes each",
            group.hash_hex(),
            group.len(),
            group.size
        );
    }

    (files_processed, total_size, duplicates)
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Algorithm used to compute digests
    pub algorithm: DigestAlgorithm,
    /// Files successfully hashed and recorded
    pub total_files: usize,
    /// Total size of all recorded files in bytes
    pub total_size: u64,
    /// Directories whose contents were listed
    pub directories_scanned: usize,
    /// Symbolic links that were not followed
    pub symlinks_skipped: usize,
    /// Entries dropped by the exclusion set
    pub excluded_entries: usize,
    /// Number of digests shared by two or more files
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding one copy per group)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Whether the scan was interrupted
    pub interrupted: bool,
    /// Entries skipped because of filesystem errors
    pub scan_errors: Vec<ScanError>,
    /// Records refused by the digest table
    pub rejected_records: Vec<RecordError>,
}

impl ScanSummary {
    /// Fill in the duplicate totals from `groups`.
    pub fn calculate_wasted_space(&mut self, groups: &[DuplicateGroup]) {
        self.duplicate_groups = groups.len();
        self.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        self.reclaimable_space = groups.iter().map(DuplicateGroup::reclaimable).sum();
    }

    /// Number of entries skipped with a warning.
    #[must_use]
    pub fn skipped_entries(&self) -> usize {
        self.scan_errors.len()
    }

    /// Whether any entry was skipped or any record refused.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.scan_errors.is_empty() || !self.rejected_records.is_empty()
    }

    /// Calculate the percentage of space that is wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        bytesize::ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Format total size as human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        bytesize::ByteSize::b(self.total_size).to_string()
    }
}

/// Final result of a scan: duplicate groups plus summary.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Duplicate groups, largest reclaimable space first
    pub groups: Vec<DuplicateGroup>,
    /// Totals and diagnostics
    pub summary: ScanSummary,
}

impl ScanReport {
    /// Whether no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
