//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements [`ProgressCallback`]
//! to display a single transient status line while a scan runs: files hashed,
//! collision groups found so far, and the file a worker just picked up.
//!
//! Hashing workers call the callback concurrently, so every implementation
//! must be `Send + Sync`.

use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::duplicates::TableSnapshot;

/// Progress callback for a duplicate scan.
///
/// Implement this trait to receive progress updates while files are hashed.
pub trait ProgressCallback: Send + Sync {
    /// Called once before traversal begins.
    ///
    /// # Arguments
    ///
    /// * `roots` - Number of root directories being scanned
    fn on_scan_start(&self, _roots: usize) {}

    /// Called by a worker just before it opens a file.
    fn on_file_start(&self, path: &Path);

    /// Called after a file has been recorded, with the table's live counters.
    fn on_file_recorded(&self, snapshot: TableSnapshot);

    /// Called once after the pool has drained.
    fn on_scan_end(&self) {}
}

/// Progress reporter using indicatif.
pub struct Progress {
    multi: MultiProgress,
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupehash::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            bar: Mutex::new(None),
            quiet,
        }
    }

    /// Draw target shared with the logger so log lines can suspend the bar.
    #[must_use]
    pub fn multi(&self) -> MultiProgress {
        self.multi.clone()
    }

    /// Whether drawing is disabled.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {pos} files hashed, {prefix} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Some(ref pb) = *self.bar.lock().unwrap_or_else(PoisonError::into_inner) {
            f(pb);
        }
    }
}

impl ProgressCallback for Progress {
    fn on_scan_start(&self, roots: usize) {
        if self.quiet {
            return;
        }

        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::style());
        pb.set_prefix("0 duplicate groups");
        pb.set_message(format!("scanning {} root(s)", roots));
        pb.enable_steady_tick(Duration::from_millis(100));
        *self.bar.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb);
    }

    fn on_file_start(&self, path: &Path) {
        if self.quiet {
            return;
        }
        let display = truncate_path(&path.to_string_lossy(), 40);
        self.with_bar(|pb| pb.set_message(display));
    }

    fn on_file_recorded(&self, snapshot: TableSnapshot) {
        if self.quiet {
            return;
        }
        self.with_bar(|pb| {
            pb.set_position(snapshot.files_processed as u64);
            pb.set_prefix(format!("{} duplicate groups", snapshot.collision_groups));
        });
    }

    fn on_scan_end(&self) {
        if let Some(pb) = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pb.finish_and_clear();
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len >= max_len {
        let tail: String = file_name.chars().skip(name_len + 3 - max_len).collect();
        return format!("...{}", tail);
    }

    format!(".../{}", file_name)
}
