//! Human-readable report.
//!
//! ```text
//! [1] 3f2a…c09e  3 files × 1.2 MiB, 2.4 MiB reclaimable
//!     /photos/a.jpg
//!     /backup/a.jpg
//!     /backup/old/a.jpg
//!
//! 1 duplicate group, 2 duplicate files, 2.4 MiB reclaimable (12.5% of 19.2 MiB)
//! 412 files hashed in 0.84s (37 directories, 2 symlinks skipped, 0 excluded)
//! ```

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::{Condition, Paint};

use crate::duplicates::{DuplicateGroup, ScanReport, ScanSummary};

/// Plain-text report writer.
#[derive(Debug, Clone, Copy)]
pub struct TextOutput<'a> {
    report: &'a ScanReport,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a writer for `report`.
    #[must_use]
    pub fn new(report: &'a ScanReport) -> Self {
        Self {
            report,
            color: true,
        }
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn condition(&self) -> Condition {
        if self.color {
            Condition::ALWAYS
        } else {
            Condition::NEVER
        }
    }

    /// Write the full report.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let summary = &self.report.summary;

        if summary.interrupted {
            writeln!(
                writer,
                "{}",
                "Scan interrupted; results are partial."
                    .yellow()
                    .bold()
                    .whenever(self.condition())
            )?;
            writeln!(writer)?;
        }

        if self.report.is_empty() {
            writeln!(writer, "No duplicate files found.")?;
        } else {
            for (index, group) in self.report.groups.iter().enumerate() {
                self.write_group(writer, index + 1, group)?;
            }
        }

        writeln!(writer)?;
        self.write_summary(writer, summary)
    }

    fn write_group<W: Write>(
        &self,
        writer: &mut W,
        number: usize,
        group: &DuplicateGroup,
    ) -> io::Result<()> {
        let header = format!("[{}]", number);
        writeln!(
            writer,
            "{} {}  {} files × {}, {} reclaimable",
            header.bold().whenever(self.condition()),
            group.hash_hex().cyan().whenever(self.condition()),
            group.len(),
            ByteSize::b(group.size),
            ByteSize::b(group.reclaimable())
                .to_string()
                .green()
                .whenever(self.condition()),
        )?;
        for path in &group.paths {
            writeln!(writer, "    {}", path.display())?;
        }
        writeln!(writer)
    }

    fn write_summary<W: Write>(&self, writer: &mut W, summary: &ScanSummary) -> io::Result<()> {
        writeln!(
            writer,
            "{} duplicate {}, {} duplicate files, {} reclaimable ({:.1}% of {})",
            summary.duplicate_groups,
            if summary.duplicate_groups == 1 {
                "group"
            } else {
                "groups"
            },
            summary.duplicate_files,
            summary
                .reclaimable_display()
                .bold()
                .whenever(self.condition()),
            summary.wasted_percentage(),
            summary.total_size_display(),
        )?;
        writeln!(
            writer,
            "{} files hashed with {} in {:.2}s ({} directories, {} symlinks skipped, {} excluded)",
            summary.total_files,
            summary.algorithm,
            summary.scan_duration.as_secs_f64(),
            summary.directories_scanned,
            summary.symlinks_skipped,
            summary.excluded_entries,
        )?;

        let problems = summary.skipped_entries() + summary.rejected_records.len();
        if problems > 0 {
            writeln!(
                writer,
                "{}",
                format!("{} entries skipped because of errors (see log)", problems)
                    .yellow()
                    .whenever(self.condition())
            )?;
        }
        Ok(())
    }
}
