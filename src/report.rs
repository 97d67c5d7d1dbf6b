//! Console reporting of confirmed duplicate groups.
//!
//! # Overview
//!
//! The [`Reporter`] writes one line per duplicate group member to an
//! injected sink, in the fixed format consumed by scripts:
//!
//! ```text
//! <hash> duplicate <path>
//! ```
//!
//! Lines are emitted in group order, then member order. The sink is a
//! plain `io::Write` passed by parameter rather than a hardwired stdout,
//! so tests capture the output into a buffer. The reporter never touches
//! the filesystem.

use std::io::{self, Write};

use crate::pipeline::DuplicateGroup;

/// Summary of a completed report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Number of duplicate groups reported
    pub groups: usize,
    /// Duplicates excluding the retained original of each group
    pub excess_files: usize,
}

/// Writes the duplicate report to an injected sink.
#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter writing to the given sink.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Emit every group member as `<hash> duplicate <path>` and report
    /// the excess file count to the log.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the sink cannot be written.
    pub fn report(&mut self, groups: &[DuplicateGroup]) -> io::Result<ReportSummary> {
        let mut summary = ReportSummary::default();

        for group in groups {
            let hex = group.hash_hex();
            for file in &group.files {
                writeln!(self.out, "{} duplicate {}", hex, file.path.display())?;
            }
            summary.groups += 1;
            summary.excess_files += group.duplicate_count();
        }

        log::info!("Excess files: {}", summary.excess_files);

        Ok(summary)
    }
}
