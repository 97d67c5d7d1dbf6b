//! Size grouping, the first and cheapest filtering stage.
//!
//! # Overview
//!
//! Files with different sizes cannot be byte-identical, so grouping by
//! exact size eliminates the bulk of candidates with one stat call per
//! file and no content I/O at all. Singleton size groups are collapsed.
//!
//! # Example
//!
//! ```no_run
//! use finddupes::pipeline::{group_by_size, FileTree};
//! use std::path::PathBuf;
//!
//! let mut tree = FileTree::new();
//! tree.push_root(
//!     PathBuf::from("/data"),
//!     vec![PathBuf::from("/data/a.txt"), PathBuf::from("/data/b.txt")],
//! );
//! let (groups, stats) = group_by_size(&tree);
//! println!("{} files could still be duplicates", stats.survivors);
//! ```

use std::collections::HashMap;
use std::fs;

use crate::scanner::FileEntry;

use super::FileTree;

/// Statistics from the size grouping stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeStats {
    /// Total number of discovered files that entered the stage
    pub total_files: usize,
    /// Total size in bytes of all files that could be statted
    pub total_size: u64,
    /// Files that vanished or failed to stat between discovery and here
    pub stat_failures: usize,
    /// Number of distinct sizes observed
    pub unique_sizes: usize,
    /// Files eliminated because their size was unique
    pub eliminated_unique: usize,
    /// Files remaining in groups of 2+
    pub survivors: usize,
    /// Number of size groups with 2+ files
    pub duplicate_groups: usize,
}

impl SizeStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            let eliminated = self.total_files - self.survivors;
            (eliminated as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group discovered files by exact byte size.
///
/// Flattens the per-root file tree into one stream, stats each path, and
/// buckets by size. Groups with a single member are dropped. A file that
/// disappears between discovery and stat is skipped with a log entry;
/// the stat race is an expected condition, not an error.
///
/// Member order within each group is discovery order, which later stages
/// rely on for picking the retained original.
#[must_use]
pub fn group_by_size(tree: &FileTree) -> (HashMap<u64, Vec<FileEntry>>, SizeStats) {
    let mut all_groups: HashMap<u64, Vec<FileEntry>> = HashMap::new();
    let mut stats = SizeStats::default();

    for path in tree.flatten() {
        stats.total_files += 1;

        let size = match fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                log::warn!("Could not stat {}: {}", path.display(), e);
                stats.stat_failures += 1;
                continue;
            }
        };

        stats.total_size += size;
        all_groups
            .entry(size)
            .or_default()
            .push(FileEntry::new(path.clone(), size));
    }

    stats.unique_sizes = all_groups.len();

    let filtered: HashMap<u64, Vec<FileEntry>> = all_groups
        .into_iter()
        .filter(|(size, files)| {
            if files.len() == 1 {
                stats.eliminated_unique += 1;
                log::trace!("Eliminated unique size {}: {}", size, files[0].path.display());
                false
            } else {
                stats.survivors += files.len();
                stats.duplicate_groups += 1;
                log::debug!("Size group {} bytes: {} candidates", size, files.len());
                true
            }
        })
        .collect();

    log::info!("Files after size checking: {}", stats.survivors);

    (filtered, stats)
}
