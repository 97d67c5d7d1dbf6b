//! Progressive equivalence-filtering pipeline.
//!
//! # Overview
//!
//! Duplicate detection runs as a cascade of increasingly expensive
//! comparisons, each stage consuming the grouping the previous one
//! produced and collapsing every group that can no longer contain a
//! duplicate:
//!
//! 1. **Collect** — walk each root directory, producing a per-root file
//!    tree ([`collect_files`])
//! 2. **Size** — group by exact byte size, one stat per file ([`size`])
//! 3. **Sample** — compare a short byte window from each file's midpoint
//!    ([`sample`])
//! 4. **Hash** — stream full content through BLAKE3 and confirm
//!    byte-identical groups ([`hash`])
//!
//! Every stage completes before the next begins; there is no shared
//! mutable state and no concurrency. The [`Pipeline`] driver owns the
//! composition and notifies an injected [`PipelineObserver`] about stage
//! boundaries, which is also how tests verify that the expensive hash
//! stage never sees files the cheap filters already excluded.
//!
//! # Example
//!
//! ```no_run
//! use finddupes::pipeline::{Pipeline, PipelineConfig};
//! use std::path::PathBuf;
//!
//! let pipeline = Pipeline::new(PipelineConfig::default());
//! let outcome = pipeline.run(&[PathBuf::from("/some/dir")]).unwrap();
//! println!("{} duplicate groups", outcome.groups.len());
//! ```

pub mod hash;
pub mod sample;
pub mod size;

use std::path::PathBuf;
use std::sync::Arc;

use bytesize::ByteSize;

use crate::error::ConfigError;
use crate::observer::{LogObserver, PipelineObserver};
use crate::scanner::{Hasher, Walker, DEFAULT_SAMPLE_SIZE};

pub use hash::{group_by_hash, DuplicateGroup, HashStats};
pub use sample::{filter_by_sample, SampleStats, SampleStrategy};
pub use size::{group_by_size, SizeStats};

/// Discovered files, keyed by the root directory they were found under.
///
/// Roots appear in the order they were supplied on the command line and
/// files in the order the walk yielded them; that combined order is the
/// discovery order that decides which member of a duplicate group is
/// treated as the original.
#[derive(Debug, Clone, Default)]
pub struct FileTree {
    roots: Vec<(PathBuf, Vec<PathBuf>)>,
}

impl FileTree {
    /// Create an empty file tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root directory and the files discovered under it.
    pub fn push_root(&mut self, root: PathBuf, files: Vec<PathBuf>) {
        self.roots.push((root, files));
    }

    /// The per-root entries, in insertion order.
    #[must_use]
    pub fn roots(&self) -> &[(PathBuf, Vec<PathBuf>)] {
        &self.roots
    }

    /// Iterate all files across all roots, in discovery order.
    pub fn flatten(&self) -> impl Iterator<Item = &PathBuf> {
        self.roots.iter().flat_map(|(_, files)| files.iter())
    }

    /// Total number of discovered files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.roots.iter().map(|(_, files)| files.len()).sum()
    }
}

/// Walk every root directory and collect the discovered files per root.
///
/// Walk errors (unreadable directories, entries vanishing mid-walk) are
/// logged and counted, never fatal. The total discovered file count is
/// reported to the log.
#[must_use]
pub fn collect_files(roots: &[PathBuf], observer: &dyn PipelineObserver) -> (FileTree, usize) {
    let mut tree = FileTree::new();
    let mut walk_errors = 0usize;

    for root in roots {
        let walker = Walker::new(root);
        let mut files = Vec::new();
        for entry in walker.walk() {
            match entry {
                Ok(path) => files.push(path),
                Err(e) => {
                    observer.on_file_skipped(&e.to_string());
                    walk_errors += 1;
                }
            }
        }
        tree.push_root(root.clone(), files);
    }

    log::info!("Total files: {}", tree.file_count());

    (tree, walk_errors)
}

/// Configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bytes sampled from each file's midpoint in the sample stage
    pub sample_size: usize,
    /// How the sample stage decides membership within a size group
    pub sample_strategy: SampleStrategy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            sample_strategy: SampleStrategy::default(),
        }
    }
}

impl PipelineConfig {
    /// Set the sample window size.
    #[must_use]
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }

    /// Set the sample grouping strategy.
    #[must_use]
    pub fn with_sample_strategy(mut self, strategy: SampleStrategy) -> Self {
        self.sample_strategy = strategy;
        self
    }
}

/// Summary counters from a completed pipeline run.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Files discovered by the collector
    pub total_files: usize,
    /// Files surviving the size filter
    pub after_size: usize,
    /// Files surviving the sample filter
    pub after_sample: usize,
    /// Confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Duplicates excluding the retained original of each group
    pub excess_files: usize,
    /// Space reclaimable by deleting every duplicate
    pub reclaimable_space: u64,
    /// Recoverable file-level errors swallowed along the way
    pub skipped_files: usize,
}

impl ScanSummary {
    /// Reclaimable space as a human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }
}

/// The result of a pipeline run: confirmed groups plus summary counters.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Confirmed duplicate groups, sorted by digest
    pub groups: Vec<DuplicateGroup>,
    /// Counters describing the run
    pub summary: ScanSummary,
}

/// Sequential driver composing the filtering stages.
///
/// The driver owns the per-run grouping structures and passes them from
/// stage to stage; nothing is shared or mutated concurrently.
pub struct Pipeline {
    config: PipelineConfig,
    observer: Arc<dyn PipelineObserver>,
}

impl Pipeline {
    /// Create a pipeline with the given configuration and the default
    /// log-backed observer.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            observer: Arc::new(LogObserver),
        }
    }

    /// Replace the observer, e.g. with a recording implementation in tests.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run the full pipeline over the given root directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if no roots were supplied or a supplied
    /// root does not exist or is not a directory. These are the only
    /// fatal conditions; everything downstream is recoverable per file.
    pub fn run(&self, roots: &[PathBuf]) -> Result<ScanOutcome, ConfigError> {
        validate_roots(roots)?;

        let hasher = Hasher::new().with_sample_size(self.config.sample_size);
        let mut summary = ScanSummary::default();

        self.observer.on_stage_start("collect", 0);
        let (tree, walk_errors) = collect_files(roots, self.observer.as_ref());
        summary.total_files = tree.file_count();
        summary.skipped_files += walk_errors;
        self.observer.on_stage_end("collect", summary.total_files);

        self.observer.on_stage_start("size", summary.total_files);
        let (size_groups, size_stats) = group_by_size(&tree);
        summary.after_size = size_stats.survivors;
        summary.skipped_files += size_stats.stat_failures;
        self.observer.on_stage_end("size", summary.after_size);

        self.observer.on_stage_start("sample", summary.after_size);
        let (sample_groups, sample_stats) =
            filter_by_sample(size_groups, &hasher, self.config.sample_strategy);
        summary.after_sample = sample_stats.survivors;
        summary.skipped_files += sample_stats.read_failures;
        self.observer.on_stage_end("sample", summary.after_sample);

        let hash_input: usize = sample_groups.values().map(Vec::len).sum();
        self.observer.on_stage_start("hash", hash_input);
        let (groups, hash_stats) = group_by_hash(sample_groups, &hasher);
        summary.duplicate_groups = hash_stats.duplicate_groups;
        summary.excess_files = hash_stats.duplicate_files;
        summary.reclaimable_space = hash_stats.wasted_space;
        summary.skipped_files += hash_stats.read_failures;
        self.observer
            .on_stage_end("hash", hash_stats.duplicate_files);

        log::info!(
            "Scan complete: {} duplicate groups, {} excess files, {} reclaimable",
            summary.duplicate_groups,
            summary.excess_files,
            summary.reclaimable_display()
        );

        Ok(ScanOutcome { groups, summary })
    }
}

/// Check the fatal pre-pipeline conditions.
fn validate_roots(roots: &[PathBuf]) -> Result<(), ConfigError> {
    if roots.is_empty() {
        return Err(ConfigError::NoDirectories);
    }
    for root in roots {
        if !root.exists() {
            return Err(ConfigError::RootNotFound(root.clone()));
        }
        if !root.is_dir() {
            return Err(ConfigError::NotADirectory(root.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &std::path::Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_file_tree_flatten_preserves_root_order() {
        let mut tree = FileTree::new();
        tree.push_root(
            PathBuf::from("/r1"),
            vec![PathBuf::from("/r1/a"), PathBuf::from("/r1/b")],
        );
        tree.push_root(PathBuf::from("/r2"), vec![PathBuf::from("/r2/c")]);

        let flat: Vec<_> = tree.flatten().cloned().collect();
        assert_eq!(
            flat,
            vec![
                PathBuf::from("/r1/a"),
                PathBuf::from("/r1/b"),
                PathBuf::from("/r2/c"),
            ]
        );
        assert_eq!(tree.file_count(), 3);
    }

    #[test]
    fn test_validate_roots_rejects_empty() {
        assert!(matches!(
            validate_roots(&[]),
            Err(ConfigError::NoDirectories)
        ));
    }

    #[test]
    fn test_validate_roots_rejects_missing() {
        let roots = vec![PathBuf::from("/no/such/dir/xyz")];
        assert!(matches!(
            validate_roots(&roots),
            Err(ConfigError::RootNotFound(_))
        ));
    }

    #[test]
    fn test_validate_roots_rejects_file() {
        let dir = TempDir::new().unwrap();
        let file = write_file(dir.path(), "plain.txt", b"x");
        assert!(matches!(
            validate_roots(&[file]),
            Err(ConfigError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_pipeline_finds_duplicate_pair() {
        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "a.txt", b"hello");
        let b = write_file(dir.path(), "b.txt", b"hello");
        write_file(dir.path(), "unique.txt", b"something else entirely");

        let outcome = Pipeline::new(PipelineConfig::default())
            .run(&[dir.path().to_path_buf()])
            .unwrap();

        assert_eq!(outcome.groups.len(), 1);
        assert_eq!(outcome.groups[0].paths(), vec![a, b]);
        assert_eq!(outcome.summary.excess_files, 1);
        assert_eq!(outcome.summary.total_files, 3);
    }

    #[test]
    fn test_pipeline_empty_directory() {
        let dir = TempDir::new().unwrap();

        let outcome = Pipeline::new(PipelineConfig::default())
            .run(&[dir.path().to_path_buf()])
            .unwrap();

        assert!(outcome.groups.is_empty());
        assert_eq!(outcome.summary.total_files, 0);
        assert_eq!(outcome.summary.excess_files, 0);
    }
}
