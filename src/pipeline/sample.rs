//! Mid-file sample filtering, the second stage.
//!
//! # Overview
//!
//! Within each size group, a short byte window is read from the midpoint of
//! every file and used as a cheap discriminator before full hashing. Two
//! grouping strategies are available:
//!
//! - [`SampleStrategy::Adjacent`] reproduces the historical behavior: a
//!   file is kept when its sample equals the sample of the *immediately
//!   preceding* file in the group, or when it is the first file in the
//!   group. This is not a true partition by sample value; files with
//!   identical samples can be dropped if a differing file sits between
//!   them. It is the default because downstream consumers may depend on
//!   the exact survivor set.
//! - [`SampleStrategy::Keyed`] buckets by the literal sample bytes, the
//!   same way the size and hash stages bucket by their keys, and keeps
//!   every file whose sample occurs at least twice in its size group.
//!
//! Either way the output stays keyed by size; the sample only decides
//! membership within each size group. A file whose sample cannot be read
//! is dropped from its group with a log entry.

use std::collections::HashMap;

use clap::ValueEnum;

use crate::scanner::{FileEntry, Hasher};

/// How the sample filter decides membership within a size group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleStrategy {
    /// Compare each file's sample against the immediately preceding file
    /// (historical behavior, chain-based).
    Adjacent,
    /// Bucket files by literal sample value (proper keyed grouping).
    Keyed,
}

impl Default for SampleStrategy {
    fn default() -> Self {
        Self::Adjacent
    }
}

/// Statistics from the sample filtering stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleStats {
    /// Files that entered the stage
    pub input_files: usize,
    /// Files dropped because their sample could not be read
    pub read_failures: usize,
    /// Files remaining after the filter
    pub survivors: usize,
    /// Size groups remaining after the filter
    pub surviving_groups: usize,
}

/// Filter size groups by a byte sample read from each file's midpoint.
///
/// Size groups whose survivor set shrinks below two members are dropped
/// entirely. Survivor order within each group is the input order.
#[must_use]
pub fn filter_by_sample(
    size_groups: HashMap<u64, Vec<FileEntry>>,
    hasher: &Hasher,
    strategy: SampleStrategy,
) -> (HashMap<u64, Vec<FileEntry>>, SampleStats) {
    let mut stats = SampleStats {
        input_files: size_groups.values().map(Vec::len).sum(),
        ..Default::default()
    };

    let mut filtered: HashMap<u64, Vec<FileEntry>> = HashMap::new();

    for (size, files) in size_groups {
        let survivors = match strategy {
            SampleStrategy::Adjacent => chain_by_adjacent_sample(files, hasher, &mut stats),
            SampleStrategy::Keyed => bucket_by_sample_value(files, hasher, &mut stats),
        };

        if survivors.len() > 1 {
            stats.survivors += survivors.len();
            stats.surviving_groups += 1;
            log::debug!("Sample group {} bytes: {} candidates", size, survivors.len());
            filtered.insert(size, survivors);
        } else {
            log::trace!("Sample filter collapsed size group {} bytes", size);
        }
    }

    log::info!("Files after chunk checking: {}", stats.survivors);

    (filtered, stats)
}

/// Historical adjacency chaining: keep a file when its sample matches the
/// previous file's sample, or when it starts the chain.
///
/// The previous sample is updated after every successful read, including
/// for files that are not kept. A file whose sample cannot be read is
/// dropped and leaves the chain state untouched.
fn chain_by_adjacent_sample(
    files: Vec<FileEntry>,
    hasher: &Hasher,
    stats: &mut SampleStats,
) -> Vec<FileEntry> {
    let mut survivors = Vec::new();
    let mut prev_sample: Option<Vec<u8>> = None;

    for file in files {
        let sample = match hasher.sample(&file.path, file.size) {
            Ok(sample) => sample,
            Err(e) => {
                log::warn!("Could not sample {}: {}", file.path.display(), e);
                stats.read_failures += 1;
                continue;
            }
        };

        if prev_sample.as_deref().is_none_or(|prev| prev == sample) {
            survivors.push(file);
        }
        prev_sample = Some(sample);
    }

    survivors
}

/// Keyed grouping: keep every file whose sample value occurs at least
/// twice within the size group, preserving input order.
fn bucket_by_sample_value(
    files: Vec<FileEntry>,
    hasher: &Hasher,
    stats: &mut SampleStats,
) -> Vec<FileEntry> {
    let mut sampled: Vec<(FileEntry, Vec<u8>)> = Vec::with_capacity(files.len());
    let mut counts: HashMap<Vec<u8>, usize> = HashMap::new();

    for file in files {
        match hasher.sample(&file.path, file.size) {
            Ok(sample) => {
                *counts.entry(sample.clone()).or_default() += 1;
                sampled.push((file, sample));
            }
            Err(e) => {
                log::warn!("Could not sample {}: {}", file.path.display(), e);
                stats.read_failures += 1;
            }
        }
    }

    sampled
        .into_iter()
        .filter(|(_, sample)| counts[sample] > 1)
        .map(|(file, _)| file)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> FileEntry {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content).unwrap();
        FileEntry::new(path, content.len() as u64)
    }

    fn one_group(size: u64, files: Vec<FileEntry>) -> HashMap<u64, Vec<FileEntry>> {
        let mut groups = HashMap::new();
        groups.insert(size, files);
        groups
    }

    #[test]
    fn test_adjacent_keeps_matching_pair() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.bin", b"same-content-123");
        let b = write_file(&dir, "b.bin", b"same-content-123");

        let (groups, stats) = filter_by_sample(
            one_group(16, vec![a.clone(), b.clone()]),
            &Hasher::new(),
            SampleStrategy::Adjacent,
        );

        assert_eq!(groups[&16], vec![a, b]);
        assert_eq!(stats.survivors, 2);
    }

    #[test]
    fn test_adjacent_drops_group_when_samples_differ() {
        let dir = TempDir::new().unwrap();
        // Same size, different middles
        let a = write_file(&dir, "a.bin", b"AAAAAAAAAAAAAAAA");
        let b = write_file(&dir, "b.bin", b"BBBBBBBBBBBBBBBB");

        let (groups, stats) = filter_by_sample(
            one_group(16, vec![a, b]),
            &Hasher::new(),
            SampleStrategy::Adjacent,
        );

        // Only the chain-starting file survives, so the group collapses
        assert!(groups.is_empty());
        assert_eq!(stats.survivors, 0);
    }

    /// Pins the historical adjacency behavior: with samples X, Y, X the
    /// third file is dropped even though its sample matches the first,
    /// because only the immediately preceding sample is consulted.
    #[test]
    fn test_adjacent_x_y_x_chain() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.bin", b"XXXXXXXXXXXXXXXX");
        let b = write_file(&dir, "b.bin", b"YYYYYYYYYYYYYYYY");
        let c = write_file(&dir, "c.bin", b"XXXXXXXXXXXXXXXX");

        let (groups, _) = filter_by_sample(
            one_group(16, vec![a, b, c]),
            &Hasher::new(),
            SampleStrategy::Adjacent,
        );

        // a starts the chain and survives; b mismatches a; c mismatches b.
        // One survivor means the whole group collapses.
        assert!(groups.is_empty());
    }

    /// The keyed strategy regroups the same X, Y, X input correctly:
    /// both X files survive, the lone Y is dropped.
    #[test]
    fn test_keyed_x_y_x_buckets() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.bin", b"XXXXXXXXXXXXXXXX");
        let b = write_file(&dir, "b.bin", b"YYYYYYYYYYYYYYYY");
        let c = write_file(&dir, "c.bin", b"XXXXXXXXXXXXXXXX");

        let (groups, stats) = filter_by_sample(
            one_group(16, vec![a.clone(), b, c.clone()]),
            &Hasher::new(),
            SampleStrategy::Keyed,
        );

        assert_eq!(groups[&16], vec![a, c]);
        assert_eq!(stats.survivors, 2);
    }

    #[test]
    fn test_unreadable_file_dropped_from_group() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.bin", b"same-content-123");
        let b = write_file(&dir, "b.bin", b"same-content-123");
        let ghost = FileEntry::new(PathBuf::from("/no/such/file"), 16);

        let (groups, stats) = filter_by_sample(
            one_group(16, vec![a.clone(), ghost, b.clone()]),
            &Hasher::new(),
            SampleStrategy::Adjacent,
        );

        assert_eq!(groups[&16], vec![a, b]);
        assert_eq!(stats.read_failures, 1);
    }

    #[test]
    fn test_singleton_group_collapses() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.bin", b"lonely");

        let (groups, _) = filter_by_sample(
            one_group(6, vec![a]),
            &Hasher::new(),
            SampleStrategy::Keyed,
        );

        assert!(groups.is_empty());
    }
}
