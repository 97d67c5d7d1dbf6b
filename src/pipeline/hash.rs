//! Full-content hashing, the final and most expensive stage.
//!
//! # Overview
//!
//! Every file that survived the cheaper filters has its entire content
//! streamed through BLAKE3. Files are bucketed by digest and singleton
//! buckets are collapsed; what remains are confirmed duplicate groups of
//! byte-identical files.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::{hash_to_hex, FileEntry, Hash, Hasher};

/// A confirmed group of byte-identical files.
///
/// Member order is discovery order; the first member is treated as the
/// original when duplicates are deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// BLAKE3 digest shared by every member
    pub hash: Hash,
    /// File size in bytes, shared by every member
    pub size: u64,
    /// Byte-identical files, in discovery order
    pub files: Vec<FileEntry>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(hash: Hash, size: u64, files: Vec<FileEntry>) -> Self {
        Self { hash, size, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of duplicate copies (total minus the retained original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Space reclaimable by removing every copy but the original.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Digest as a hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash)
    }

    /// The retained original: the first-discovered member.
    #[must_use]
    pub fn original(&self) -> &FileEntry {
        &self.files[0]
    }

    /// The members slated for removal: everything but the original.
    #[must_use]
    pub fn duplicates(&self) -> &[FileEntry] {
        &self.files[1..]
    }

    /// Just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Statistics from the full hash stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashStats {
    /// Files that entered the stage
    pub input_files: usize,
    /// Files successfully hashed
    pub hashed_files: usize,
    /// Files dropped because their content could not be read
    pub read_failures: usize,
    /// Total bytes streamed through the hasher
    pub bytes_hashed: u64,
    /// Confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Confirmed duplicate files (excluding originals)
    pub duplicate_files: usize,
    /// Total reclaimable space across all groups
    pub wasted_space: u64,
}

/// Hash every surviving file in full and group by digest.
///
/// Singleton digest groups are collapsed. The returned groups are sorted
/// by digest so repeated runs over an unchanged tree emit groups in the
/// same order; member order within a group stays discovery order. A file
/// whose content cannot be read is dropped with a log entry.
#[must_use]
pub fn group_by_hash(
    sample_groups: HashMap<u64, Vec<FileEntry>>,
    hasher: &Hasher,
) -> (Vec<DuplicateGroup>, HashStats) {
    let mut stats = HashStats {
        input_files: sample_groups.values().map(Vec::len).sum(),
        ..Default::default()
    };

    let mut hash_groups: HashMap<Hash, Vec<FileEntry>> = HashMap::new();

    // Size groups are independent; iterate sizes in ascending order so
    // that group contents build up deterministically.
    let mut by_size: Vec<(u64, Vec<FileEntry>)> = sample_groups.into_iter().collect();
    by_size.sort_by_key(|(size, _)| *size);

    for (_, files) in by_size {
        for file in files {
            match hasher.full_hash(&file.path) {
                Ok(hash) => {
                    stats.hashed_files += 1;
                    stats.bytes_hashed += file.size;
                    hash_groups.entry(hash).or_default().push(file);
                }
                Err(e) => {
                    log::warn!("Could not hash {}: {}", file.path.display(), e);
                    stats.read_failures += 1;
                }
            }
        }
    }

    let mut groups: Vec<DuplicateGroup> = hash_groups
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(hash, files)| {
            let size = files[0].size;
            log::debug!(
                "Duplicate group {}: {} files, {} bytes each",
                hash_to_hex(&hash),
                files.len(),
                size
            );
            DuplicateGroup::new(hash, size, files)
        })
        .collect();

    groups.sort_by(|a, b| a.hash.cmp(&b.hash));

    stats.duplicate_groups = groups.len();
    stats.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
    stats.wasted_space = groups.iter().map(DuplicateGroup::wasted_space).sum();

    (groups, stats)
}
