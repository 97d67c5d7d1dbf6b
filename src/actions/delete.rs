//! Deletion of confirmed duplicate files.
//!
//! # Overview
//!
//! For every confirmed group the first-discovered member is the original
//! and is always retained; the remaining members are removed from disk.
//! A failed deletion is logged and counted but never stops the batch:
//! the remaining members of the group and all remaining groups are still
//! attempted.
//!
//! Deletion is irreversible. Any confirmation step belongs to the CLI
//! layer, not here.
//!
//! # Example
//!
//! ```no_run
//! use finddupes::actions::delete_duplicates;
//! use finddupes::pipeline::DuplicateGroup;
//!
//! let groups: Vec<DuplicateGroup> = vec![];
//! let result = delete_duplicates(&groups);
//! println!("removed {} files", result.deleted.len());
//! ```

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::DuplicateGroup;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved since the scan).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    fn from_io(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }
}

/// Results of a batch deletion over all duplicate groups.
#[derive(Debug, Default)]
pub struct BatchDeleteResult {
    /// Paths successfully removed
    pub deleted: Vec<PathBuf>,
    /// Failed deletions with their errors
    pub failures: Vec<(PathBuf, DeleteError)>,
    /// Total bytes freed
    pub bytes_freed: u64,
}

impl BatchDeleteResult {
    /// Whether every attempted deletion succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Delete every member of each group except the first-discovered one.
///
/// Logs which paths were removed on behalf of which retained original.
/// Per-file failures are collected in the result rather than propagated.
#[must_use]
pub fn delete_duplicates(groups: &[DuplicateGroup]) -> BatchDeleteResult {
    let mut result = BatchDeleteResult::default();

    for group in groups {
        // Defensive: a group below two members has nothing to delete and
        // no meaningful original/duplicate split.
        if group.len() < 2 {
            continue;
        }

        log::info!(
            "Deleting dupes of [{}]: {}",
            group.original().path.display(),
            group
                .duplicates()
                .iter()
                .map(|f| f.path.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        for file in group.duplicates() {
            match fs::remove_file(&file.path) {
                Ok(()) => {
                    result.deleted.push(file.path.clone());
                    result.bytes_freed += file.size;
                }
                Err(e) => {
                    let err = DeleteError::from_io(file.path.clone(), e);
                    log::warn!("Could not delete {}: {}", file.path.display(), err);
                    result.failures.push((file.path.clone(), err));
                }
            }
        }
    }

    if !result.failures.is_empty() {
        log::warn!(
            "Deleted {} files, {} failed",
            result.deleted.len(),
            result.failures.len()
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileEntry;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> FileEntry {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(content).unwrap();
        FileEntry::new(path, content.len() as u64)
    }

    #[test]
    fn test_delete_keeps_original() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.txt", b"hello");
        let b = write_file(&dir, "b.txt", b"hello");
        let c = write_file(&dir, "c.txt", b"hello");

        let group = DuplicateGroup::new([0u8; 32], 5, vec![a.clone(), b.clone(), c.clone()]);
        let result = delete_duplicates(&[group]);

        assert!(a.path.exists());
        assert!(!b.path.exists());
        assert!(!c.path.exists());
        assert_eq!(result.deleted, vec![b.path, c.path]);
        assert_eq!(result.bytes_freed, 10);
        assert!(result.is_complete());
    }

    #[test]
    fn test_delete_continues_past_failure() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.txt", b"hello");
        let ghost = FileEntry::new(dir.path().join("gone.txt"), 5);
        let b = write_file(&dir, "b.txt", b"hello");

        let group = DuplicateGroup::new([0u8; 32], 5, vec![a.clone(), ghost.clone(), b.clone()]);
        let result = delete_duplicates(&[group]);

        // The missing file fails, the one after it is still removed
        assert!(!b.path.exists());
        assert_eq!(result.deleted, vec![b.path]);
        assert_eq!(result.failures.len(), 1);
        assert!(matches!(result.failures[0].1, DeleteError::NotFound(_)));
        assert!(!result.is_complete());
    }

    #[test]
    fn test_delete_skips_undersized_group() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.txt", b"hello");

        let group = DuplicateGroup::new([0u8; 32], 5, vec![a.clone()]);
        let result = delete_duplicates(&[group]);

        assert!(a.path.exists());
        assert!(result.deleted.is_empty());
    }
}
