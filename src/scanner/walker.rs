//! Directory walker built on walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a single
//! directory tree and yielding every regular file found under it. The walk
//! is strictly sequential; entries within each directory are sorted by file
//! name so that discovery order is stable across runs, which matters because
//! the first-discovered member of a duplicate group is the one retained when
//! duplicates are deleted.
//!
//! Unreadable directories and files that vanish mid-walk are yielded as
//! [`ScanError`] values rather than aborting the traversal.
//!
//! # Example
//!
//! ```no_run
//! use finddupes::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"));
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::ScanError;

/// Sequential directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
}

impl Walker {
    /// Create a new walker for the given root directory.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Walk the directory tree, yielding discovered file paths.
    ///
    /// Returns an iterator over `Result<PathBuf, ScanError>`. Errors are
    /// yielded inline rather than stopping iteration. Symbolic links are
    /// not followed; only regular files are yielded.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    // Only regular files participate; directories and
                    // symlinks are traversal machinery, not candidates.
                    if !entry.file_type().is_file() {
                        if entry.file_type().is_symlink() {
                            log::trace!("Skipping symlink: {}", entry.path().display());
                        }
                        return None;
                    }
                    Some(Ok(entry.into_path()))
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    log::warn!("Walker error for {}: {}", path.display(), e);
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("walk loop detected"));
                    Some(Err(ScanError::from_io(path, source)))
                }
            })
    }
}
