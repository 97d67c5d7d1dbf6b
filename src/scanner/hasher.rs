//! Mid-file sampling and BLAKE3 hashing with streaming support.
//!
//! # Overview
//!
//! The [`Hasher`] struct performs the two kinds of file reads the pipeline
//! needs:
//!
//! - [`Hasher::sample`] reads a short byte window starting at the midpoint
//!   of the file (`offset = size / 2`), used as a cheap pre-filter.
//! - [`Hasher::full_hash`] streams the entire file content through a BLAKE3
//!   hasher in fixed-size chunks, so even very large files are never loaded
//!   into memory at once.
//!
//! # Example
//!
//! ```no_run
//! use finddupes::scanner::{hash_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.full_hash(Path::new("/some/file")).unwrap();
//! println!("{}", hash_to_hex(&digest));
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::HashError;

/// A BLAKE3 digest (32 bytes).
pub type Hash = [u8; 32];

/// Default number of bytes sampled from the middle of each file.
pub const DEFAULT_SAMPLE_SIZE: usize = 8;

/// Buffer size for streaming full-content hashing.
const HASH_BUF_SIZE: usize = 64 * 1024;

/// Convert a hash to its lowercase hexadecimal representation.
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    blake3::Hash::from_bytes(*hash).to_hex().to_string()
}

/// File reader for the sample and hash stages.
#[derive(Debug, Clone)]
pub struct Hasher {
    /// Number of bytes to read from the file midpoint for sampling
    sample_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default sample window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    /// Set the sample window size in bytes.
    ///
    /// A window of zero is clamped to one byte; an empty sample would make
    /// every file in a size group compare equal.
    #[must_use]
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size.max(1);
        self
    }

    /// The configured sample window size.
    #[must_use]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Read the sample window from the midpoint of the file.
    ///
    /// Seeks to `size / 2` (integer division) and reads up to the
    /// configured window length. Files shorter than half a window past
    /// their midpoint yield a short sample; that is fine, since all files
    /// in a size group share the same size and therefore the same sample
    /// length.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn sample(&self, path: &Path, size: u64) -> Result<Vec<u8>, HashError> {
        let mut file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        file.seek(SeekFrom::Start(size / 2))
            .map_err(|e| HashError::from_io(path, e))?;

        let mut sample = Vec::with_capacity(self.sample_size);
        file.take(self.sample_size as u64)
            .read_to_end(&mut sample)
            .map_err(|e| HashError::from_io(path, e))?;
        Ok(sample)
    }

    /// Compute the BLAKE3 digest of the entire file content.
    ///
    /// The content is streamed through the hasher in 64 KiB chunks.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    pub fn full_hash(&self, path: &Path) -> Result<Hash, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let mut reader = BufReader::with_capacity(HASH_BUF_SIZE, file);
        let mut hasher = blake3::Hasher::new();

        let mut buf = [0u8; HASH_BUF_SIZE];
        loop {
            let n = reader
                .read(&mut buf)
                .map_err(|e| HashError::from_io(path, e))?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }

        Ok(*hasher.finalize().as_bytes())
    }
}
