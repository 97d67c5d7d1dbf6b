//! Command-line interface definitions for finddupes.
//!
//! All arguments are defined with the clap derive API. The CLI is a thin
//! collaborator around the pipeline: it selects the roots to scan, the
//! log level, and whether confirmed duplicates are deleted afterwards.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates under two directories
//! finddupes ~/Downloads ~/Pictures
//!
//! # Verbose mode with stage survivor counts
//! finddupes -v ~/Downloads
//!
//! # Delete every duplicate, keeping the first-discovered copy
//! finddupes -d ~/Downloads
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::SampleStrategy;
use crate::scanner::DEFAULT_SAMPLE_SIZE;

/// Find duplicate files.
///
/// Scans one or more directory trees, narrows the file set through
/// progressively more expensive comparisons (size, mid-file sample, full
/// BLAKE3 hash), and prints each confirmed duplicate as
/// `<hash> duplicate <path>`.
#[derive(Debug, Parser)]
#[command(name = "finddupes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to search for duplicates
    #[arg(value_name = "DIR", required = true, num_args = 1..)]
    pub dirs: Vec<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Delete found duplicates, keeping the first file of each group
    #[arg(short, long)]
    pub delete: bool,

    /// Bytes to sample from the middle of each file in the pre-filter
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// How the sample filter groups files of equal size
    #[arg(long, value_enum, default_value_t = SampleStrategy::Adjacent)]
    pub sample_grouping: SampleStrategy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_a_directory() {
        assert!(Cli::try_parse_from(["finddupes"]).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["finddupes", "/tmp"]).unwrap();

        assert_eq!(cli.dirs, vec![PathBuf::from("/tmp")]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(!cli.delete);
        assert_eq!(cli.sample_size, DEFAULT_SAMPLE_SIZE);
        assert_eq!(cli.sample_grouping, SampleStrategy::Adjacent);
    }

    #[test]
    fn test_cli_multiple_dirs_and_flags() {
        let cli = Cli::try_parse_from(["finddupes", "-v", "-d", "/a", "/b"]).unwrap();

        assert_eq!(cli.dirs, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(cli.verbose, 1);
        assert!(cli.delete);
    }

    #[test]
    fn test_cli_sample_options() {
        let cli = Cli::try_parse_from([
            "finddupes",
            "--sample-size",
            "16",
            "--sample-grouping",
            "keyed",
            "/tmp",
        ])
        .unwrap();

        assert_eq!(cli.sample_size, 16);
        assert_eq!(cli.sample_grouping, SampleStrategy::Keyed);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["finddupes", "-q", "-v", "/tmp"]).is_err());
    }
}
