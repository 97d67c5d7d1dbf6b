//! finddupes - console duplicate file finder.
//!
//! Identifies duplicate files across one or more directory trees with a
//! cascade of increasingly expensive comparisons (size, mid-file byte
//! sample, full BLAKE3 hash), reports each confirmed group, and can
//! optionally remove every copy but the first-discovered one.

pub mod actions;
pub mod cli;
pub mod error;
pub mod logging;
pub mod observer;
pub mod pipeline;
pub mod report;
pub mod scanner;

use std::io;

use cli::Cli;
use pipeline::{Pipeline, PipelineConfig};
use report::Reporter;

/// Run the application logic for parsed CLI arguments.
///
/// # Errors
///
/// Returns an error for fatal configuration problems (no or missing
/// directories) and for failures writing the report to stdout. File-level
/// errors inside the pipeline are logged and skipped, never propagated.
pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = PipelineConfig::default()
        .with_sample_size(cli.sample_size)
        .with_sample_strategy(cli.sample_grouping);

    let outcome = Pipeline::new(config).run(&cli.dirs)?;

    let stdout = io::stdout();
    Reporter::new(stdout.lock()).report(&outcome.groups)?;

    if cli.delete {
        let result = actions::delete_duplicates(&outcome.groups);
        log::info!(
            "Removed {} duplicate files ({} freed)",
            result.deleted.len(),
            bytesize::ByteSize::b(result.bytes_freed)
        );
    }

    Ok(())
}
