//! Logging initialization for the finddupes binary.
//!
//! This module wires the `log` facade to the `env_logger` backend.
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `--verbose` (info and below)
//! 3. Default: warnings and errors only
//!
//! Informational lines such as total file counts and stage survivor
//! counts sit at info level, so they only appear with `-v`; the stdout
//! duplicate report is never routed through the log.
//!
//! # Example
//!
//! ```rust,no_run
//! use finddupes::logging::init_logging;
//!
//! // Default: warnings only
//! init_logging(0, false);
//! ```

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Initialize the logging subsystem from CLI verbosity flags.
///
/// Call once at startup, before any logging calls.
///
/// # Priority
///
/// 1. If `RUST_LOG` is set, it takes precedence
/// 2. If `quiet` is true: error level only
/// 3. `-v`: info, `-vv`: debug, `-vvv` and up: trace
/// 4. Default: warn
///
/// # Arguments
///
/// * `verbose` - Verbosity count from the CLI
/// * `quiet` - If true, only show errors (overridden by `RUST_LOG`)
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        let level = if quiet {
            LevelFilter::Error
        } else {
            match verbose {
                0 => LevelFilter::Warn,
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        };
        builder.filter_level(level);
    }

    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<8} {}",
            buf.timestamp(),
            record.level(),
            record.args()
        )
    });

    // try_init so tests that initialize twice do not panic
    let _ = builder.try_init();
}
