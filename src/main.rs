//! Entry point for the finddupes CLI.

use clap::Parser;
use finddupes::cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = finddupes::run_app(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
