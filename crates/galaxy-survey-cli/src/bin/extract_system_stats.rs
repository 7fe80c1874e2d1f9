//! Extract per-system stats from a galaxy JSON dump.
//!
//! Usage:
//!   extract-system-stats galaxy.json system_stats.csv

use std::path::PathBuf;

use clap::Parser;
use galaxy_survey_cli::{commands, exit_on_error, logging};

#[derive(Parser)]
#[command(about = "Extract system stats from a Spansh galaxy JSON dump")]
struct Args {
    /// Path to input galaxy JSON file
    input: PathBuf,
    /// Path to output CSV file
    output: PathBuf,
}

fn main() {
    let args = Args::parse();
    logging::init();
    exit_on_error(commands::extract_system_stats(&args.input, &args.output));
}
