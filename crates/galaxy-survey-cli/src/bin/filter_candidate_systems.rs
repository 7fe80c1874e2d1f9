//! Filter extracted system stats down to colonisation candidates.
//!
//! Usage:
//!   filter-candidate-systems system_stats.csv candidates.csv

use std::path::PathBuf;

use clap::Parser;
use galaxy_survey_cli::{commands, exit_on_error, logging};

#[derive(Parser)]
#[command(about = "Filter systems suitable for colonisation")]
struct Args {
    /// Path to input CSV from extract-system-stats
    input: PathBuf,
    /// Path to output CSV for candidate systems
    output: PathBuf,
}

fn main() {
    let args = Args::parse();
    logging::init();
    exit_on_error(commands::filter_candidate_systems(&args.input, &args.output));
}
