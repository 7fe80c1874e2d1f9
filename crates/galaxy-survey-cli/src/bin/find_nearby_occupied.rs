//! Keep candidates within 15 ly of an occupied system, annotated with the
//! occupied systems in range.
//!
//! Usage:
//!   find-nearby-occupied candidates.csv system_stats.csv nearby.csv

use std::path::PathBuf;

use clap::Parser;
use galaxy_survey_cli::{commands, exit_on_error, logging};

#[derive(Parser)]
#[command(about = "Find colonisation candidates near occupied systems with sources")]
struct Args {
    /// CSV with candidate systems
    candidates: PathBuf,
    /// CSV with all system stats
    systems: PathBuf,
    /// Output CSV path
    output: PathBuf,
}

fn main() {
    let args = Args::parse();
    logging::init();
    exit_on_error(commands::find_nearby_occupied(
        &args.candidates,
        &args.systems,
        &args.output,
    ));
}
