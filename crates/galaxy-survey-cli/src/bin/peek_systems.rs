//! Print the first few systems of a galaxy dump as JSON.
//!
//! Usage:
//!   peek-systems galaxy.json
//!   peek-systems galaxy.json --limit 20 --with-stations

use std::path::PathBuf;

use clap::Parser;
use galaxy_survey_cli::{commands, exit_on_error, logging};

#[derive(Parser)]
#[command(version, about = "Print the first systems of a galaxy JSON dump")]
struct Args {
    /// Path to input galaxy JSON file
    input: PathBuf,
    /// Number of systems to read from the start of the dump
    #[arg(short = 'n', long, default_value_t = 4)]
    limit: usize,
    /// Only print systems that have at least one station
    #[arg(long)]
    with_stations: bool,
}

fn main() {
    let args = Args::parse();
    logging::init();
    let systems = exit_on_error(commands::peek_systems(
        &args.input,
        args.limit,
        args.with_stations,
    ));
    let pretty = serde_json::to_string_pretty(&systems).unwrap_or_else(|_| "[]".to_string());
    println!("{pretty}");
}
