//! File-level plumbing for the galaxy-survey stages.
//!
//! The pipeline itself lives in `galaxy-survey-logic`. This crate reads
//! dumps and tables from disk, checks their schema, writes results back,
//! and maps every file-level failure onto [`SurveyError`]. Each binary in
//! `src/bin` is a thin wrapper around one function in [`commands`].

pub mod commands;
pub mod dump;
pub mod error;
pub mod logging;
pub mod table;

pub use error::{Result, SurveyError};

/// Print `error: …` to stderr and exit with status 1 on failure.
pub fn exit_on_error<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
