//! Error taxonomy for the survey stages.
//!
//! Every variant is fatal for the run. Per-record anomalies are not errors;
//! they are logged and the run continues.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurveyError {
    /// Input missing, unreadable, or not valid JSON/CSV for its stage.
    #[error("input format error in {}: {reason}", .path.display())]
    InputFormat { path: PathBuf, reason: String },

    /// Input table lacks a column the stage needs.
    #[error("schema mismatch in {}: missing column `{column}`", .path.display())]
    SchemaMismatch { path: PathBuf, column: String },

    /// Output could not be created or written.
    #[error("cannot write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SurveyError {
    pub fn input_format(path: &Path, reason: impl ToString) -> Self {
        Self::InputFormat {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn schema_mismatch(path: &Path, column: &str) -> Self {
        Self::SchemaMismatch {
            path: path.to_path_buf(),
            column: column.to_string(),
        }
    }

    pub fn output(path: &Path, source: impl Into<io::Error>) -> Self {
        Self::Output {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_file() {
        let e = SurveyError::input_format(Path::new("galaxy.json"), "expected `[`");
        assert_eq!(
            e.to_string(),
            "input format error in galaxy.json: expected `[`"
        );

        let e = SurveyError::schema_mismatch(Path::new("stats.csv"), "occupation_status");
        assert_eq!(
            e.to_string(),
            "schema mismatch in stats.csv: missing column `occupation_status`"
        );
    }

    #[test]
    fn test_output_keeps_source() {
        let e = SurveyError::output(
            Path::new("out.csv"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(e.to_string().starts_with("cannot write out.csv"));
        assert!(std::error::Error::source(&e).is_some());
    }
}
