//! CSV tables with header checks.
//!
//! Tables are read by column name, so extra columns and any column order
//! are accepted; a missing required column is a [`SurveyError::SchemaMismatch`]
//! before any row is parsed. Written tables always carry a header row, even
//! when empty.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, SurveyError};

/// Read every row of the CSV at `path`, requiring each of `columns`.
pub fn read_table<T: DeserializeOwned>(path: &Path, columns: &[&str]) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| SurveyError::input_format(path, e))?;
    let headers = reader
        .headers()
        .map_err(|e| SurveyError::input_format(path, e))?
        .clone();

    if let Some(missing) = columns
        .iter()
        .find(|column| !headers.iter().any(|header| header == **column))
    {
        return Err(SurveyError::schema_mismatch(path, missing));
    }

    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            // Line 1 is the header.
            row.map_err(|e| SurveyError::input_format(path, format!("line {}: {e}", i + 2)))
        })
        .collect()
}

/// Write `rows` to `path` under a header of `columns`.
///
/// `columns` must list the serialized fields of `T` in declaration order.
pub fn write_table<T: Serialize>(path: &Path, columns: &[&str], rows: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| SurveyError::output(path, e))?;
    writer
        .write_record(columns)
        .map_err(|e| SurveyError::output(path, e))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| SurveyError::output(path, e))?;
    }
    writer.flush().map_err(|e| SurveyError::output(path, e))
}
