//! Streaming reader for galaxy dumps.
//!
//! Dumps are a single JSON array that can run to many gigabytes, so records
//! are deserialized one at a time and handed to a callback instead of being
//! collected. The callback may stop early; the rest of the array is then
//! skipped without being materialised.
//!
//! [`for_each_parsed`] reads each element as plain JSON first, so one record
//! of the wrong shape is reported to the caller instead of failing the file.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::marker::PhantomData;
use std::ops::ControlFlow;
use std::path::Path;

use serde::de::{DeserializeOwned, IgnoredAny, SeqAccess, Visitor};
use serde::Deserializer as _;
use serde_json::Value;

use crate::error::{Result, SurveyError};

/// Feed each element of the JSON array in `path` to `on_record`, in order.
///
/// Returns the number of records delivered. Fails with
/// [`SurveyError::InputFormat`] if the file is missing, is not a JSON
/// array, or any element does not deserialize as `T`.
pub fn for_each_record<T, F>(path: &Path, on_record: F) -> Result<usize>
where
    T: DeserializeOwned,
    F: FnMut(T) -> ControlFlow<()>,
{
    let file = File::open(path).map_err(|e| SurveyError::input_format(path, e))?;
    let mut de = serde_json::Deserializer::from_reader(BufReader::new(file));
    let delivered = (&mut de)
        .deserialize_seq(RecordVisitor {
            on_record,
            _record: PhantomData,
        })
        .map_err(|e| SurveyError::input_format(path, e))?;
    de.end().map_err(|e| SurveyError::input_format(path, e))?;
    Ok(delivered)
}

/// Feed each element of the JSON array in `path` to `on_record` along with
/// its position, as either a parsed `T` or the reason it did not parse.
///
/// Only file-level problems fail the read: a missing file, invalid JSON, or
/// a top-level value that is not an array. Returns the number of elements
/// delivered, parsed or not.
pub fn for_each_parsed<T, F>(path: &Path, mut on_record: F) -> Result<usize>
where
    T: DeserializeOwned,
    F: FnMut(usize, serde_json::Result<T>) -> ControlFlow<()>,
{
    let mut position = 0;
    for_each_record(path, |element: Value| {
        let index = position;
        position += 1;
        on_record(index, serde_json::from_value(element))
    })
}

/// Collect every record of the dump.
pub fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut records = Vec::new();
    for_each_record(path, |record: T| {
        records.push(record);
        ControlFlow::Continue(())
    })?;
    Ok(records)
}

struct RecordVisitor<T, F> {
    on_record: F,
    _record: PhantomData<fn() -> T>,
}

impl<'de, T, F> Visitor<'de> for RecordVisitor<T, F>
where
    T: DeserializeOwned,
    F: FnMut(T) -> ControlFlow<()>,
{
    type Value = usize;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON array of system records")
    }

    fn visit_seq<A>(mut self, mut seq: A) -> std::result::Result<usize, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut delivered = 0;
        while let Some(record) = seq.next_element::<T>()? {
            delivered += 1;
            if (self.on_record)(record).is_break() {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                break;
            }
        }
        Ok(delivered)
    }
}
