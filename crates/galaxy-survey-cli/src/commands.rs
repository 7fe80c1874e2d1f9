//! One function per CLI stage. Each reads its inputs, runs the pure
//! pipeline step, and writes its output, logging row counts at `info`.

use std::ops::ControlFlow;
use std::path::Path;

use galaxy_survey_logic::candidates::{filter_candidates, FilterCriteria};
use galaxy_survey_logic::occupation::OccupationStatus;
use galaxy_survey_logic::proximity::{find_nearby_with_sources, NearbyCandidate, ProximityConfig};
use galaxy_survey_logic::records::SystemRecord;
use galaxy_survey_logic::stats::{ExtractionSummary, StatsExtractor, SystemStats};
use serde_json::Value;

use crate::dump;
use crate::error::Result;
use crate::table;

/// Stats Extractor: galaxy JSON dump → stats CSV.
///
/// Elements that are not readable systems are logged and skipped; only a
/// missing or unparsable file fails the run.
pub fn extract_system_stats(input: &Path, output: &Path) -> Result<ExtractionSummary> {
    let mut extractor = StatsExtractor::new();
    let mut rows = Vec::new();
    dump::for_each_parsed(input, |index, parsed: serde_json::Result<SystemRecord>| {
        match parsed {
            Ok(system) => rows.push(extractor.extract(&system)),
            Err(e) => extractor.skip_record(index, e),
        }
        ControlFlow::Continue(())
    })?;

    table::write_table(output, &SystemStats::COLUMNS, &rows)?;

    let summary = extractor.into_summary();
    log::info!(
        "Extracted {} systems ({} with stations, {} populated) to {}",
        summary.systems,
        summary.with_stations,
        summary.populated,
        output.display()
    );
    for status in OccupationStatus::ALL {
        log::info!("  {status}: {}", summary.count(status));
    }
    if summary.skipped_records > 0 {
        log::warn!("{} dump records skipped as unreadable", summary.skipped_records);
    }
    if summary.unclassified_stations > 0 {
        log::warn!(
            "{} stations matched no classification rule",
            summary.unclassified_stations
        );
    }
    Ok(summary)
}

/// Candidate Filter: stats CSV → candidates CSV (same schema).
pub fn filter_candidate_systems(input: &Path, output: &Path) -> Result<Vec<SystemStats>> {
    let rows: Vec<SystemStats> = table::read_table(input, &SystemStats::COLUMNS)?;
    let total = rows.len();
    let candidates = filter_candidates(rows, &FilterCriteria::default());

    table::write_table(output, &SystemStats::COLUMNS, &candidates)?;
    log::info!(
        "Kept {} of {} systems as candidates in {}",
        candidates.len(),
        total,
        output.display()
    );
    Ok(candidates)
}

/// Proximity Joiner: candidates CSV + all-systems CSV → nearby CSV.
pub fn find_nearby_occupied(
    candidates: &Path,
    systems: &Path,
    output: &Path,
) -> Result<Vec<NearbyCandidate>> {
    let candidate_rows: Vec<SystemStats> = table::read_table(candidates, &SystemStats::COLUMNS)?;
    let all_rows: Vec<SystemStats> = table::read_table(systems, &SystemStats::COLUMNS)?;

    let nearby = find_nearby_with_sources(&candidate_rows, &all_rows, &ProximityConfig::default());

    table::write_table(output, &NearbyCandidate::COLUMNS, &nearby)?;
    log::info!(
        "{} of {} candidates lie near occupied systems; written to {}",
        nearby.len(),
        candidate_rows.len(),
        output.display()
    );
    Ok(nearby)
}

/// Dump preview: the first `limit` raw records, optionally only those
/// with at least one station.
pub fn peek_systems(input: &Path, limit: usize, with_stations: bool) -> Result<Vec<Value>> {
    let mut taken = Vec::new();
    if limit == 0 {
        return Ok(taken);
    }
    dump::for_each_record(input, |system: Value| {
        taken.push(system);
        if taken.len() < limit {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    })?;

    if with_stations {
        taken.retain(has_stations);
    }
    Ok(taken)
}

fn has_stations(system: &Value) -> bool {
    system
        .get("stations")
        .and_then(Value::as_array)
        .is_some_and(|stations| !stations.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_has_stations() {
        assert!(has_stations(&json!({"stations": [{"name": "Port"}]})));
        assert!(!has_stations(&json!({"stations": []})));
        assert!(!has_stations(&json!({"stations": null})));
        assert!(!has_stations(&json!({"name": "Empty"})));
    }
}
