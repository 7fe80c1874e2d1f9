//! Per-system statistics extracted from dump records.
//!
//! One [`SystemStats`] row per [`SystemRecord`], field order matching the
//! stats table columns. [`StatsExtractor`] wraps the pure extraction with
//! anomaly reporting and a running summary for whole-dump passes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::occupation::{
    classify_station, detect_occupation_status, OccupationStatus, StationClass, StationTally,
};
use crate::records::{BodyRecord, SystemRecord};
use crate::spatial::{distance_from_sol, Point3};

/// Derived metrics for one system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    pub system_name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub distance_from_sol: f64,
    pub body_count: u32,
    pub landable_count: u32,
    pub ring_count: u32,
    #[serde(deserialize_with = "deserialize_flag")]
    pub has_station: bool,
    pub occupation_status: OccupationStatus,
}

impl SystemStats {
    /// Column names of the stats table, in field order.
    pub const COLUMNS: [&'static str; 10] = [
        "system_name",
        "x",
        "y",
        "z",
        "distance_from_sol",
        "body_count",
        "landable_count",
        "ring_count",
        "has_station",
        "occupation_status",
    ];

    pub fn position(&self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }
}

/// Compute the stats row for one system.
pub fn extract_system_stats(system: &SystemRecord) -> SystemStats {
    stats_with_status(system, detect_occupation_status(&system.stations))
}

fn stats_with_status(system: &SystemRecord, occupation_status: OccupationStatus) -> SystemStats {
    let position = system.position();
    let count = |pred: fn(&BodyRecord) -> bool| {
        system.bodies.iter().filter(|body| pred(body)).count() as u32
    };

    SystemStats {
        system_name: system.name.clone(),
        x: position.x,
        y: position.y,
        z: position.z,
        distance_from_sol: distance_from_sol(position),
        body_count: system.bodies.len() as u32,
        landable_count: count(BodyRecord::is_landable),
        ring_count: count(BodyRecord::has_rings),
        has_station: !system.stations.is_empty(),
        occupation_status,
    }
}

/// Accepts `true`/`false` in any case, `1`/`0`, or a native boolean.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(u64),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(n) => Err(serde::de::Error::custom(format!(
            "invalid boolean `{n}`"
        ))),
        Flag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid boolean `{other}`"
            ))),
        },
    }
}

// ── Whole-dump extraction ───────────────────────────────────────────────

/// Running totals over an extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub systems: usize,
    pub with_stations: usize,
    pub populated: usize,
    /// Indexed by `OccupationStatus as usize`.
    pub by_status: [usize; 4],
    pub unclassified_stations: usize,
    pub stations_without_location: usize,
    /// Dump elements that could not be read as a system and produced no row.
    pub skipped_records: usize,
}

impl ExtractionSummary {
    pub fn count(&self, status: OccupationStatus) -> usize {
        self.by_status[status as usize]
    }
}

/// Extracts stats rows one system at a time, reporting per-station
/// anomalies at `warn` without interrupting the pass.
#[derive(Debug, Default)]
pub struct StatsExtractor {
    summary: ExtractionSummary,
}

impl StatsExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(&mut self, system: &SystemRecord) -> SystemStats {
        let mut tally = StationTally::default();
        for station in &system.stations {
            let class = classify_station(station);
            tally.add(class);
            if class == StationClass::Unclassified {
                log::warn!(
                    "Station {} in system {} matches no classification rule (market id {}, type {:?})",
                    station.label(),
                    system.name,
                    station.market_id_text(),
                    station.station_type.as_deref().unwrap_or(""),
                );
            }
            if !station.has_location() {
                self.summary.stations_without_location += 1;
                log::warn!(
                    "Station {} in system {} has no distanceToArrival, latitude, or longitude",
                    station.label(),
                    system.name,
                );
            }
        }
        self.summary.unclassified_stations += tally.unclassified as usize;

        let stats = stats_with_status(system, tally.status());
        self.summary.systems += 1;
        if stats.has_station {
            self.summary.with_stations += 1;
        }
        if system.is_populated() {
            self.summary.populated += 1;
        }
        self.summary.by_status[stats.occupation_status as usize] += 1;
        stats
    }

    /// Record a dump element at `index` that could not be read as a system.
    pub fn skip_record(&mut self, index: usize, reason: impl fmt::Display) {
        self.summary.skipped_records += 1;
        log::warn!("Skipping dump record {index}: {reason}");
    }

    pub fn summary(&self) -> &ExtractionSummary {
        &self.summary
    }

    pub fn into_summary(self) -> ExtractionSummary {
        self.summary
    }
}
