//! Occupation status of a system, derived from its stations.
//!
//! Each station is classified on its own by market id prefix and type
//! string, then the system status is the highest-priority contribution
//! across all stations:
//!
//! | Station class | Contributes |
//! |---------------|-------------|
//! | Regular | `occupied` |
//! | Colonised marker | `colonised` |
//! | Colonising marker | `colonising` |
//! | Unclassified | nothing |
//!
//! A system without stations is `uncolonised`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::records::StationRecord;

/// Market ids in this range belong to colonisation contacts.
const COLONISED_MARKET_PREFIX: &str = "42";

/// Market ids in these ranges belong to construction sites.
const CONSTRUCTION_MARKET_PREFIXES: [&str; 2] = ["395", "396"];

/// Colonisation ship / beacon type names, e.g. "Planetary Construction Type I".
const CONSTRUCTION_TYPE_MARKER: &str = "construction type";

const CONSTRUCTION_MARKER: &str = "construction";

/// Colonisation state of a system. Ordered by classification priority:
/// a higher variant wins over any lower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccupationStatus {
    Uncolonised,
    Colonising,
    Colonised,
    Occupied,
}

impl OccupationStatus {
    pub const ALL: [OccupationStatus; 4] = [
        Self::Uncolonised,
        Self::Colonising,
        Self::Colonised,
        Self::Occupied,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uncolonised => "uncolonised",
            Self::Colonising => "colonising",
            Self::Colonised => "colonised",
            Self::Occupied => "occupied",
        }
    }
}

impl fmt::Display for OccupationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OccupationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown occupation status `{s}`"))
    }
}

/// Classification of a single station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationClass {
    /// Colonisation contact or construction-type vessel.
    Colonised,
    /// Construction site still being built.
    Colonising,
    /// Anything else: an established station.
    Regular,
    /// Construction-range market id without a construction type. Counted in
    /// no bucket.
    Unclassified,
}

impl StationClass {
    /// The system status this station alone implies, if any.
    pub fn contribution(self) -> Option<OccupationStatus> {
        match self {
            Self::Colonised => Some(OccupationStatus::Colonised),
            Self::Colonising => Some(OccupationStatus::Colonising),
            Self::Regular => Some(OccupationStatus::Occupied),
            Self::Unclassified => None,
        }
    }
}

/// Classify one station. Rules are tested in order; the first match wins.
pub fn classify_station(station: &StationRecord) -> StationClass {
    let market_id = station.market_id_text();
    let station_type = station.station_type_lower();

    if market_id.starts_with(COLONISED_MARKET_PREFIX)
        || station_type.contains(CONSTRUCTION_TYPE_MARKER)
    {
        StationClass::Colonised
    } else if CONSTRUCTION_MARKET_PREFIXES
        .iter()
        .any(|prefix| market_id.starts_with(prefix))
    {
        if station_type.contains(CONSTRUCTION_MARKER) {
            StationClass::Colonising
        } else {
            StationClass::Unclassified
        }
    } else {
        StationClass::Regular
    }
}

/// Occupation status of a system with the given stations.
pub fn detect_occupation_status(stations: &[StationRecord]) -> OccupationStatus {
    stations
        .iter()
        .filter_map(|station| classify_station(station).contribution())
        .max()
        .unwrap_or(OccupationStatus::Uncolonised)
}

/// Per-class station counts for one system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StationTally {
    pub colonised: u32,
    pub colonising: u32,
    pub regular: u32,
    pub unclassified: u32,
}

impl StationTally {
    pub fn from_stations(stations: &[StationRecord]) -> Self {
        let mut tally = Self::default();
        for station in stations {
            tally.add(classify_station(station));
        }
        tally
    }

    pub fn add(&mut self, class: StationClass) {
        match class {
            StationClass::Colonised => self.colonised += 1,
            StationClass::Colonising => self.colonising += 1,
            StationClass::Regular => self.regular += 1,
            StationClass::Unclassified => self.unclassified += 1,
        }
    }

    /// Same result as [`detect_occupation_status`] over the same stations.
    pub fn status(&self) -> OccupationStatus {
        if self.regular > 0 {
            OccupationStatus::Occupied
        } else if self.colonised > 0 {
            OccupationStatus::Colonised
        } else if self.colonising > 0 {
            OccupationStatus::Colonising
        } else {
            OccupationStatus::Uncolonised
        }
    }
}
