//! Record types for a galaxy data dump.
//!
//! Mirrors the subset of the Spansh-style dump that the survey needs. Every
//! field except the system name is optional in the source data, so absent
//! values fall back to empty collections or `None`. Unknown fields are
//! ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::spatial::Point3;

/// One star system as it appears in the dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id64: Option<u64>,
    pub name: String,
    /// Galactic coordinates in light years. Missing axes default to 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<Point3>,
    /// 0 means nobody lives here.
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub bodies: Vec<BodyRecord>,
    #[serde(default)]
    pub stations: Vec<StationRecord>,
}

impl SystemRecord {
    /// Position of the system, with an absent `coords` treated as the origin.
    pub fn position(&self) -> Point3 {
        self.coords.unwrap_or_default()
    }

    pub fn is_populated(&self) -> bool {
        self.population > 0
    }
}

/// A planet, moon or star belonging to a system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub body_type: Option<String>,
    #[serde(default, rename = "isLandable", skip_serializing_if = "Option::is_none")]
    pub landable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rings: Option<Vec<RingRecord>>,
}

impl BodyRecord {
    /// Only an explicit `true` counts; absent or `false` does not.
    pub fn is_landable(&self) -> bool {
        self.landable == Some(true)
    }

    /// Whether the body has at least one ring.
    pub fn has_rings(&self) -> bool {
        self.rings.as_ref().is_some_and(|rings| !rings.is_empty())
    }
}

/// A ring around a body. Only its presence matters to the survey.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RingRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ring_type: Option<String>,
}

/// A station, outpost, settlement or construction site within a system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        rename = "marketId",
        alias = "market_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub market_id: Option<MarketId>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub station_type: Option<String>,
    #[serde(
        default,
        rename = "distanceToArrival",
        skip_serializing_if = "Option::is_none"
    )]
    pub distance_to_arrival: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl StationRecord {
    /// Market id as decimal text, or empty when the station has none.
    pub fn market_id_text(&self) -> String {
        self.market_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Station type lower-cased for substring matching.
    pub fn station_type_lower(&self) -> String {
        self.station_type
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
    }

    /// Whether any of distance-to-arrival, latitude or longitude is known.
    pub fn has_location(&self) -> bool {
        self.distance_to_arrival.is_some() || self.latitude.is_some() || self.longitude.is_some()
    }

    /// Name for diagnostics, falling back to the id.
    pub fn label(&self) -> String {
        match (&self.name, self.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("#{id}"),
            (None, None) => "<unnamed>".into(),
        }
    }
}

/// Market identifier. Dumps carry it as a number, hand-edited files
/// sometimes as a string; both compare by their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarketId {
    Number(u64),
    Text(String),
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketId::Number(n) => write!(f, "{n}"),
            MarketId::Text(s) => f.write_str(s),
        }
    }
}
