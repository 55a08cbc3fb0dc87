//! Vehicle identity, position reports and the live marker entity.

use crate::geo::{project_lon_lat, ProjectedPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a physical vehicle across updates.
///
/// This is the primary key of the marker set: at most one marker exists
/// per id at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleId(pub i64);

impl VehicleId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One position report for one vehicle, as carried by the feed.
///
/// `(lat, lon) == (0, 0)` is the producer's sentinel for "no fix
/// available"; such entries neither create nor update markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionUpdate {
    pub id: VehicleId,
    /// Route label (e.g. "5", "21A").
    pub line: String,
    pub lat: f64,
    pub lon: f64,
    /// Vehicle kind discriminator from the producer.
    #[serde(rename = "type")]
    pub kind: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<i64>,
}

impl PositionUpdate {
    /// False for the (0, 0) "position unknown" sentinel.
    pub fn has_fix(&self) -> bool {
        !(self.lat == 0.0 && self.lon == 0.0)
    }

    /// Project into map-display coordinates.
    pub fn projected(&self) -> ProjectedPoint {
        project_lon_lat(self.lon, self.lat)
    }
}

/// The live entity for one tracked vehicle.
///
/// Markers are owned exclusively by the reconciler; view components only
/// read them. The position is always the most recent non-sentinel
/// coordinate received for this id, already projected.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: VehicleId,
    pub line: String,
    pub position: ProjectedPoint,
    pub updated_at: DateTime<Utc>,
    pub icon_scale: f32,
}
