//! Web Mercator projection (EPSG:3857).
//!
//! Markers store coordinates only in projected form; the projection runs
//! once, when a position update is ingested. Raw lon/lat is never retained.

use serde::{Deserialize, Serialize};

/// WGS84 semi-major axis in meters.
const WGS84_A: f64 = 6_378_137.0;

/// Latitudes beyond this cannot be represented in Web Mercator.
const MAX_LAT_DEG: f64 = 85.051_128_78;

/// A point in EPSG:3857 (Web Mercator) meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Project a WGS84 lon/lat pair into Web Mercator meters.
///
/// Latitude is clamped to the Mercator domain.
pub fn project_lon_lat(lon_deg: f64, lat_deg: f64) -> ProjectedPoint {
    let x = WGS84_A * lon_deg.to_radians();
    let lat = lat_deg.clamp(-MAX_LAT_DEG, MAX_LAT_DEG).to_radians();
    let y = WGS84_A * (0.5 * (std::f64::consts::FRAC_PI_2 + lat)).tan().ln();
    ProjectedPoint::new(x, y)
}
