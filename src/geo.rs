//! Coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a coordinate from possibly-missing parts.
    ///
    /// Upstream data uses `0.0` (and `null`) to mean "unknown", so a part that
    /// is missing, zero, or non-finite yields `None`. A real point on the
    /// equator or prime meridian is therefore not representable here.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        let present = |v: f64| v.is_finite() && v != 0.0;
        match (lat, lon) {
            (Some(lat), Some(lon)) if present(lat) && present(lon) => Some(Self { lat, lon }),
            _ => None,
        }
    }
}

/// Haversine distance between two points, in kilometres.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + a.lat.to_radians().cos()
            * b.lat.to_radians().cos()
            * (d_lon / 2.0).sin()
            * (d_lon / 2.0).sin();
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
