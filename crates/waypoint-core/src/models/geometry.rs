//! Geographic value types shared by all waypoint crates.
//!
//! GeoJSON stores positions as `[longitude, latitude]`; these types always
//! carry latitude first so call sites never have to remember the swap.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS 84 position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Create a point from a GeoJSON position (`[lon, lat, ...]`)
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lon, lat, ..] => Some(Self::new(*lat, *lon)),
            _ => None,
        }
    }

    /// GeoJSON position for this point
    pub fn to_position(&self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }

    /// Both coordinates are finite and inside the geographic ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// An arrow drawn on the map: where the goal is and which way it faces
///
/// Only the first and last vertex of the drawn line are kept. A zero-length
/// arrow (`start == end`) is valid and faces north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowFeature {
    pub start: GeoPoint,
    pub end: GeoPoint,
}

impl ArrowFeature {
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        Self { start, end }
    }

    /// Build an arrow from a GeoJSON line's positions
    pub fn from_positions(positions: &[Vec<f64>]) -> Option<Self> {
        if positions.len() < 2 {
            return None;
        }
        let start = GeoPoint::from_position(positions.first()?)?;
        let end = GeoPoint::from_position(positions.last()?)?;
        Some(Self::new(start, end))
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}
