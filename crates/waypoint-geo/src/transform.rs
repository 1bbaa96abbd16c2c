//! UTM projection through PROJ

use proj::Proj;
use waypoint_core::error::{Result, WaypointError};
use waypoint_core::models::GeoPoint;

const WGS84: &str = "EPSG:4326";

/// A UTM zone on the WGS 84 datum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtmZone {
    pub number: u8,
    pub north: bool,
}

impl UtmZone {
    pub fn new(number: u8, north: bool) -> Result<Self> {
        if !(1..=60).contains(&number) {
            return Err(WaypointError::conversion(number, "UTM zone must be between 1 and 60"));
        }
        Ok(Self { number, north })
    }

    /// EPSG code of the zone (326xx north, 327xx south)
    pub fn epsg(&self) -> u32 {
        let base = if self.north { 32600 } else { 32700 };
        base + u32::from(self.number)
    }
}

/// A projected UTM position in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmCoordinate {
    pub zone: UtmZone,
    pub easting: f64,
    pub northing: f64,
}

/// Project a geographic point into the given UTM zone
pub fn project(point: GeoPoint, zone: UtmZone) -> Result<UtmCoordinate> {
    let to_crs = format!("EPSG:{}", zone.epsg());
    let proj = create_projection(WGS84, &to_crs)?;

    // Known-CRS projections are normalized to (lon, lat) axis order
    let (easting, northing) = proj
        .convert((point.longitude, point.latitude))
        .map_err(|e| WaypointError::conversion(point, format!("Projection failed: {}", e)))?;

    if !easting.is_finite() || !northing.is_finite() {
        return Err(WaypointError::conversion(point, "Projection produced non-finite values"));
    }

    Ok(UtmCoordinate { zone, easting, northing })
}

/// Convert a UTM position back to geographic coordinates
pub fn unproject(utm: &UtmCoordinate) -> Result<GeoPoint> {
    let from_crs = format!("EPSG:{}", utm.zone.epsg());
    let proj = create_projection(&from_crs, WGS84)?;

    let input = format!("{} {:.3}E {:.3}N", from_crs, utm.easting, utm.northing);
    let (longitude, latitude) = proj
        .convert((utm.easting, utm.northing))
        .map_err(|e| WaypointError::conversion(&input, format!("Projection failed: {}", e)))?;

    let point = GeoPoint::new(latitude, longitude);
    if !point.is_valid() {
        return Err(WaypointError::conversion(input, "Projection produced invalid coordinates"));
    }
    Ok(point)
}

fn create_projection(from: &str, to: &str) -> Result<Proj> {
    Proj::new_known_crs(from, to, None).map_err(|e| {
        WaypointError::conversion(
            format!("{} -> {}", from, to),
            format!("Failed to create projection: {}", e),
        )
    })
}
