//! Initial great-circle bearing

use waypoint_core::models::GeoPoint;

/// Initial bearing from `from` towards `to`, in degrees clockwise from true
/// north, normalized to `[0, 360)`.
///
/// Coincident points return `0.0`.
pub fn initial_bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round a tiny negative up to exactly 360.0
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}
