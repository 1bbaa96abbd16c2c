//! Heading to planar orientation quaternion

use waypoint_core::models::UnitQuaternion;

/// Offset for a frame whose zero heading is true north
pub const TRUE_NORTH_OFFSET_DEGREES: f64 = 0.0;

/// Offset used by the downstream goal consumers, whose zero heading points
/// along the screen's x axis
pub const SCREEN_AXIS_OFFSET_DEGREES: f64 = 90.0;

/// Encode a heading as a rotation about the vertical axis.
///
/// The angle is `heading + offset_degrees`, so the result is
/// `{0, 0, cos(θ/2), sin(θ/2)}`. Any finite input yields a unit quaternion.
pub fn heading_to_quaternion(heading_degrees: f64, offset_degrees: f64) -> UnitQuaternion {
    let half = (heading_degrees + offset_degrees).to_radians() / 2.0;
    UnitQuaternion::new(0.0, 0.0, half.cos(), half.sin())
}
