//! Arrow to pose assembly

use waypoint_core::error::Result;
use waypoint_core::models::{ArrowFeature, PoseRecord, Precision};
use waypoint_geo::{decompose, heading_to_quaternion, initial_bearing, to_grid};

use crate::models::AssembledPose;

/// Build the pose for one arrow.
///
/// The arrow's start is converted to a grid reference whose easting and
/// northing fields become `position_x` and `position_y`. The heading is the
/// initial bearing towards the arrow's end, shifted by `angle_offset`.
pub fn assemble(
    arrow: &ArrowFeature,
    precision: Precision,
    angle_offset: f64,
) -> Result<AssembledPose> {
    if arrow.is_degenerate() {
        tracing::debug!(start = %arrow.start, "Zero-length arrow, heading defaults to north");
    }
    let bearing = initial_bearing(arrow.start, arrow.end);
    let grid = to_grid(arrow.start, precision)?;
    let parts = decompose(&grid.to_string(), precision)?;
    let orientation = heading_to_quaternion(bearing, angle_offset);

    let pose = PoseRecord::new(
        f64::from(parts.easting_value()?),
        f64::from(parts.northing_value()?),
        orientation,
    )
    .with_grid_square(parts.identifier);

    Ok(AssembledPose { start: arrow.start, bearing, grid, pose })
}
