use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::GeoPoint;
use crate::error::WaypointError;

/// Rotation about the vertical axis. `x` and `y` are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitQuaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl UnitQuaternion {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    pub fn is_unit(&self, tolerance: f64) -> bool {
        (self.norm() - 1.0).abs() <= tolerance
    }
}

/// A navigation goal: grid position plus heading
///
/// `position_x` and `position_y` hold the easting and northing fields of the
/// grid reference, which only identify a location together with the grid
/// square. The square is carried in `grid_square` when it was persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseRecord {
    pub position_x: f64,
    pub position_y: f64,
    pub position_z: f64,
    pub orientation: UnitQuaternion,
    pub grid_square: Option<String>,
}

impl PoseRecord {
    pub fn new(position_x: f64, position_y: f64, orientation: UnitQuaternion) -> Self {
        Self { position_x, position_y, position_z: 0.0, orientation, grid_square: None }
    }

    pub fn with_grid_square(mut self, grid_square: impl Into<String>) -> Self {
        self.grid_square = Some(grid_square.into());
        self
    }
}

/// A pose tagged with the 1-based position of its arrow in the input
#[derive(Debug, Clone, PartialEq)]
pub struct PoseEntry {
    pub index: usize,
    pub pose: PoseRecord,
}

impl PoseEntry {
    pub fn new(index: usize, pose: PoseRecord) -> Self {
        Self { index, pose }
    }
}

/// How poses are laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PoseNaming {
    /// One `point{N}.yaml` file per arrow
    #[default]
    PerRecord,
    /// A single YAML list holding every pose
    SingleList,
}

impl FromStr for PoseNaming {
    type Err = WaypointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "per-record" | "record" | "files" => Ok(PoseNaming::PerRecord),
            "single-list" | "list" => Ok(PoseNaming::SingleList),
            _ => Err(WaypointError::ConfigInvalid {
                key: "naming".to_string(),
                reason: format!("Invalid naming mode: {}. Use per-record or list", s),
            }),
        }
    }
}

impl fmt::Display for PoseNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoseNaming::PerRecord => write!(f, "per-record"),
            PoseNaming::SingleList => write!(f, "list"),
        }
    }
}

/// A previously saved goal, placed back on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalMarker {
    pub point: GeoPoint,
    pub index: usize,
}
