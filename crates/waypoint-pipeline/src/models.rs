use waypoint_core::config::DEFAULT_ANGLE_OFFSET_DEGREES;
use waypoint_core::error::WaypointError;
use waypoint_core::models::{GeoPoint, GridCoordinate, PoseEntry, PoseRecord, Precision};
use waypoint_core::ports::SaveReport;

/// Knobs shared by every arrow of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    pub precision: Precision,
    /// Added to the bearing before it is encoded as a quaternion
    pub angle_offset: f64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { precision: Precision::METER, angle_offset: DEFAULT_ANGLE_OFFSET_DEGREES }
    }
}

/// A pose together with the intermediate values it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledPose {
    pub start: GeoPoint,
    /// Initial bearing of the arrow in degrees from true north
    pub bearing: f64,
    pub grid: GridCoordinate,
    pub pose: PoseRecord,
}

impl AssembledPose {
    pub fn into_entry(self, index: usize) -> PoseEntry {
        PoseEntry::new(index, self.pose)
    }
}

/// Result of one pipeline run
#[derive(Debug)]
pub struct RunReport {
    /// Where the arrows came from
    pub source_name: String,
    /// Arrows found in the document
    pub arrow_count: usize,
    /// Successfully assembled poses keyed by 1-based arrow index
    pub assembled: Vec<(usize, AssembledPose)>,
    /// One `WaypointError::Pipeline` per arrow that could not be assembled
    pub failures: Vec<WaypointError>,
    pub save: SaveReport,
}

impl RunReport {
    /// True when every arrow was assembled and every output written
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.save.all_succeeded()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len() + self.save.failed.len()
    }
}
