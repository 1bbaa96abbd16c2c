pub mod geometry;
pub mod grid;
pub mod pose;

pub use geometry::{ArrowFeature, GeoPoint};
pub use grid::{GridCoordinate, Precision, SQUARE_ID_LEN};
pub use pose::{GoalMarker, PoseEntry, PoseNaming, PoseRecord, UnitQuaternion};
