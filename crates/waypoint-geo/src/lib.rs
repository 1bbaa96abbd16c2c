//! Waypoint Geo - Bearings, MGRS grid references and heading encoding
//!
//! UTM projection is delegated to PROJ (`transform`); everything built on
//! top of it (zone selection, MGRS lettering, grid string handling) lives in
//! `mgrs`.

pub mod bearing;
pub mod mgrs;
pub mod orientation;
pub mod transform;

pub use bearing::initial_bearing;
pub use mgrs::{compose, decompose, to_grid, to_latlon, GridParts};
pub use orientation::heading_to_quaternion;
