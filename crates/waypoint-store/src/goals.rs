//! Reload saved goals as map markers

use std::fs;
use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Deserialize;
use waypoint_core::config::DEFAULT_GRID_SQUARE;
use waypoint_core::error::{Result, WaypointError};
use waypoint_core::models::{GoalMarker, Precision};
use waypoint_geo::mgrs;

/// How saved positions are turned back into grid references
#[derive(Debug, Clone, PartialEq)]
pub struct GoalOptions {
    /// Square used for records saved without `grid_square`
    pub fallback_square: String,
    /// Field width the positions were saved with
    pub precision: Precision,
}

impl Default for GoalOptions {
    fn default() -> Self {
        Self { fallback_square: DEFAULT_GRID_SQUARE.to_string(), precision: Precision::METER }
    }
}

#[derive(Debug, Deserialize)]
struct GoalRecord {
    position_x: f64,
    position_y: f64,
    #[serde(default)]
    grid_square: Option<String>,
}

/// A goal file holds a list, but a single `point{N}.yaml` is accepted too
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GoalDocument {
    List(Vec<GoalRecord>),
    Single(GoalRecord),
}

/// Load saved goals and place each at the south-west corner of its grid cell
///
/// Positions are truncated to integers and zero-padded to the configured
/// precision before being joined with the record's grid square.
pub fn load_goals(path: &Path, options: &GoalOptions) -> Result<Vec<GoalMarker>> {
    let content = fs::read_to_string(path)?;
    let document: GoalDocument = serde_yaml::from_str(&content).map_err(|e| {
        WaypointError::Parse { source_name: path.display().to_string(), reason: e.to_string() }
    })?;

    let records = match document {
        GoalDocument::List(records) => records,
        GoalDocument::Single(record) => vec![record],
    };

    let markers = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let grid = goal_grid_reference(record, options)?;
            let point = mgrs::to_latlon(&grid)?;
            tracing::debug!(index, grid = %grid, %point, "Loaded goal");
            Ok(GoalMarker { point, index })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(path = %path.display(), goals = markers.len(), "Loaded goals");
    Ok(markers)
}

fn goal_grid_reference(record: &GoalRecord, options: &GoalOptions) -> Result<String> {
    let square = record
        .grid_square
        .as_deref()
        .map(|s| s.trim().to_ascii_uppercase())
        .unwrap_or_else(|| options.fallback_square.clone());

    let easting = field_value(record.position_x, options.precision)?;
    let northing = field_value(record.position_y, options.precision)?;
    mgrs::compose(&square, easting, northing, options.precision)
}

fn field_value(position: f64, precision: Precision) -> Result<u32> {
    let value = position.trunc();
    if !value.is_finite() || value < 0.0 || value >= f64::from(precision.field_limit()) {
        return Err(WaypointError::conversion(
            position,
            format!("position does not fit a {}-digit grid field", precision),
        ));
    }
    Ok(value as u32)
}

/// Render markers as GeoJSON points with an `index` property
pub fn goals_to_geojson(markers: &[GoalMarker]) -> FeatureCollection {
    let features = markers
        .iter()
        .map(|marker| {
            let mut properties = JsonObject::new();
            properties.insert("index".to_string(), serde_json::Value::from(marker.index));
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(marker.point.to_position()))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection { bbox: None, features, foreign_members: None }
}
