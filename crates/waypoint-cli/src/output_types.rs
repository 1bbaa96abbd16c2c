use serde::Serialize;
use tabled::Tabled;

/// One assembled pose, as shown after a run
#[derive(Debug, Serialize, Tabled)]
pub struct PoseRow {
    #[tabled(rename = "Arrow")]
    pub index: usize,
    #[tabled(rename = "Grid")]
    pub grid: String,
    #[tabled(rename = "Bearing", display_with = "fmt_degrees")]
    pub bearing: f64,
    #[tabled(rename = "X")]
    pub position_x: f64,
    #[tabled(rename = "Y")]
    pub position_y: f64,
    #[tabled(rename = "qz", display_with = "fmt_component")]
    pub orientation_z: f64,
    #[tabled(rename = "qw", display_with = "fmt_component")]
    pub orientation_w: f64,
}

/// An arrow or output that failed
#[derive(Debug, Serialize, Tabled)]
pub struct FailureRow {
    #[tabled(rename = "Arrows")]
    pub arrows: String,
    #[tabled(rename = "Error")]
    pub error: String,
}

/// Output for convert to-grid
#[derive(Debug, Serialize)]
pub struct ToGridOutput {
    pub latitude: f64,
    pub longitude: f64,
    pub precision: u8,
    pub grid: String,
    pub grid_square: String,
    pub easting: String,
    pub northing: String,
}

/// Output for convert to-latlon
#[derive(Debug, Serialize)]
pub struct ToLatLonOutput {
    pub grid: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A saved goal placed back on the map
#[derive(Debug, Serialize, Tabled)]
pub struct GoalRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Latitude", display_with = "fmt_coordinate")]
    pub latitude: f64,
    #[tabled(rename = "Longitude", display_with = "fmt_coordinate")]
    pub longitude: f64,
}

/// Output for the goals command
#[derive(Debug, Serialize)]
pub struct GoalsOutput {
    pub file: String,
    pub goals: Vec<GoalRow>,
    pub geojson: Option<String>,
}

/// One configuration value and where it came from
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

fn fmt_degrees(value: &f64) -> String {
    format!("{:.2}°", value)
}

fn fmt_component(value: &f64) -> String {
    format!("{:.4}", value)
}

fn fmt_coordinate(value: &f64) -> String {
    format!("{:.6}", value)
}
