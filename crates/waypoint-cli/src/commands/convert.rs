//! Convert command implementation

use anyhow::{Context, Result};
use waypoint_core::config::LayeredConfig;
use waypoint_core::models::GeoPoint;
use waypoint_geo::mgrs;

use crate::cli::{ConvertArgs, ConvertCommand};
use crate::output::OutputWriter;
use crate::output_types::{ToGridOutput, ToLatLonOutput};

pub fn execute(args: ConvertArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    match args.command {
        ConvertCommand::ToGrid { latitude, longitude } => {
            to_grid(GeoPoint::new(latitude, longitude), config, output)
        }
        ConvertCommand::ToLatlon { grid } => to_latlon(&grid, output),
    }
}

fn to_grid(point: GeoPoint, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let precision = config.precision.value;
    let grid = mgrs::to_grid(point, precision).context("Conversion failed")?;
    let grid_string = grid.to_string();
    let parts = mgrs::decompose(&grid_string, precision)?;

    if output.is_json() {
        return output.result(
            "success",
            ToGridOutput {
                latitude: point.latitude,
                longitude: point.longitude,
                precision: precision.digits(),
                grid: grid_string,
                grid_square: parts.identifier,
                easting: parts.easting,
                northing: parts.northing,
            },
        );
    }

    output.kv("Grid", &grid_string);
    output.kv("Grid square", &parts.identifier);
    output.kv("Easting", &parts.easting);
    output.kv("Northing", &parts.northing);
    Ok(())
}

fn to_latlon(grid: &str, output: &OutputWriter) -> Result<()> {
    let point = mgrs::to_latlon(grid).context("Conversion failed")?;

    if output.is_json() {
        return output.result(
            "success",
            ToLatLonOutput {
                grid: grid.to_string(),
                latitude: point.latitude,
                longitude: point.longitude,
            },
        );
    }

    output.kv("Latitude", format!("{:.6}", point.latitude));
    output.kv("Longitude", format!("{:.6}", point.longitude));
    output.info("South-west corner of the grid cell");
    Ok(())
}
