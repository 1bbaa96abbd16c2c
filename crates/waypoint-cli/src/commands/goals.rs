//! Goals command implementation

use anyhow::{Context, Result};
use geojson::GeoJson;
use std::fs;
use waypoint_core::config::LayeredConfig;
use waypoint_store::{goals_to_geojson, load_goals, GoalOptions};

use crate::cli::GoalsArgs;
use crate::output::OutputWriter;
use crate::output_types::{GoalRow, GoalsOutput};

pub fn execute(args: GoalsArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let file = args
        .file
        .unwrap_or_else(|| config.output_dir.value.join(&config.list_file.value));
    let options = GoalOptions {
        fallback_square: config.grid_square.value.clone(),
        precision: config.precision.value,
    };

    let markers = load_goals(&file, &options)
        .with_context(|| format!("Failed to load goals from {}", file.display()))?;

    if let Some(out) = &args.geojson {
        let geojson = GeoJson::from(goals_to_geojson(&markers));
        fs::write(out, geojson.to_string())
            .with_context(|| format!("Failed to write {}", out.display()))?;
    }

    let goals: Vec<GoalRow> = markers
        .iter()
        .map(|marker| GoalRow {
            index: marker.index,
            latitude: marker.point.latitude,
            longitude: marker.point.longitude,
        })
        .collect();

    if output.is_json() {
        return output.result(
            "success",
            GoalsOutput {
                file: file.display().to_string(),
                goals,
                geojson: args.geojson.map(|p| p.display().to_string()),
            },
        );
    }

    output.section(format!("Goals in {}", file.display()));
    output.table(goals);
    if let Some(out) = &args.geojson {
        output.success(format!("Wrote {}", out.display()));
    }
    Ok(())
}
