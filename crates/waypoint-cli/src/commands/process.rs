//! Process command implementation

use anyhow::{Context, Result};
use std::path::Path;
use waypoint_core::config::LayeredConfig;
use waypoint_core::formats::GeoJsonReader;
use waypoint_core::ports::PoseStore;
use waypoint_pipeline::{PipelineSettings, PosePipeline, RunReport};
use waypoint_store::{MemoryPoseStore, YamlPoseStore};

use crate::cli::ProcessArgs;
use crate::output::OutputWriter;
use crate::summary::RunSummary;

pub fn execute(args: ProcessArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let source = args
        .input
        .unwrap_or_else(|| config.input_file.value.display().to_string());
    run_and_report(Input::Source(&source), config, args.dry_run, output)
}

/// Where the arrows are read from
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    /// A file path, or GeoJSON text starting with `{`
    Source(&'a str),
    File(&'a Path),
}

/// Run the pipeline once, print the summary and fail if anything was lost
pub fn run_and_report(
    input: Input<'_>,
    config: &LayeredConfig,
    dry_run: bool,
    output: &OutputWriter,
) -> Result<()> {
    warn_on_skipped_features(input, output);
    let report = run(input, config, dry_run)?;
    RunSummary::from_report(&report, dry_run).display(output)?;

    anyhow::ensure!(
        report.is_complete(),
        "{} of {} arrow(s) or output(s) failed",
        report.failure_count(),
        report.arrow_count
    );
    if !output.is_json() {
        output.success(format!("Processed {} arrow(s)", report.arrow_count));
    }
    Ok(())
}

fn warn_on_skipped_features(input: Input<'_>, output: &OutputWriter) {
    let path = match input {
        Input::File(path) => path,
        Input::Source(source) if Path::new(source).is_file() => Path::new(source),
        Input::Source(_) => return,
    };
    let validation = GeoJsonReader.validate(path);
    if validation.is_valid() {
        for warning in &validation.warnings {
            output.warning(warning);
        }
    }
}

fn run(input: Input<'_>, config: &LayeredConfig, dry_run: bool) -> Result<RunReport> {
    let settings = PipelineSettings {
        precision: config.precision.value,
        angle_offset: config.angle_offset.value,
    };

    let report = if dry_run {
        run_with(&PosePipeline::new(MemoryPoseStore::new(), settings), input)
    } else {
        let store = YamlPoseStore::new(&config.output_dir.value)
            .with_naming(config.naming.value)
            .with_list_file(config.list_file.value.clone())
            .persist_grid_square(config.persist_grid_square.value);
        run_with(&PosePipeline::new(store, settings), input)
    };

    report.context("Failed to process arrows")
}

fn run_with<S: PoseStore>(
    pipeline: &PosePipeline<S>,
    input: Input<'_>,
) -> waypoint_core::Result<RunReport> {
    match input {
        Input::Source(source) => pipeline.run_source(source),
        Input::File(path) => pipeline.run_file(path),
    }
}
