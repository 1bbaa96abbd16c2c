//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use waypoint_core::config::{
    parse_grid_square, CliConfigOverrides, LayeredConfig, DEFAULT_CONFIG_FILE,
};
use waypoint_core::models::Precision;

use crate::cli::Cli;

/// Load layered configuration: defaults, file, environment, then flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_file_path(cli.config.as_deref()) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
    }

    let mut config = config.load_from_env();
    config.update_from_cli(cli_overrides(cli)?);
    Ok(config)
}

/// An explicit `--config` must exist; the default file is optional
fn config_file_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}

fn cli_overrides(cli: &Cli) -> Result<CliConfigOverrides> {
    let precision = cli.precision.map(Precision::new).transpose()?;
    let grid_square = cli
        .grid_square
        .as_deref()
        .map(parse_grid_square)
        .transpose()
        .context("Invalid --grid-square")?;

    if let Some(offset) = cli.angle_offset {
        anyhow::ensure!(offset.is_finite(), "--angle-offset must be a finite number");
    }

    Ok(CliConfigOverrides {
        precision,
        angle_offset: cli.angle_offset,
        input_file: None,
        output_dir: cli.output_dir.clone(),
        naming: cli.naming.map(Into::into),
        grid_square,
    })
}
