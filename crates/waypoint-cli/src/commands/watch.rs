//! Watch command implementation

use anyhow::Result;
use std::time::Duration;
use waypoint_core::config::LayeredConfig;

use crate::cli::WatchArgs;
use crate::commands::process::{self, Input};
use crate::output::OutputWriter;
use crate::progress::{create_spinner, finish_error, finish_success};
use crate::watch::wait_for_file;

pub async fn execute(args: WatchArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let path = args.input.unwrap_or_else(|| config.input_file.value.clone());
    let poll = Duration::from_millis(args.poll_ms.unwrap_or(config.poll_interval_ms.value).max(1));
    let settle = Duration::from_millis(args.settle_ms.unwrap_or(config.settle_ms.value));

    let spinner = if output.is_json() {
        None
    } else {
        Some(create_spinner(&format!("Waiting for {}", path.display())))
    };

    tokio::select! {
        _ = wait_for_file(&path, poll, settle) => {
            if let Some(pb) = &spinner {
                finish_success(pb, &format!("{} changed", path.display()));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            if let Some(pb) = &spinner {
                finish_error(pb, "Cancelled");
            }
            output.warning("Watch cancelled before the file changed");
            return Ok(());
        }
    }

    process::run_and_report(Input::File(&path), config, false, output)
}
