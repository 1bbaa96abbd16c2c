//! Waypoint CLI - Command-line interface
//!
//! Turns arrows drawn on a map into MGRS navigation goals.

mod cli;
mod commands;
mod config_loader;
mod output;
mod output_types;
mod progress;
mod summary;
mod watch;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Only `watch` awaits anything, but every command runs on the runtime
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(commands::execute(cli))?;

    Ok(())
}
