//! Command implementations

mod config;
mod convert;
mod goals;
mod process;
mod watch;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Process(args) => process::execute(args, &config, &output),
        Commands::Watch(args) => watch::execute(args, &config, &output).await,
        Commands::Goals(args) => goals::execute(args, &config, &output),
        Commands::Convert(args) => convert::execute(args, &config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}
