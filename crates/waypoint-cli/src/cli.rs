use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use waypoint_core::models::PoseNaming;

/// Waypoint - Turn arrows drawn on a map into MGRS navigation goals
#[derive(Parser, Debug)]
#[command(name = "waypoint")]
#[command(about = "Turn arrows drawn on a map into MGRS navigation goals", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./waypoint.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Digits per axis in grid references (1 = 10 km, 5 = 1 m)
    #[arg(long, global = true, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub precision: Option<u8>,

    /// Degrees added to the bearing before encoding the orientation
    #[arg(long, global = true, allow_hyphen_values = true, value_name = "DEGREES")]
    pub angle_offset: Option<f64>,

    /// Directory pose files are written to
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Pose file layout
    #[arg(long, global = true)]
    pub naming: Option<NamingArg>,

    /// Grid square assumed for saved goals that do not record one
    #[arg(long, global = true, value_name = "SQUARE")]
    pub grid_square: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Pose file layout selection
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum NamingArg {
    /// One point{N}.yaml per arrow
    PerRecord,
    /// A single goals_list.yaml
    List,
}

impl From<NamingArg> for PoseNaming {
    fn from(arg: NamingArg) -> Self {
        match arg {
            NamingArg::PerRecord => PoseNaming::PerRecord,
            NamingArg::List => PoseNaming::SingleList,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert the arrows of a GeoJSON export into pose files
    Process(ProcessArgs),

    /// Wait for the GeoJSON export to appear or change, then process it once
    Watch(WatchArgs),

    /// Place saved goals back on the map
    Goals(GoalsArgs),

    /// Convert between latitude/longitude and grid references
    Convert(ConvertArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct ProcessArgs {
    /// GeoJSON file, or GeoJSON text (defaults to the configured input file)
    pub input: Option<String>,

    /// Assemble poses without writing any files
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// GeoJSON file to watch (defaults to the configured input file)
    pub input: Option<PathBuf>,

    /// Polling interval in milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_ms: Option<u64>,

    /// Delay after a change before the file is read, in milliseconds
    #[arg(long, value_name = "MS")]
    pub settle_ms: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct GoalsArgs {
    /// Saved goal list (defaults to the list file in the output directory)
    pub file: Option<PathBuf>,

    /// Also write the goals as GeoJSON points
    #[arg(long, value_name = "OUT")]
    pub geojson: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    #[command(subcommand)]
    pub command: ConvertCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConvertCommand {
    /// Latitude/longitude to grid reference
    ToGrid {
        #[arg(allow_hyphen_values = true)]
        latitude: f64,
        #[arg(allow_hyphen_values = true)]
        longitude: f64,
    },

    /// Grid reference to the south-west corner of its cell
    ToLatlon { grid: String },
}
