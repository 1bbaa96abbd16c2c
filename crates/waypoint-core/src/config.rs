use crate::error::{Result, WaypointError};
use crate::models::{PoseNaming, Precision, SQUARE_ID_LEN};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "waypoint.toml";

/// Heading offset applied before quaternion encoding unless configured otherwise
pub const DEFAULT_ANGLE_OFFSET_DEGREES: f64 = 90.0;

/// Grid square assumed for saved goals that do not carry their own
pub const DEFAULT_GRID_SQUARE: &str = "33UWU";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConfigSource::Default => "default",
            ConfigSource::File => "file",
            ConfigSource::Environment => "environment",
            ConfigSource::Cli => "cli",
        };
        f.write_str(name)
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for a waypoint run
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Digits per axis of the grid reference
    pub precision: ConfigValue<Precision>,
    /// Degrees added to the bearing before quaternion encoding
    pub angle_offset: ConfigValue<f64>,
    /// Drawing export to process
    pub input_file: ConfigValue<PathBuf>,
    /// Directory pose files are written to
    pub output_dir: ConfigValue<PathBuf>,
    pub naming: ConfigValue<PoseNaming>,
    /// File name used by `PoseNaming::SingleList` and by goal reload
    pub list_file: ConfigValue<String>,
    /// Grid square assumed for goals saved without one
    pub grid_square: ConfigValue<String>,
    /// Write the grid square next to each pose
    pub persist_grid_square: ConfigValue<bool>,
    pub poll_interval_ms: ConfigValue<u64>,
    pub settle_ms: ConfigValue<u64>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            precision: ConfigValue::new(Precision::METER, ConfigSource::Default),
            angle_offset: ConfigValue::new(DEFAULT_ANGLE_OFFSET_DEGREES, ConfigSource::Default),
            input_file: ConfigValue::new(PathBuf::from("data.geojson"), ConfigSource::Default),
            output_dir: ConfigValue::new(PathBuf::from("."), ConfigSource::Default),
            naming: ConfigValue::new(PoseNaming::PerRecord, ConfigSource::Default),
            list_file: ConfigValue::new("goals_list.yaml".to_string(), ConfigSource::Default),
            grid_square: ConfigValue::new(DEFAULT_GRID_SQUARE.to_string(), ConfigSource::Default),
            persist_grid_square: ConfigValue::new(true, ConfigSource::Default),
            poll_interval_ms: ConfigValue::new(500, ConfigSource::Default),
            settle_ms: ConfigValue::new(1000, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| WaypointError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| WaypointError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(precision) = file_config.precision {
            self.precision.update(Precision::new(precision)?, ConfigSource::File);
        }

        if let Some(angle_offset) = file_config.angle_offset_degrees {
            self.angle_offset.update(parse_angle_offset_value(angle_offset)?, ConfigSource::File);
        }

        if let Some(input_file) = file_config.input_file {
            self.input_file.update(input_file, ConfigSource::File);
        }

        if let Some(output_dir) = file_config.output_dir {
            self.output_dir.update(output_dir, ConfigSource::File);
        }

        if let Some(naming) = file_config.naming {
            self.naming.update(naming.parse()?, ConfigSource::File);
        }

        if let Some(list_file) = file_config.list_file {
            self.list_file.update(list_file, ConfigSource::File);
        }

        if let Some(grid_square) = file_config.grid_square {
            self.grid_square.update(parse_grid_square(&grid_square)?, ConfigSource::File);
        }

        if let Some(persist) = file_config.persist_grid_square {
            self.persist_grid_square.update(persist, ConfigSource::File);
        }

        if let Some(watch) = file_config.watch {
            if let Some(poll) = watch.poll_interval_ms {
                self.poll_interval_ms.update(poll, ConfigSource::File);
            }
            if let Some(settle) = watch.settle_ms {
                self.settle_ms.update(settle, ConfigSource::File);
            }
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // WAYPOINT_PRECISION
        if let Ok(precision_str) = env::var("WAYPOINT_PRECISION") {
            match parse_precision(&precision_str) {
                Ok(precision) => self.precision.update(precision, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid WAYPOINT_PRECISION value '{}': expected 1 to 5",
                    precision_str
                ),
            }
        }

        // WAYPOINT_ANGLE_OFFSET
        if let Ok(offset_str) = env::var("WAYPOINT_ANGLE_OFFSET") {
            match parse_angle_offset(&offset_str) {
                Ok(offset) => self.angle_offset.update(offset, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid WAYPOINT_ANGLE_OFFSET value '{}': expected degrees",
                    offset_str
                ),
            }
        }

        // WAYPOINT_INPUT
        if let Ok(input) = env::var("WAYPOINT_INPUT") {
            self.input_file.update(PathBuf::from(input), ConfigSource::Environment);
        }

        // WAYPOINT_OUTPUT_DIR
        if let Ok(output_dir) = env::var("WAYPOINT_OUTPUT_DIR") {
            self.output_dir.update(PathBuf::from(output_dir), ConfigSource::Environment);
        }

        // WAYPOINT_NAMING
        if let Ok(naming_str) = env::var("WAYPOINT_NAMING") {
            match naming_str.parse::<PoseNaming>() {
                Ok(naming) => self.naming.update(naming, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid WAYPOINT_NAMING value '{}': expected per-record or list",
                    naming_str
                ),
            }
        }

        // WAYPOINT_GRID_SQUARE
        if let Ok(square_str) = env::var("WAYPOINT_GRID_SQUARE") {
            match parse_grid_square(&square_str) {
                Ok(square) => self.grid_square.update(square, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid WAYPOINT_GRID_SQUARE value '{}': expected an identifier like 33UWU",
                    square_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(precision) = overrides.precision {
            self.precision.update(precision, ConfigSource::Cli);
        }

        if let Some(angle_offset) = overrides.angle_offset {
            self.angle_offset.update(angle_offset, ConfigSource::Cli);
        }

        if let Some(input_file) = overrides.input_file {
            self.input_file.update(input_file, ConfigSource::Cli);
        }

        if let Some(output_dir) = overrides.output_dir {
            self.output_dir.update(output_dir, ConfigSource::Cli);
        }

        if let Some(naming) = overrides.naming {
            self.naming.update(naming, ConfigSource::Cli);
        }

        if let Some(grid_square) = overrides.grid_square {
            self.grid_square.update(grid_square, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "precision".to_string(),
            (self.precision.value.to_string(), self.precision.source),
        );

        map.insert(
            "angle_offset_degrees".to_string(),
            (self.angle_offset.value.to_string(), self.angle_offset.source),
        );

        map.insert(
            "input_file".to_string(),
            (self.input_file.value.display().to_string(), self.input_file.source),
        );

        map.insert(
            "output_dir".to_string(),
            (self.output_dir.value.display().to_string(), self.output_dir.source),
        );

        map.insert("naming".to_string(), (self.naming.value.to_string(), self.naming.source));

        map.insert("list_file".to_string(), (self.list_file.value.clone(), self.list_file.source));

        map.insert(
            "grid_square".to_string(),
            (self.grid_square.value.clone(), self.grid_square.source),
        );

        map.insert(
            "persist_grid_square".to_string(),
            (self.persist_grid_square.value.to_string(), self.persist_grid_square.source),
        );

        map.insert(
            "watch.poll_interval_ms".to_string(),
            (self.poll_interval_ms.value.to_string(), self.poll_interval_ms.source),
        );

        map.insert(
            "watch.settle_ms".to_string(),
            (self.settle_ms.value.to_string(), self.settle_ms.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    precision: Option<u8>,
    angle_offset_degrees: Option<f64>,
    input_file: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    naming: Option<String>,
    list_file: Option<String>,
    grid_square: Option<String>,
    persist_grid_square: Option<bool>,
    watch: Option<WatchFileConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
struct WatchFileConfig {
    poll_interval_ms: Option<u64>,
    settle_ms: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub precision: Option<Precision>,
    pub angle_offset: Option<f64>,
    pub input_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub naming: Option<PoseNaming>,
    pub grid_square: Option<String>,
}

/// Parse a grid precision from string
pub fn parse_precision(s: &str) -> Result<Precision> {
    let digits: u8 = s.trim().parse().map_err(|_| WaypointError::ConfigInvalid {
        key: "precision".to_string(),
        reason: format!("Invalid precision: {}. Use a digit count from 1 to 5", s),
    })?;
    Precision::new(digits)
}

/// Parse an angle offset in degrees from string
pub fn parse_angle_offset(s: &str) -> Result<f64> {
    let degrees: f64 = s.trim().parse().map_err(|_| WaypointError::ConfigInvalid {
        key: "angle_offset_degrees".to_string(),
        reason: format!("Invalid angle offset: {}. Use degrees, e.g. 0 or 90", s),
    })?;
    parse_angle_offset_value(degrees)
}

fn parse_angle_offset_value(degrees: f64) -> Result<f64> {
    if degrees.is_finite() {
        Ok(degrees)
    } else {
        Err(WaypointError::ConfigInvalid {
            key: "angle_offset_degrees".to_string(),
            reason: "angle offset must be a finite number of degrees".to_string(),
        })
    }
}

/// Normalize and shape-check a grid square identifier such as `33UWU`
///
/// Letters are not checked against the lettering scheme here; that happens
/// when the identifier is decoded.
pub fn parse_grid_square(s: &str) -> Result<String> {
    let square: String = s.split_whitespace().collect::<String>().to_uppercase();
    let bytes = square.as_bytes();
    let well_formed = bytes.len() == SQUARE_ID_LEN
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[2..].iter().all(u8::is_ascii_uppercase);

    if well_formed {
        Ok(square)
    } else {
        Err(WaypointError::ConfigInvalid {
            key: "grid_square".to_string(),
            reason: format!(
                "Invalid grid square: {}. Expected 2-digit zone, band and two square letters",
                s
            ),
        })
    }
}
