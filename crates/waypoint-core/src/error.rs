//! Error types for Waypoint

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaypointError {
    // Geodesy errors
    #[error("Cannot convert {input}: {reason}")]
    Conversion { input: String, reason: String },

    // Input document errors
    #[error("Failed to parse {source_name}: {reason}")]
    Parse { source_name: String, reason: String },

    // Per-arrow failure inside a batch run
    #[error("Arrow {index} failed: {source}")]
    Pipeline {
        index: usize,
        #[source]
        source: Box<WaypointError>,
    },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl WaypointError {
    /// Build a conversion error for a displayable input
    pub fn conversion(input: impl ToString, reason: impl Into<String>) -> Self {
        WaypointError::Conversion { input: input.to_string(), reason: reason.into() }
    }

    /// Wrap a failure that belongs to one arrow of a batch
    pub fn for_arrow(index: usize, source: WaypointError) -> Self {
        WaypointError::Pipeline { index, source: Box::new(source) }
    }

    /// True for errors that reject a whole input document
    pub fn is_parse(&self) -> bool {
        matches!(self, WaypointError::Parse { .. })
    }
}

pub type Result<T> = std::result::Result<T, WaypointError>;
