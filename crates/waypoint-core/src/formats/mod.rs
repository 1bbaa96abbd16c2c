//! Input formats for drawn arrows
//!
//! Map drawing tools export their layers as GeoJSON, so that is the one
//! format read here. Readers report structural problems through
//! `FormatValidation` before any arrow is processed.

pub mod geojson;

pub use self::geojson::{extract_arrows, ArrowDocument, Arrows, GeoJsonReader};

/// Result of format validation
#[derive(Debug, Clone, Default)]
pub struct FormatValidation {
    /// Validation errors that prevent reading
    pub errors: Vec<String>,

    /// Warnings that don't prevent reading but indicate potential issues
    pub warnings: Vec<String>,
}

impl FormatValidation {
    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
