//! GeoJSON arrow reader implementation

use std::fs;
use std::path::Path;

use geojson::{FeatureCollection, GeoJson, Value};

use crate::error::{Result, WaypointError};
use crate::formats::FormatValidation;
use crate::models::ArrowFeature;

/// GeoJSON reader for exported drawing layers
pub struct GeoJsonReader;

impl GeoJsonReader {
    /// Read and parse a GeoJSON file
    pub fn read(&self, path: &Path) -> Result<ArrowDocument> {
        let content = fs::read_to_string(path)?;
        Self::parse_named(&content, &path.display().to_string())
    }

    /// Parse GeoJSON text
    pub fn parse_str(&self, content: &str) -> Result<ArrowDocument> {
        Self::parse_named(content, "inline GeoJSON")
    }

    /// Check a file without keeping the parsed document
    pub fn validate(&self, path: &Path) -> FormatValidation {
        let mut validation = FormatValidation::default();

        if !path.exists() {
            validation.errors.push(format!("File not found: {}", path.display()));
            return validation;
        }

        match self.read(path) {
            Ok(document) => {
                let arrows = document.arrows().count();
                if arrows == 0 {
                    validation.warnings.push("No LineString features to process".to_string());
                }
                let skipped = document.feature_count() - arrows;
                if skipped > 0 {
                    validation
                        .warnings
                        .push(format!("{} feature(s) are not arrows and will be skipped", skipped));
                }
            }
            Err(e) => validation.errors.push(e.to_string()),
        }

        validation
    }

    fn parse_named(content: &str, source_name: &str) -> Result<ArrowDocument> {
        let geojson: GeoJson = content.parse().map_err(|e| WaypointError::Parse {
            source_name: source_name.to_string(),
            reason: format!("Failed to parse GeoJSON: {}", e),
        })?;

        let collection = match geojson {
            GeoJson::FeatureCollection(fc) => fc,
            GeoJson::Feature(feature) => FeatureCollection {
                bbox: None,
                features: vec![feature],
                foreign_members: None,
            },
            GeoJson::Geometry(geometry) => FeatureCollection {
                bbox: None,
                features: vec![geojson::Feature::from(geometry)],
                foreign_members: None,
            },
        };

        tracing::debug!(
            source = source_name,
            features = collection.features.len(),
            "Parsed GeoJSON document"
        );

        Ok(ArrowDocument { source_name: source_name.to_string(), collection })
    }
}

/// A parsed drawing export
#[derive(Debug, Clone)]
pub struct ArrowDocument {
    pub source_name: String,
    pub collection: FeatureCollection,
}

impl ArrowDocument {
    /// Load from a file path, or parse the argument as GeoJSON text when it
    /// is a JSON object
    ///
    /// Anything that does not start with `{` is read as a path, so a missing
    /// file is reported as `Io`.
    pub fn load(source: &str) -> Result<Self> {
        let path = Path::new(source);
        if !path.is_file() && source.trim_start().starts_with('{') {
            GeoJsonReader.parse_str(source)
        } else {
            GeoJsonReader.read(path)
        }
    }

    /// Arrows in document order
    pub fn arrows(&self) -> Arrows<'_> {
        extract_arrows(&self.collection)
    }

    pub fn feature_count(&self) -> usize {
        self.collection.features.len()
    }
}

/// Lazily extract arrows from a feature collection
///
/// Only LineString features with at least two positions become arrows;
/// everything else is skipped without error.
pub fn extract_arrows(collection: &FeatureCollection) -> Arrows<'_> {
    Arrows { features: collection.features.iter().enumerate() }
}

/// Iterator over the arrows of a feature collection
///
/// Cheap to clone: a clone taken before iteration replays the same arrows,
/// and `extract_arrows` can always be called again for a fresh pass.
#[derive(Debug, Clone)]
pub struct Arrows<'a> {
    features: std::iter::Enumerate<std::slice::Iter<'a, geojson::Feature>>,
}

impl Iterator for Arrows<'_> {
    type Item = ArrowFeature;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, feature) in self.features.by_ref() {
            let Some(geometry) = feature.geometry.as_ref() else {
                tracing::debug!(feature = idx, "Skipping feature without geometry");
                continue;
            };

            match &geometry.value {
                Value::LineString(positions) => match ArrowFeature::from_positions(positions) {
                    Some(arrow) => return Some(arrow),
                    None => {
                        tracing::debug!(
                            feature = idx,
                            positions = positions.len(),
                            "Skipping LineString that is too short"
                        );
                    }
                },
                other => {
                    tracing::debug!(
                        feature = idx,
                        geometry = value_type_name(other),
                        "Skipping non-line feature"
                    );
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.features.size_hint().1)
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}
