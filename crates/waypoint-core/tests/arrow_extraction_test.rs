//! Integration tests for reading drawn arrows from GeoJSON exports

use std::fs;
use tempfile::TempDir;
use waypoint_core::formats::{extract_arrows, GeoJsonReader};
use waypoint_core::models::GeoPoint;
use waypoint_core::WaypointError;

#[test]
fn test_point_and_polyline_export() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("data.geojson");

    // Leaflet.draw export: one marker and one four-vertex polyline
    let content = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [16.396344, 52.705681] }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "LineString",
                    "coordinates": [
                        [16.390, 52.700],
                        [16.391, 52.701],
                        [16.392, 52.703],
                        [16.395, 52.704]
                    ]
                }
            }
        ]
    }"#;
    fs::write(&file_path, content).unwrap();

    let document = GeoJsonReader.read(&file_path).unwrap();
    let arrows: Vec<_> = document.arrows().collect();

    assert_eq!(arrows.len(), 1, "Point feature must be ignored");
    assert_eq!(arrows[0].start, GeoPoint::new(52.700, 16.390));
    assert_eq!(arrows[0].end, GeoPoint::new(52.704, 16.395), "Interior vertices are ignored");
}

#[test]
fn test_order_is_preserved_and_non_lines_skipped() {
    let content = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": {},
              "geometry": { "type": "LineString", "coordinates": [[1.0, 10.0], [1.0, 11.0]] } },
            { "type": "Feature", "properties": {},
              "geometry": { "type": "Polygon",
                            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]] } },
            { "type": "Feature", "properties": {}, "geometry": null },
            { "type": "Feature", "properties": {},
              "geometry": { "type": "MultiLineString",
                            "coordinates": [[[5.0, 5.0], [6.0, 6.0]]] } },
            { "type": "Feature", "properties": {},
              "geometry": { "type": "LineString", "coordinates": [[2.0, 20.0], [3.0, 20.0]] } }
        ]
    }"#;

    let document = GeoJsonReader.parse_str(content).unwrap();
    let starts: Vec<_> = extract_arrows(&document.collection).map(|a| a.start).collect();

    assert_eq!(starts, vec![GeoPoint::new(10.0, 1.0), GeoPoint::new(20.0, 2.0)]);
}

#[test]
fn test_empty_collection_yields_no_arrows() {
    let document =
        GeoJsonReader.parse_str(r#"{ "type": "FeatureCollection", "features": [] }"#).unwrap();
    assert_eq!(document.arrows().count(), 0);
}

#[test]
fn test_document_without_features_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("data.geojson");
    fs::write(&file_path, r#"{ "type": "FeatureCollection", "arrows": [] }"#).unwrap();

    let err = GeoJsonReader.read(&file_path).unwrap_err();
    match err {
        WaypointError::Parse { source_name, .. } => {
            assert!(source_name.ends_with("data.geojson"));
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}
