//! End-to-end runs from a GeoJSON file to YAML pose files

use std::fs;
use tempfile::TempDir;
use waypoint_core::models::{PoseNaming, Precision};
use waypoint_core::ports::PoseStore;
use waypoint_core::WaypointError;
use waypoint_pipeline::{PipelineSettings, PosePipeline};
use waypoint_store::YamlPoseStore;

const THREE_ARROWS: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        { "type": "Feature", "properties": {},
          "geometry": { "type": "LineString", "coordinates": [[16.0, 52.0], [17.0, 52.0]] } },
        { "type": "Feature", "properties": {},
          "geometry": { "type": "LineString", "coordinates": [[0.0, 90.0], [1.0, 89.0]] } },
        { "type": "Feature", "properties": {},
          "geometry": { "type": "Point", "coordinates": [16.5, 52.5] } },
        { "type": "Feature", "properties": {},
          "geometry": { "type": "LineString",
                        "coordinates": [[16.396344, 52.705681], [16.4, 52.71], [16.5, 52.8]] } }
    ]
}"#;

fn setup() -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("data.geojson");
    fs::write(&input, THREE_ARROWS).unwrap();
    (temp_dir, input)
}

#[test]
fn test_polar_arrow_fails_alone() {
    let (temp_dir, input) = setup();
    let out = temp_dir.path().join("goals");
    let pipeline = PosePipeline::new(YamlPoseStore::new(&out), PipelineSettings::default());

    let report = pipeline.run_file(&input).unwrap();

    assert_eq!(report.arrow_count, 3);
    assert_eq!(report.assembled.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0], WaypointError::Pipeline { index: 2, .. }));
    assert!(report.save.all_succeeded());

    assert!(out.join("point1.yaml").exists());
    assert!(!out.join("point2.yaml").exists());
    assert!(out.join("point3.yaml").exists());

    let poses = pipeline.store().load().unwrap();
    assert_eq!(poses.len(), 2);
    assert_eq!(poses[0].position_x, 68649.0);
    assert_eq!(poses[1].position_x, 94342.0);
    assert_eq!(poses[1].position_y, 40445.0);
    assert_eq!(poses[1].grid_square.as_deref(), Some("33UWU"));
}

#[test]
fn test_single_list_naming() {
    let (temp_dir, input) = setup();
    let store = YamlPoseStore::new(temp_dir.path()).with_naming(PoseNaming::SingleList);
    let settings = PipelineSettings { precision: Precision::new(3).unwrap(), angle_offset: 0.0 };
    let pipeline = PosePipeline::new(store, settings);

    let report = pipeline.run_file(&input).unwrap();

    assert_eq!(report.save.written, vec![temp_dir.path().join("goals_list.yaml")]);
    let poses = pipeline.store().load().unwrap();
    assert_eq!(poses.len(), 2);
    assert_eq!(poses[1].position_x, 943.0);
    assert_eq!(poses[1].position_y, 404.0);
}

#[test]
fn test_unparseable_document_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("data.geojson");
    fs::write(&input, r#"{ "type": "FeatureCollection" }"#).unwrap();
    let out = temp_dir.path().join("goals");

    let pipeline = PosePipeline::new(YamlPoseStore::new(&out), PipelineSettings::default());
    let err = pipeline.run_file(&input).unwrap_err();

    assert!(err.is_parse());
    assert!(!out.exists());
}

#[test]
fn test_missing_input_file() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline =
        PosePipeline::new(YamlPoseStore::new(temp_dir.path()), PipelineSettings::default());
    let err = pipeline.run_file(&temp_dir.path().join("data.geojson")).unwrap_err();
    assert!(matches!(err, WaypointError::Io(_)));
}

#[test]
fn test_run_source_missing_path() {
    let temp_dir = TempDir::new().unwrap();
    let pipeline =
        PosePipeline::new(YamlPoseStore::new(temp_dir.path()), PipelineSettings::default());
    let missing = temp_dir.path().join("data.geojson");

    let err = pipeline.run_source(&missing.display().to_string()).unwrap_err();

    assert!(matches!(err, WaypointError::Io(_)), "unexpected error: {}", err);
}

#[test]
fn test_empty_drawing_replaces_goal_list() {
    let (temp_dir, input) = setup();
    let store = YamlPoseStore::new(temp_dir.path()).with_naming(PoseNaming::SingleList);
    let pipeline = PosePipeline::new(store, PipelineSettings::default());
    pipeline.run_file(&input).unwrap();
    assert_eq!(pipeline.store().load().unwrap().len(), 2);

    fs::write(&input, r#"{ "type": "FeatureCollection", "features": [] }"#).unwrap();
    let report = pipeline.run_file(&input).unwrap();

    assert_eq!(report.arrow_count, 0);
    assert!(pipeline.store().load().unwrap().is_empty());
}

#[test]
fn test_rerun_overwrites_previous_outputs() {
    let (temp_dir, input) = setup();
    let pipeline =
        PosePipeline::new(YamlPoseStore::new(temp_dir.path()), PipelineSettings::default());

    pipeline.run_file(&input).unwrap();
    let report = pipeline.run_file(&input).unwrap();

    assert!(report.save.all_succeeded());
    assert_eq!(pipeline.store().load().unwrap().len(), 2);
}
