//! YAML pose files
//!
//! One mapping per pose:
//!
//! ```yaml
//! position_x: 94342.0
//! position_y: 40445.0
//! position_z: 0.0
//! orientation_x: 0.0
//! orientation_y: 0.0
//! orientation_z: 0.7071067811865476
//! orientation_w: 0.7071067811865476
//! grid_square: 33UWU
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use waypoint_core::error::{Result, WaypointError};
use waypoint_core::models::{PoseEntry, PoseNaming, PoseRecord, UnitQuaternion};
use waypoint_core::ports::{PoseStore, SaveReport};

pub const DEFAULT_LIST_FILE: &str = "goals_list.yaml";

const RECORD_PREFIX: &str = "point";
const RECORD_EXTENSION: &str = "yaml";

/// On-disk layout of a single pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct PoseFile {
    pub position_x: f64,
    pub position_y: f64,
    #[serde(default)]
    pub position_z: f64,
    #[serde(default)]
    pub orientation_x: f64,
    #[serde(default)]
    pub orientation_y: f64,
    pub orientation_z: f64,
    pub orientation_w: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_square: Option<String>,
}

impl PoseFile {
    fn from_record(record: &PoseRecord, with_grid_square: bool) -> Self {
        Self {
            position_x: record.position_x,
            position_y: record.position_y,
            position_z: record.position_z,
            orientation_x: record.orientation.x,
            orientation_y: record.orientation.y,
            orientation_z: record.orientation.z,
            orientation_w: record.orientation.w,
            grid_square: if with_grid_square { record.grid_square.clone() } else { None },
        }
    }

    fn into_record(self) -> PoseRecord {
        PoseRecord {
            position_x: self.position_x,
            position_y: self.position_y,
            position_z: self.position_z,
            orientation: UnitQuaternion::new(
                self.orientation_x,
                self.orientation_y,
                self.orientation_z,
                self.orientation_w,
            ),
            grid_square: self.grid_square,
        }
    }
}

/// Pose store writing YAML files into a directory
#[derive(Debug, Clone)]
pub struct YamlPoseStore {
    dir: PathBuf,
    naming: PoseNaming,
    list_file: String,
    persist_grid_square: bool,
}

impl YamlPoseStore {
    /// Store with per-record naming that persists the grid square
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            naming: PoseNaming::default(),
            list_file: DEFAULT_LIST_FILE.to_string(),
            persist_grid_square: true,
        }
    }

    pub fn with_naming(mut self, naming: PoseNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_list_file(mut self, list_file: impl Into<String>) -> Self {
        self.list_file = list_file.into();
        self
    }

    /// Omit the `grid_square` key for consumers that reject unknown keys
    pub fn persist_grid_square(mut self, persist: bool) -> Self {
        self.persist_grid_square = persist;
        self
    }

    /// File written for the pose of arrow `index`
    pub fn record_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}{}.{}", RECORD_PREFIX, index, RECORD_EXTENSION))
    }

    pub fn list_path(&self) -> PathBuf {
        self.dir.join(&self.list_file)
    }

    fn save_per_record(&self, entries: &[PoseEntry], report: &mut SaveReport) {
        for entry in entries {
            let path = self.record_path(entry.index);
            let file = PoseFile::from_record(&entry.pose, self.persist_grid_square);

            match serialize(&file).and_then(|yaml| write_file(&path, &yaml)) {
                Ok(()) => report.add_written(path),
                Err(e) => {
                    tracing::warn!(index = entry.index, error = %e, "Failed to write pose");
                    report.add_failure(vec![entry.index], e);
                }
            }
        }
    }

    fn save_list(&self, entries: &[PoseEntry], report: &mut SaveReport) {
        let path = self.list_path();
        let files: Vec<PoseFile> = entries
            .iter()
            .map(|entry| PoseFile::from_record(&entry.pose, self.persist_grid_square))
            .collect();

        match serialize(&files).and_then(|yaml| write_file(&path, &yaml)) {
            Ok(()) => report.add_written(path),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to write goal list");
                report.add_failure(entries.iter().map(|entry| entry.index).collect(), e);
            }
        }
    }

    fn load_per_record(&self) -> Result<Vec<PoseRecord>> {
        let mut indexed = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if let Some(index) = record_index(&path) {
                indexed.push((index, read_pose_file(&path)?));
            }
        }
        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, record)| record).collect())
    }

    fn load_list(&self) -> Result<Vec<PoseRecord>> {
        let path = self.list_path();
        let content = fs::read_to_string(&path)?;
        let files: Vec<PoseFile> = serde_yaml::from_str(&content).map_err(|e| {
            WaypointError::Parse { source_name: path.display().to_string(), reason: e.to_string() }
        })?;
        Ok(files.into_iter().map(PoseFile::into_record).collect())
    }
}

impl PoseStore for YamlPoseStore {
    fn save(&self, entries: &[PoseEntry]) -> SaveReport {
        let mut report = SaveReport::new();
        // An empty list still replaces the previous run's list
        if entries.is_empty() && self.naming == PoseNaming::PerRecord {
            return report;
        }

        if let Err(source) = fs::create_dir_all(&self.dir) {
            let error = WaypointError::Write { path: self.dir.clone(), source };
            tracing::warn!(error = %error, "Cannot create output directory");
            report.add_failure(entries.iter().map(|entry| entry.index).collect(), error);
            return report;
        }

        match self.naming {
            PoseNaming::PerRecord => self.save_per_record(entries, &mut report),
            PoseNaming::SingleList => self.save_list(entries, &mut report),
        }

        tracing::debug!(
            written = report.written.len(),
            failed = report.failed.len(),
            naming = %self.naming,
            "Saved poses"
        );
        report
    }

    fn load(&self) -> Result<Vec<PoseRecord>> {
        match self.naming {
            PoseNaming::PerRecord => self.load_per_record(),
            PoseNaming::SingleList => self.load_list(),
        }
    }
}

/// Arrow index encoded in a `point{index}.yaml` file name
fn record_index(path: &Path) -> Option<usize> {
    if path.extension()?.to_str()? != RECORD_EXTENSION {
        return None;
    }
    path.file_stem()?.to_str()?.strip_prefix(RECORD_PREFIX)?.parse().ok()
}

fn read_pose_file(path: &Path) -> Result<PoseRecord> {
    let content = fs::read_to_string(path)?;
    let file: PoseFile = serde_yaml::from_str(&content).map_err(|e| WaypointError::Parse {
        source_name: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(file.into_record())
}

fn serialize<T: Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| WaypointError::Serialization(e.to_string()))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if path.is_file() {
        tracing::warn!(path = %path.display(), "Overwriting existing pose file");
    }
    fs::write(path, content)
        .map_err(|source| WaypointError::Write { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn pose(x: f64, y: f64) -> PoseRecord {
        let half = std::f64::consts::FRAC_1_SQRT_2;
        PoseRecord::new(x, y, UnitQuaternion::new(0.0, 0.0, half, half)).with_grid_square("33UWU")
    }

    #[test]
    fn test_per_record_files_use_arrow_index() {
        let temp_dir = TempDir::new().unwrap();
        let store = YamlPoseStore::new(temp_dir.path());

        let entries = vec![PoseEntry::new(1, pose(1.0, 2.0)), PoseEntry::new(3, pose(3.0, 4.0))];
        let report = store.save(&entries);

        assert!(report.all_succeeded());
        assert_eq!(report.written, vec![store.record_path(1), store.record_path(3)]);
        assert!(temp_dir.path().join("point1.yaml").exists());
        assert!(!temp_dir.path().join("point2.yaml").exists());
        assert!(temp_dir.path().join("point3.yaml").exists());
    }

    #[test]
    fn test_record_layout() {
        let temp_dir = TempDir::new().unwrap();
        let store = YamlPoseStore::new(temp_dir.path());
        store.save(&[PoseEntry::new(1, pose(94342.0, 40445.0))]);

        let content = fs::read_to_string(temp_dir.path().join("point1.yaml")).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&content).unwrap();
        assert_eq!(value["position_x"].as_f64(), Some(94342.0));
        assert_eq!(value["position_y"].as_f64(), Some(40445.0));
        assert_eq!(value["position_z"].as_f64(), Some(0.0));
        assert_eq!(value["orientation_x"].as_f64(), Some(0.0));
        assert_eq!(value["grid_square"].as_str(), Some("33UWU"));

        let keys: Vec<_> = content.lines().filter_map(|l| l.split(':').next()).collect();
        assert_eq!(&keys[..3], &["position_x", "position_y", "position_z"]);
    }

    #[test]
    fn test_grid_square_can_be_omitted() {
        let temp_dir = TempDir::new().unwrap();
        let store = YamlPoseStore::new(temp_dir.path()).persist_grid_square(false);
        store.save(&[PoseEntry::new(1, pose(1.0, 2.0))]);

        let content = fs::read_to_string(store.record_path(1)).unwrap();
        assert!(!content.contains("grid_square"));
    }

    #[test]
    fn test_round_trip_per_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = YamlPoseStore::new(temp_dir.path());
        let entries: Vec<_> =
            (1..=12).map(|i| PoseEntry::new(i, pose(i as f64, 0.0))).collect();
        store.save(&entries);

        // point10.yaml sorts before point2.yaml by name, not by index
        let loaded = store.load().unwrap();
        let xs: Vec<_> = loaded.iter().map(|r| r.position_x).collect();
        assert_eq!(xs, (1..=12).map(|i| i as f64).collect::<Vec<_>>());
        assert_eq!(loaded[0], pose(1.0, 0.0));
    }

    #[test]
    fn test_single_list() {
        let temp_dir = TempDir::new().unwrap();
        let store = YamlPoseStore::new(temp_dir.path()).with_naming(PoseNaming::SingleList);

        let entries = vec![PoseEntry::new(1, pose(1.0, 2.0)), PoseEntry::new(2, pose(3.0, 4.0))];
        let report = store.save(&entries);

        assert_eq!(report.written, vec![temp_dir.path().join(DEFAULT_LIST_FILE)]);
        assert!(!temp_dir.path().join("point1.yaml").exists());
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_run_clears_single_list() {
        let temp_dir = TempDir::new().unwrap();
        let store = YamlPoseStore::new(temp_dir.path()).with_naming(PoseNaming::SingleList);
        store.save(&[PoseEntry::new(1, pose(1.0, 2.0)), PoseEntry::new(2, pose(3.0, 4.0))]);

        let report = store.save(&[]);

        assert_eq!(report.written, vec![store.list_path()]);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_empty_run_writes_no_record_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = YamlPoseStore::new(temp_dir.path().join("goals"));

        let report = store.save(&[]);

        assert!(report.written.is_empty());
        assert!(!temp_dir.path().join("goals").exists());
    }

    #[test]
    fn test_existing_file_is_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let store = YamlPoseStore::new(temp_dir.path());
        fs::write(store.record_path(1), "stale").unwrap();

        let report = store.save(&[PoseEntry::new(1, pose(5.0, 6.0))]);
        assert!(report.all_succeeded());
        assert_eq!(store.load().unwrap()[0].position_x, 5.0);
    }

    #[test]
    fn test_one_failed_write_does_not_stop_the_rest() {
        let temp_dir = TempDir::new().unwrap();
        let store = YamlPoseStore::new(temp_dir.path());
        // A directory where point2.yaml should go makes that write fail
        fs::create_dir(store.record_path(2)).unwrap();

        let entries: Vec<_> = (1..=3).map(|i| PoseEntry::new(i, pose(i as f64, 0.0))).collect();
        let report = store.save(&entries);

        assert_eq!(report.written, vec![store.record_path(1), store.record_path(3)]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].indices, vec![2]);
        assert!(matches!(report.failed[0].error, WaypointError::Write { .. }));
    }

    #[test]
    fn test_output_directory_is_created() {
        let temp_dir = TempDir::new().unwrap();
        let store = YamlPoseStore::new(temp_dir.path().join("goals").join("today"));
        let report = store.save(&[PoseEntry::new(1, pose(1.0, 1.0))]);
        assert!(report.all_succeeded());
        assert!(store.record_path(1).exists());
    }

    #[test]
    fn test_record_index() {
        assert_eq!(record_index(Path::new("out/point7.yaml")), Some(7));
        assert_eq!(record_index(Path::new("out/point7.yml")), None);
        assert_eq!(record_index(Path::new("out/goals_list.yaml")), None);
        assert_eq!(record_index(Path::new("out/pointx.yaml")), None);
    }
}
