use std::path::PathBuf;

use crate::error::{Result, WaypointError};
use crate::models::{PoseEntry, PoseRecord};

/// Port for persisting pose records
///
/// `save` never fails as a whole: a write problem for one output is recorded
/// in the returned report and the remaining outputs are still attempted.
pub trait PoseStore {
    /// Persist a batch of poses, overwriting earlier outputs of the same name
    fn save(&self, entries: &[PoseEntry]) -> SaveReport;

    /// Read back every pose this store holds
    fn load(&self) -> Result<Vec<PoseRecord>>;
}

/// Outcome of one `PoseStore::save` call
#[derive(Debug, Default)]
pub struct SaveReport {
    /// Locations that were written
    pub written: Vec<PathBuf>,

    /// Outputs that could not be written
    pub failed: Vec<SaveFailure>,
}

/// A pose (or list of poses) that could not be persisted
#[derive(Debug)]
pub struct SaveFailure {
    /// Arrow indices whose poses were lost
    pub indices: Vec<usize>,
    pub error: WaypointError,
}

impl SaveReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_written(&mut self, path: PathBuf) {
        self.written.push(path);
    }

    pub fn add_failure(&mut self, indices: Vec<usize>, error: WaypointError) {
        self.failed.push(SaveFailure { indices, error });
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}
