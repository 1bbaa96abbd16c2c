//! In-memory pose store for tests and dry runs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use waypoint_core::error::Result;
use waypoint_core::models::{PoseEntry, PoseRecord};
use waypoint_core::ports::{PoseStore, SaveReport};

/// Keeps saved poses keyed by arrow index
///
/// Clones share the same storage, so a clone handed to a pipeline can be
/// inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryPoseStore {
    records: Arc<RwLock<BTreeMap<usize, PoseRecord>>>,
}

impl MemoryPoseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pose saved for arrow `index`, if any
    pub fn get(&self, index: usize) -> Option<PoseRecord> {
        self.records.read().unwrap_or_else(PoisonError::into_inner).get(&index).cloned()
    }

    /// Arrow indices currently stored, ascending
    pub fn indices(&self) -> Vec<usize> {
        self.records.read().unwrap_or_else(PoisonError::into_inner).keys().copied().collect()
    }
}

impl PoseStore for MemoryPoseStore {
    fn save(&self, entries: &[PoseEntry]) -> SaveReport {
        let mut report = SaveReport::new();
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        for entry in entries {
            if records.insert(entry.index, entry.pose.clone()).is_some() {
                tracing::warn!(index = entry.index, "Replacing stored pose");
            }
            report.add_written(PathBuf::from(format!("memory://point{}", entry.index)));
        }
        report
    }

    fn load(&self) -> Result<Vec<PoseRecord>> {
        Ok(self.records.read().unwrap_or_else(PoisonError::into_inner).values().cloned().collect())
    }
}
