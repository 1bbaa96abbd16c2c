use std::path::Path;

use waypoint_core::error::{Result, WaypointError};
use waypoint_core::formats::{ArrowDocument, GeoJsonReader};
use waypoint_core::models::{ArrowFeature, PoseEntry};
use waypoint_core::ports::PoseStore;

use crate::assembler::assemble;
use crate::models::{AssembledPose, PipelineSettings, RunReport};

/// Pipeline turning a drawing export into saved poses
///
/// Each arrow is assembled on its own; a failed arrow is recorded in the
/// report and the rest of the batch still goes to the store.
pub struct PosePipeline<S>
where
    S: PoseStore,
{
    store: S,
    settings: PipelineSettings,
}

impl<S> PosePipeline<S>
where
    S: PoseStore,
{
    pub fn new(store: S, settings: PipelineSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run on a GeoJSON file
    ///
    /// A document that cannot be read or parsed fails the whole run before
    /// anything is written.
    pub fn run_file(&self, path: &Path) -> Result<RunReport> {
        let document = GeoJsonReader.read(path)?;
        Ok(self.run_document(&document))
    }

    /// Run on a file path or literal GeoJSON text
    pub fn run_source(&self, source: &str) -> Result<RunReport> {
        let document = ArrowDocument::load(source)?;
        Ok(self.run_document(&document))
    }

    pub fn run_document(&self, document: &ArrowDocument) -> RunReport {
        tracing::info!(source = %document.source_name, "Processing arrows");
        let mut report = self.run_arrows(document.arrows());
        report.source_name = document.source_name.clone();
        report
    }

    /// Assemble and save a sequence of arrows, numbered from 1
    pub fn run_arrows(&self, arrows: impl IntoIterator<Item = ArrowFeature>) -> RunReport {
        let mut arrow_count = 0;
        let mut assembled: Vec<(usize, AssembledPose)> = Vec::new();
        let mut failures = Vec::new();

        for (index, arrow) in (1..).zip(arrows) {
            arrow_count += 1;
            match assemble(&arrow, self.settings.precision, self.settings.angle_offset) {
                Ok(pose) => {
                    tracing::debug!(
                        index,
                        grid = %pose.grid,
                        bearing = pose.bearing,
                        "Assembled pose"
                    );
                    assembled.push((index, pose));
                }
                Err(e) => {
                    tracing::warn!(index, start = %arrow.start, error = %e, "Skipping arrow");
                    failures.push(WaypointError::for_arrow(index, e));
                }
            }
        }

        if arrow_count == 0 {
            tracing::info!("No arrows found");
        }

        let entries: Vec<PoseEntry> =
            assembled.iter().map(|(index, pose)| pose.clone().into_entry(*index)).collect();
        let save = self.store.save(&entries);

        tracing::info!(
            arrows = arrow_count,
            saved = save.written.len(),
            failed = failures.len() + save.failed.len(),
            "Run finished"
        );

        RunReport { source_name: String::new(), arrow_count, assembled, failures, save }
    }
}
