use serde::Serialize;
use waypoint_pipeline::RunReport;

use crate::output::OutputWriter;
use crate::output_types::{FailureRow, PoseRow};

/// Summary of one processing run
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub source: String,
    pub arrow_count: usize,
    pub dry_run: bool,
    pub complete: bool,
    pub poses: Vec<PoseRow>,
    pub written: Vec<String>,
    pub failures: Vec<FailureRow>,
}

impl RunSummary {
    pub fn from_report(report: &RunReport, dry_run: bool) -> Self {
        let poses = report
            .assembled
            .iter()
            .map(|(index, assembled)| PoseRow {
                index: *index,
                grid: assembled.grid.to_string(),
                bearing: assembled.bearing,
                position_x: assembled.pose.position_x,
                position_y: assembled.pose.position_y,
                orientation_z: assembled.pose.orientation.z,
                orientation_w: assembled.pose.orientation.w,
            })
            .collect();

        let arrow_failures = report.failures.iter().map(|error| FailureRow {
            arrows: arrow_index(error).map(|i| i.to_string()).unwrap_or_default(),
            error: error.to_string(),
        });
        let write_failures = report.save.failed.iter().map(|failure| FailureRow {
            arrows: join_indices(&failure.indices),
            error: failure.error.to_string(),
        });

        Self {
            source: report.source_name.clone(),
            arrow_count: report.arrow_count,
            dry_run,
            complete: report.is_complete(),
            poses,
            written: report.save.written.iter().map(|p| p.display().to_string()).collect(),
            failures: arrow_failures.chain(write_failures).collect(),
        }
    }

    /// Display summary to output
    pub fn display(self, output: &OutputWriter) -> anyhow::Result<()> {
        if output.is_json() {
            let status = if self.complete { "success" } else { "partial" };
            return output.result(status, self);
        }

        let failed = self.failures.len();
        output.section("Poses");
        output.table(self.poses);

        if !self.dry_run && !self.written.is_empty() {
            output.section("Written");
            for path in &self.written {
                output.info(path);
            }
        }

        if !self.failures.is_empty() {
            output.section("Failures");
            output.table(self.failures);
        }

        output.section("Summary");
        output.kv("Source", &self.source);
        output.kv("Arrows", self.arrow_count);
        output.kv("Failed", failed);
        if self.dry_run {
            output.info("Dry run: nothing was written");
        }
        Ok(())
    }
}

fn arrow_index(error: &waypoint_core::WaypointError) -> Option<usize> {
    match error {
        waypoint_core::WaypointError::Pipeline { index, .. } => Some(*index),
        _ => None,
    }
}

fn join_indices(indices: &[usize]) -> String {
    indices.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}
