//! Waypoint Pipeline - Arrow to pose runs
//!
//! Assembles one pose per drawn arrow and hands the batch to a `PoseStore`.

pub mod assembler;
pub mod models;
pub mod pipeline;

pub use assembler::assemble;
pub use models::{AssembledPose, PipelineSettings, RunReport};
pub use pipeline::PosePipeline;
