//! Waypoint Store - Pose store adapters
//!
//! Adapters for the `PoseStore` port defined in `waypoint-core`: YAML files
//! for the navigation stack and an in-memory store for tests and dry runs.
//! `goals` reads saved poses back as map markers.

pub mod goals;
pub mod memory;
pub mod yaml;

pub use goals::{goals_to_geojson, load_goals, GoalOptions};
pub use memory::MemoryPoseStore;
pub use yaml::YamlPoseStore;
