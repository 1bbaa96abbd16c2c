//! Waypoint Core - Domain models, ports, input formats and configuration
//!
//! This crate contains the core domain types and port definitions shared by
//! the geodesy, storage and pipeline crates.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;
pub mod ports;

pub use error::{Result, WaypointError};
