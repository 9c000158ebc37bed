//! Smart-home energy simulator: household devices, renewable generation,
//! and per-step consumption, generation, and cost accounting.

pub mod cli;
pub mod config;
pub mod devices;
pub mod error;
pub mod io;
pub mod runner;
/// Simulation engine, environment, scheduling, and run summary modules.
pub mod sim;
pub mod sources;
/// Device persistence.
pub mod store;
pub mod telemetry;

pub use error::{Result, SimError};
