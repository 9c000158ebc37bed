/// Simulation clock for timestep management.
pub mod clock;
/// Seeded sunlight, wind, and temperature generator.
pub mod driver;
pub mod engine;
pub mod environment;
pub mod report;
/// Hour-of-day device automation.
pub mod schedule;
pub mod summary;
pub mod types;
