//! Household power consumers.

/// Fan-driven heating/cooling unit.
pub mod climate;
pub mod home;
/// Dimmable light with optional occupancy sensor.
pub mod light;
pub mod refrigerator;
pub mod types;

// Re-export the main types for convenience
pub use climate::ClimateControl;
pub use home::HomeDevice;
pub use light::Light;
pub use refrigerator::Refrigerator;
pub use types::{Device, DeviceDetails, DeviceStatus, DeviceType};
