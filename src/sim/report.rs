//! Immutable result of one engine step.

use std::fmt;

use serde::Serialize;

use crate::devices::DeviceStatus;
use crate::sources::SourceType;

/// Energy drawn by one device during a step, with its state as observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceBreakdown {
    pub status: DeviceStatus,
    pub energy_kwh: f64,
}

/// Output of one generator during a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceBreakdown {
    pub name: String,
    pub source_type: SourceType,
    pub output_watts: f64,
    pub energy_kwh: f64,
}

/// Aggregated result of a single simulation step.
///
/// Created fresh by every step; the engine keeps no reference to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Interval length in hours.
    pub duration_hours: f64,
    /// Energy drawn by all devices (kWh).
    pub total_consumption_kwh: f64,
    /// Energy produced by all sources (kWh).
    pub total_generated_kwh: f64,
    /// Billable energy: `max(0, consumption - generation)` (kWh).
    pub net_consumption_kwh: f64,
    /// `net_consumption_kwh * price_per_kwh`.
    pub cost_usd: f64,
    /// One entry per device, in insertion order.
    pub devices: Vec<DeviceBreakdown>,
    /// One entry per source, in insertion order.
    pub sources: Vec<SourceBreakdown>,
}

impl SimulationReport {
    /// Generation in excess of consumption. Never credited or carried over.
    pub fn surplus_kwh(&self) -> f64 {
        (self.total_generated_kwh - self.total_consumption_kwh).max(0.0)
    }

    /// Looks up the breakdown entry for a device by name.
    pub fn device(&self, name: &str) -> Option<&DeviceBreakdown> {
        self.devices.iter().find(|d| d.status.name == name)
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4.1}h | consumed={:>7.3} kWh  generated={:>7.3} kWh  net={:>7.3} kWh | cost=${:.2}",
            self.duration_hours,
            self.total_consumption_kwh,
            self.total_generated_kwh,
            self.net_consumption_kwh,
            self.cost_usd,
        )
    }
}
