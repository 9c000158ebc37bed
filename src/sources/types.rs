//! Common types and traits for renewable generators.

use std::fmt;

use serde::Serialize;

/// Closed set of generator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceType {
    SolarPanel,
    WindTurbine,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SolarPanel => "SolarPanel",
            Self::WindTurbine => "WindTurbine",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generator producing instantaneous power from its stored parameters.
pub trait RenewableSource {
    fn name(&self) -> &str;

    fn source_type(&self) -> SourceType;

    /// Instantaneous output in watts (always `>= 0`).
    ///
    /// Pure: repeated calls with unchanged inputs return identical values.
    fn output_watts(&self) -> f64;

    /// Energy produced over `hours` at the current output, in kWh.
    fn energy_over_interval(&self, hours: f64) -> f64 {
        self.output_watts() * hours / 1000.0
    }
}
