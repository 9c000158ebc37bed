//! Renewable generation sources.

/// Photovoltaic array model.
pub mod solar;
pub mod types;
/// Wind turbine model.
pub mod wind;

pub use solar::SolarPanel;
pub use types::{RenewableSource, SourceType};
pub use wind::WindTurbine;

/// Closed set of generators owned by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EnergySource {
    Solar(SolarPanel),
    Wind(WindTurbine),
}

impl EnergySource {
    pub fn as_solar_mut(&mut self) -> Option<&mut SolarPanel> {
        match self {
            Self::Solar(s) => Some(s),
            Self::Wind(_) => None,
        }
    }

    pub fn as_wind_mut(&mut self) -> Option<&mut WindTurbine> {
        match self {
            Self::Wind(w) => Some(w),
            Self::Solar(_) => None,
        }
    }
}

impl RenewableSource for EnergySource {
    fn name(&self) -> &str {
        match self {
            Self::Solar(s) => s.name(),
            Self::Wind(w) => w.name(),
        }
    }

    fn source_type(&self) -> SourceType {
        match self {
            Self::Solar(_) => SourceType::SolarPanel,
            Self::Wind(_) => SourceType::WindTurbine,
        }
    }

    fn output_watts(&self) -> f64 {
        match self {
            Self::Solar(s) => s.output_watts(),
            Self::Wind(w) => w.output_watts(),
        }
    }
}

impl From<SolarPanel> for EnergySource {
    fn from(value: SolarPanel) -> Self {
        Self::Solar(value)
    }
}

impl From<WindTurbine> for EnergySource {
    fn from(value: WindTurbine) -> Self {
        Self::Wind(value)
    }
}
