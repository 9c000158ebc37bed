//! External signals fed into sources and devices before each step.

use serde::Serialize;

use crate::error::{Result, ensure_finite, ensure_non_negative};

/// Environment readings for one step.
///
/// Produced outside the core (see [`crate::sim::driver::EnvironmentDriver`])
/// and applied with [`crate::sim::engine::SimulationEngine::apply_environment`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EnvironmentInputs {
    /// Irradiance for every solar panel (W/m², >= 0).
    pub sunlight_intensity_wm2: f64,
    /// Wind speed for every turbine (m/s, >= 0).
    pub wind_speed_ms: f64,
    /// Change added to every climate unit's measured indoor temperature (°C).
    pub temperature_drift_c: f64,
}

impl EnvironmentInputs {
    pub fn new(sunlight_intensity_wm2: f64, wind_speed_ms: f64, temperature_drift_c: f64) -> Self {
        Self {
            sunlight_intensity_wm2,
            wind_speed_ms,
            temperature_drift_c,
        }
    }

    /// Checks every field so that application can be all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for negative sunlight or wind, or any
    /// non-finite field.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("sunlight_intensity_wm2", self.sunlight_intensity_wm2)?;
        ensure_non_negative("wind_speed_ms", self.wind_speed_ms)?;
        ensure_finite("temperature_drift_c", self.temperature_drift_c)?;
        Ok(())
    }
}
