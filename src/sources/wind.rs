use std::f64::consts::PI;

use crate::error::{Result, ensure_fraction, ensure_non_negative};
use crate::sources::types::{RenewableSource, SourceType};

/// Standard sea-level air density in kg/m³.
pub const AIR_DENSITY_KG_M3: f64 = 1.225;

/// A horizontal-axis wind turbine following the cubic wind-speed law.
///
/// Output is `0.5 × ρ × π(d/2)² × v³ × efficiency` watts.
#[derive(Debug, Clone, PartialEq)]
pub struct WindTurbine {
    name: String,
    blade_diameter_m: f64,
    efficiency: f64,
    wind_speed_ms: f64,
}

impl WindTurbine {
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a negative diameter or an efficiency outside `[0, 1]`.
    pub fn new(name: impl Into<String>, blade_diameter_m: f64, efficiency: f64) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            blade_diameter_m: ensure_non_negative("blade_diameter_m", blade_diameter_m)?,
            efficiency: ensure_fraction("efficiency", efficiency)?,
            wind_speed_ms: 0.0,
        })
    }

    pub fn blade_diameter_m(&self) -> f64 {
        self.blade_diameter_m
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    pub fn wind_speed_ms(&self) -> f64 {
        self.wind_speed_ms
    }

    /// Rotor swept area in m².
    pub fn swept_area_m2(&self) -> f64 {
        let radius = self.blade_diameter_m / 2.0;
        PI * radius * radius
    }

    /// # Errors
    ///
    /// Returns `InvalidArgument` for negative or non-finite speed; the stored
    /// value is unchanged.
    pub fn set_wind_speed(&mut self, ms: f64) -> Result<()> {
        self.wind_speed_ms = ensure_non_negative("wind_speed_ms", ms)?;
        Ok(())
    }
}

impl RenewableSource for WindTurbine {
    fn name(&self) -> &str {
        &self.name
    }

    fn source_type(&self) -> SourceType {
        SourceType::WindTurbine
    }

    fn output_watts(&self) -> f64 {
        0.5 * AIR_DENSITY_KG_M3 * self.swept_area_m2() * self.wind_speed_ms.powi(3) * self.efficiency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn calm_air_produces_nothing() {
        let t = WindTurbine::new("Turbine", 5.0, 0.3).unwrap();
        assert_eq!(t.output_watts(), 0.0);
    }

    #[test]
    fn cubic_law() {
        let mut t = WindTurbine::new("Turbine", 5.0, 0.3).unwrap();
        t.set_wind_speed(10.0).unwrap();
        let expected = 0.5 * 1.225 * PI * 6.25 * 1000.0 * 0.3;
        assert_relative_eq!(t.output_watts(), expected, max_relative = 1e-12);

        let at_ten = t.output_watts();
        t.set_wind_speed(5.0).unwrap();
        assert_relative_eq!(t.output_watts() * 8.0, at_ten, max_relative = 1e-12);
    }

    #[test]
    fn negative_wind_speed_is_rejected() {
        let mut t = WindTurbine::new("Turbine", 5.0, 0.3).unwrap();
        t.set_wind_speed(3.0).unwrap();
        assert!(t.set_wind_speed(-0.1).unwrap_err().is_invalid_argument());
        assert_eq!(t.wind_speed_ms(), 3.0);
    }
}
