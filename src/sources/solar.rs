use crate::error::{Result, ensure_fraction, ensure_non_negative};
use crate::sources::types::{RenewableSource, SourceType};

/// A photovoltaic array whose output scales with sunlight intensity.
///
/// Output is `area × intensity × efficiency` watts. Intensity starts at zero
/// and is fed in by the environment before each step.
///
/// # Examples
///
/// ```
/// use home_energy_sim::sources::{RenewableSource, SolarPanel};
///
/// let mut pv = SolarPanel::new("Rooftop", 10.0, 0.2).unwrap();
/// pv.set_sunlight_intensity(1000.0).unwrap();
/// assert_eq!(pv.output_watts(), 2000.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SolarPanel {
    name: String,

    /// Collector surface in square meters.
    surface_area_m2: f64,

    /// Conversion efficiency as a fraction (0.0 to 1.0).
    efficiency: f64,

    /// Irradiance on the panel in W/m².
    sunlight_intensity_wm2: f64,
}

impl SolarPanel {
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a negative area or an efficiency outside `[0, 1]`.
    pub fn new(name: impl Into<String>, surface_area_m2: f64, efficiency: f64) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            surface_area_m2: ensure_non_negative("surface_area_m2", surface_area_m2)?,
            efficiency: ensure_fraction("efficiency", efficiency)?,
            sunlight_intensity_wm2: 0.0,
        })
    }

    pub fn surface_area_m2(&self) -> f64 {
        self.surface_area_m2
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    pub fn sunlight_intensity_wm2(&self) -> f64 {
        self.sunlight_intensity_wm2
    }

    /// # Errors
    ///
    /// Returns `InvalidArgument` for negative or non-finite intensity; the
    /// stored value is unchanged.
    pub fn set_sunlight_intensity(&mut self, wm2: f64) -> Result<()> {
        self.sunlight_intensity_wm2 = ensure_non_negative("sunlight_intensity_wm2", wm2)?;
        Ok(())
    }
}

impl RenewableSource for SolarPanel {
    fn name(&self) -> &str {
        &self.name
    }

    fn source_type(&self) -> SourceType {
        SourceType::SolarPanel
    }

    fn output_watts(&self) -> f64 {
        self.surface_area_m2 * self.sunlight_intensity_wm2 * self.efficiency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dark_panel_produces_nothing() {
        let pv = SolarPanel::new("PV", 10.0, 0.2).unwrap();
        assert_eq!(pv.output_watts(), 0.0);
    }

    #[test]
    fn output_is_area_times_intensity_times_efficiency() {
        let mut pv = SolarPanel::new("PV", 10.0, 0.2).unwrap();
        pv.set_sunlight_intensity(1000.0).unwrap();
        assert_relative_eq!(pv.output_watts(), 2000.0);
        assert_relative_eq!(pv.energy_over_interval(1.0), 2.0);
    }

    #[test]
    fn negative_intensity_is_rejected_not_clamped() {
        let mut pv = SolarPanel::new("PV", 10.0, 0.2).unwrap();
        pv.set_sunlight_intensity(500.0).unwrap();
        assert!(pv.set_sunlight_intensity(-1.0).unwrap_err().is_invalid_argument());
        assert_eq!(pv.sunlight_intensity_wm2(), 500.0);
    }

    #[test]
    fn constructor_validates_parameters() {
        assert!(SolarPanel::new("PV", -1.0, 0.2).is_err());
        assert!(SolarPanel::new("PV", 10.0, 1.5).is_err());
    }

    #[test]
    fn output_is_idempotent() {
        let mut pv = SolarPanel::new("PV", 7.5, 0.18).unwrap();
        pv.set_sunlight_intensity(640.0).unwrap();
        assert_eq!(pv.output_watts(), pv.output_watts());
    }
}
