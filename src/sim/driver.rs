//! Seeded environment generator that drives the engine from outside.

use rand::distr::{Distribution, Uniform};
use rand::{SeedableRng, rngs::StdRng};

use crate::error::{Result, SimError, ensure_finite};

use super::environment::EnvironmentInputs;

/// Hours in a simulated day.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Generates sunlight, wind, and indoor temperature drift for each step.
///
/// Sunlight follows a triangular daily curve peaking at `solar_noon_hour`;
/// wind speed and temperature drift are drawn uniformly from a seeded RNG,
/// so two drivers built with the same seed produce the same sequence.
///
/// # Examples
///
/// ```
/// use home_energy_sim::sim::driver::EnvironmentDriver;
///
/// let mut driver = EnvironmentDriver::new(1000.0, 12.0, 12.0, 0.0, 10.0, 0.5, 42).unwrap();
/// let noon = driver.inputs_at(12.0);
/// assert_eq!(noon.sunlight_intensity_wm2, 1000.0);
/// assert!(noon.wind_speed_ms < 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct EnvironmentDriver {
    /// Irradiance at solar noon (W/m²).
    pub peak_sunlight_wm2: f64,

    /// Hour of day with peak sunlight.
    pub solar_noon_hour: f64,

    /// Hours from noon to zero sunlight on either side.
    pub daylight_half_span_hours: f64,

    /// Lower bound of the wind speed draw (m/s).
    pub wind_min_ms: f64,

    /// Upper bound of the wind speed draw (m/s).
    pub wind_max_ms: f64,

    /// Largest indoor temperature change per step (°C, symmetric).
    pub max_temperature_drift_c: f64,

    wind: Option<Uniform<f64>>,
    drift: Option<Uniform<f64>>,
    rng: StdRng,
}

impl EnvironmentDriver {
    /// Creates a driver. Negative magnitudes are clamped to zero and an
    /// inverted wind range is reordered.
    ///
    /// # Arguments
    ///
    /// * `peak_sunlight_wm2` - Irradiance at solar noon
    /// * `solar_noon_hour` - Hour of day with peak sunlight
    /// * `daylight_half_span_hours` - Hours from noon to darkness on either side
    /// * `wind_min_ms`, `wind_max_ms` - Bounds of the uniform wind speed draw
    /// * `max_temperature_drift_c` - Bound of the symmetric drift draw
    /// * `seed` - RNG seed
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if any parameter is not finite or a draw
    /// range is too wide to sample.
    pub fn new(
        peak_sunlight_wm2: f64,
        solar_noon_hour: f64,
        daylight_half_span_hours: f64,
        wind_min_ms: f64,
        wind_max_ms: f64,
        max_temperature_drift_c: f64,
        seed: u64,
    ) -> Result<Self> {
        let peak_sunlight_wm2 = ensure_finite("peak_sunlight_wm2", peak_sunlight_wm2)?.max(0.0);
        let solar_noon_hour = ensure_finite("solar_noon_hour", solar_noon_hour)?;
        let daylight_half_span_hours =
            ensure_finite("daylight_half_span_hours", daylight_half_span_hours)?.max(f64::EPSILON);
        let wind_a = ensure_finite("wind_min_ms", wind_min_ms)?.max(0.0);
        let wind_b = ensure_finite("wind_max_ms", wind_max_ms)?.max(0.0);
        let (wind_min_ms, wind_max_ms) = (wind_a.min(wind_b), wind_a.max(wind_b));
        let drift = ensure_finite("max_temperature_drift_c", max_temperature_drift_c)?.abs();

        let wind = sampler("wind_max_ms", wind_min_ms, wind_max_ms)?;
        let drift_range = sampler("max_temperature_drift_c", -drift, drift)?;

        Ok(Self {
            peak_sunlight_wm2,
            solar_noon_hour,
            daylight_half_span_hours,
            wind_min_ms,
            wind_max_ms,
            max_temperature_drift_c: drift,
            wind,
            drift: drift_range,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Sunlight intensity at `time_hr` (hours since simulation start).
    pub fn sunlight_at(&self, time_hr: f64) -> f64 {
        let hour_of_day = time_hr.rem_euclid(HOURS_PER_DAY);
        let distance = (hour_of_day - self.solar_noon_hour).abs();
        self.peak_sunlight_wm2 * (1.0 - distance / self.daylight_half_span_hours).max(0.0)
    }

    /// Draws the environment inputs for the step starting at `time_hr`.
    pub fn inputs_at(&mut self, time_hr: f64) -> EnvironmentInputs {
        let sunlight_intensity_wm2 = self.sunlight_at(time_hr);

        let wind_speed_ms = match &self.wind {
            Some(range) => range.sample(&mut self.rng),
            None => self.wind_min_ms,
        };
        let temperature_drift_c = match &self.drift {
            Some(range) => range.sample(&mut self.rng),
            None => 0.0,
        };

        EnvironmentInputs {
            sunlight_intensity_wm2,
            wind_speed_ms,
            temperature_drift_c,
        }
    }
}

/// Uniform draw over `[low, high)`, or `None` for an empty range.
fn sampler(field: &'static str, low: f64, high: f64) -> Result<Option<Uniform<f64>>> {
    if high <= low {
        return Ok(None);
    }
    Uniform::new(low, high)
        .map(Some)
        .map_err(|_| SimError::invalid(field, high - low, "draw range is not finite"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(seed: u64) -> EnvironmentDriver {
        EnvironmentDriver::new(1000.0, 12.0, 12.0, 0.0, 10.0, 0.5, seed).unwrap()
    }

    #[test]
    fn sunlight_is_triangular_around_noon() {
        let d = driver(0);
        assert_eq!(d.sunlight_at(0.0), 0.0);
        assert_eq!(d.sunlight_at(6.0), 500.0);
        assert_eq!(d.sunlight_at(12.0), 1000.0);
        assert_eq!(d.sunlight_at(18.0), 500.0);
        assert_eq!(d.sunlight_at(30.0), 500.0);
    }

    #[test]
    fn narrow_daylight_window_is_dark_at_night() {
        let d = EnvironmentDriver::new(900.0, 13.0, 6.0, 0.0, 0.0, 0.0, 1).unwrap();
        assert_eq!(d.sunlight_at(5.0), 0.0);
        assert_eq!(d.sunlight_at(22.0), 0.0);
        assert_eq!(d.sunlight_at(13.0), 900.0);
    }

    #[test]
    fn draws_stay_in_range() {
        let mut d = driver(7);
        for t in 0..200 {
            let inputs = d.inputs_at(t as f64);
            assert!((0.0..10.0).contains(&inputs.wind_speed_ms));
            assert!((-0.5..0.5).contains(&inputs.temperature_drift_c));
            assert!(inputs.validate().is_ok());
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = driver(42);
        let mut b = driver(42);
        for t in 0..24 {
            assert_eq!(a.inputs_at(t as f64), b.inputs_at(t as f64));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = driver(42);
        let mut b = driver(43);
        let differs = (0..24).any(|t| a.inputs_at(t as f64) != b.inputs_at(t as f64));
        assert!(differs);
    }

    #[test]
    fn fixed_wind_and_no_drift() {
        let mut d = EnvironmentDriver::new(0.0, 12.0, 12.0, 4.0, 4.0, 0.0, 3).unwrap();
        let inputs = d.inputs_at(0.0);
        assert_eq!(inputs.wind_speed_ms, 4.0);
        assert_eq!(inputs.temperature_drift_c, 0.0);
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        let inf = f64::INFINITY;
        assert!(EnvironmentDriver::new(1000.0, 12.0, 12.0, 0.0, inf, 0.5, 1).is_err());
        assert!(EnvironmentDriver::new(1000.0, 12.0, 12.0, 0.0, 10.0, inf, 1).is_err());
        assert!(EnvironmentDriver::new(f64::NAN, 12.0, 12.0, 0.0, 10.0, 0.5, 1).is_err());
    }

    #[test]
    fn overflowing_drift_range_is_rejected() {
        let err = EnvironmentDriver::new(1000.0, 12.0, 12.0, 0.0, 10.0, 1e308, 1).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
