//! Core run parameters shared by the clock, driver, and runner.

use serde::Serialize;

use crate::error::{Result, SimError, ensure_non_negative};

use super::environment::EnvironmentInputs;
use super::report::SimulationReport;

/// Upper bound on the number of steps in one run.
pub const MAX_STEPS: usize = 1_000_000;

/// Centralized run configuration.
///
/// # Examples
///
/// ```
/// use home_energy_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(24.0, 0.5, 42).unwrap();
/// assert_eq!(cfg.total_steps(), 48);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// Simulated horizon in hours.
    pub hours: f64,
    /// Duration of one step in hours.
    pub step_hours: f64,
    /// Master random seed for reproducibility.
    pub seed: u64,
}

impl SimConfig {
    /// Creates a run configuration.
    ///
    /// # Arguments
    ///
    /// * `hours` - Simulated horizon in hours
    /// * `step_hours` - Duration of one step in hours
    /// * `seed` - Master random seed
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `hours` is negative, `step_hours` is
    /// not strictly positive, or the run would exceed [`MAX_STEPS`].
    pub fn new(hours: f64, step_hours: f64, seed: u64) -> Result<Self> {
        let hours = ensure_non_negative("hours", hours)?;
        let step_hours = ensure_non_negative("step_hours", step_hours)?;
        if step_hours == 0.0 {
            return Err(SimError::invalid("step_hours", step_hours, "must be > 0"));
        }
        let cfg = Self {
            hours,
            step_hours,
            seed,
        };
        cfg.checked_total_steps()?;
        Ok(cfg)
    }

    /// Number of steps needed to cover the horizon. A trailing partial step
    /// counts as a full one.
    pub fn total_steps(&self) -> usize {
        (self.hours / self.step_hours - 1e-9).ceil().max(0.0) as usize
    }

    /// [`SimConfig::total_steps`], bounded by [`MAX_STEPS`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the horizon needs more than
    /// [`MAX_STEPS`] steps or the step count is not finite.
    pub fn checked_total_steps(&self) -> Result<usize> {
        let steps = (self.hours / self.step_hours - 1e-9).ceil();
        if !steps.is_finite() || steps > MAX_STEPS as f64 {
            return Err(SimError::invalid(
                "hours",
                format!("{:e}", self.hours),
                "exceeds the maximum step count",
            ));
        }
        Ok(self.total_steps())
    }
}

/// Complete record of one step: the environment fed in and the report produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    /// Step index.
    pub step: usize,
    /// Simulation time at the start of the step, in hours.
    pub time_hr: f64,
    pub inputs: EnvironmentInputs,
    pub report: SimulationReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_steps_for_even_division() {
        assert_eq!(SimConfig::new(24.0, 1.0, 0).unwrap().total_steps(), 24);
        assert_eq!(SimConfig::new(24.0, 0.25, 0).unwrap().total_steps(), 96);
        assert_eq!(SimConfig::new(0.3, 0.1, 0).unwrap().total_steps(), 3);
    }

    #[test]
    fn partial_step_rounds_up() {
        assert_eq!(SimConfig::new(2.5, 1.0, 0).unwrap().total_steps(), 3);
    }

    #[test]
    fn zero_horizon_has_no_steps() {
        assert_eq!(SimConfig::new(0.0, 1.0, 0).unwrap().total_steps(), 0);
    }

    #[test]
    fn step_count_is_capped() {
        assert!(SimConfig::new(1e300, 1.0, 0).unwrap_err().is_invalid_argument());
        assert!(SimConfig::new(24.0, 1e-300, 0).is_err());
        assert!(SimConfig::new(MAX_STEPS as f64, 1.0, 0).is_ok());

        let cfg = SimConfig {
            hours: 1e300,
            step_hours: 1.0,
            seed: 0,
        };
        assert!(cfg.checked_total_steps().is_err());
    }

    #[test]
    fn rejects_bad_step() {
        assert!(SimConfig::new(24.0, 0.0, 0).is_err());
        assert!(SimConfig::new(24.0, -1.0, 0).is_err());
        assert!(SimConfig::new(-1.0, 1.0, 0).is_err());
    }
}
