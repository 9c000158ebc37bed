//! Post-hoc run summary computed from step records.

use std::fmt;

use serde::Serialize;

use super::types::StepRecord;

/// Aggregate indicators derived from a complete run.
///
/// Computed after the fact from the recorded steps so the summary can never
/// disagree with the per-step telemetry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of steps recorded.
    pub steps: usize,
    /// Simulated hours covered.
    pub hours: f64,
    /// Energy drawn by all devices (kWh).
    pub total_consumption_kwh: f64,
    /// Energy produced by all sources (kWh).
    pub total_generated_kwh: f64,
    /// Billable energy summed over steps (kWh).
    pub total_net_kwh: f64,
    /// Generation that exceeded demand and was not credited (kWh).
    pub total_surplus_kwh: f64,
    /// Sum of per-step costs (USD).
    pub total_cost_usd: f64,
    /// Largest single-step billable energy (kWh).
    pub peak_net_kwh: f64,
    /// Index of the step with the largest billable energy.
    pub peak_net_step: Option<usize>,
    /// Share of consumption covered by local generation (%).
    pub self_sufficiency_pct: f64,
}

impl RunSummary {
    /// Computes the summary from the complete step record vector.
    pub fn from_records(records: &[StepRecord]) -> Self {
        let mut summary = Self {
            steps: records.len(),
            ..Self::default()
        };

        for r in records {
            let report = &r.report;
            summary.hours += report.duration_hours;
            summary.total_consumption_kwh += report.total_consumption_kwh;
            summary.total_generated_kwh += report.total_generated_kwh;
            summary.total_net_kwh += report.net_consumption_kwh;
            summary.total_surplus_kwh += report.surplus_kwh();
            summary.total_cost_usd += report.cost_usd;

            if summary.peak_net_step.is_none() || report.net_consumption_kwh > summary.peak_net_kwh
            {
                summary.peak_net_kwh = report.net_consumption_kwh;
                summary.peak_net_step = Some(r.step);
            }
        }

        summary.self_sufficiency_pct = if summary.total_consumption_kwh > 0.0 {
            100.0 * (summary.total_consumption_kwh - summary.total_net_kwh)
                / summary.total_consumption_kwh
        } else {
            0.0
        };

        summary
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Run Summary ---")?;
        writeln!(f, "Steps:                 {} ({:.2} h)", self.steps, self.hours)?;
        writeln!(f, "Total consumption:     {:.3} kWh", self.total_consumption_kwh)?;
        writeln!(f, "Total generation:      {:.3} kWh", self.total_generated_kwh)?;
        writeln!(f, "Net consumption:       {:.3} kWh", self.total_net_kwh)?;
        writeln!(f, "Uncredited surplus:    {:.3} kWh", self.total_surplus_kwh)?;
        match self.peak_net_step {
            Some(step) => writeln!(
                f,
                "Peak net step:         {:.3} kWh at step {step}",
                self.peak_net_kwh
            )?,
            None => writeln!(f, "Peak net step:         n/a")?,
        }
        writeln!(f, "Self-sufficiency:      {:.1}%", self.self_sufficiency_pct)?;
        write!(f, "Total cost:            ${:.2}", self.total_cost_usd)
    }
}
