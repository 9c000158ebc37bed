//! Scenario execution: build the household, then drive it tick by tick.

use tracing::{debug, info};

use crate::config::ScenarioConfig;
use crate::error::Result;
use crate::sim::clock::{Clock, Tick};
use crate::sim::driver::{EnvironmentDriver, HOURS_PER_DAY};
use crate::sim::engine::SimulationEngine;
use crate::sim::schedule::DeviceSchedule;
use crate::sim::summary::RunSummary;
use crate::sim::types::{SimConfig, StepRecord};
use crate::store::{self, DeviceStore};

/// Everything produced by one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    /// Engine in its end-of-run state.
    pub engine: SimulationEngine,
    /// One record per step, in order.
    pub records: Vec<StepRecord>,
    pub summary: RunSummary,
}

/// Builds an engine with the configured devices and sources.
///
/// # Errors
///
/// Returns `InvalidArgument` for a bad price or device/source parameter and
/// `DuplicateIdentifier` for repeated device names.
pub fn build_engine(config: &ScenarioConfig) -> Result<SimulationEngine> {
    let mut engine = SimulationEngine::new(config.simulation.price_per_kwh)?;
    for device in &config.devices {
        engine.add_device(device.build()?)?;
    }
    add_sources(config, &mut engine)?;
    Ok(engine)
}

/// Builds an engine whose devices come from `store` when it holds any,
/// falling back to the configured devices otherwise.
///
/// # Errors
///
/// As [`build_engine`], plus the store's read errors.
pub fn build_engine_from_store(
    config: &ScenarioConfig,
    store: &impl DeviceStore,
) -> Result<SimulationEngine> {
    let mut engine = SimulationEngine::new(config.simulation.price_per_kwh)?;
    let loaded = store::load_devices(store, &mut engine)?;
    if loaded == 0 {
        return build_engine(config);
    }
    info!(devices = loaded, "household loaded from device store");
    add_sources(config, &mut engine)?;
    Ok(engine)
}

fn add_sources(config: &ScenarioConfig, engine: &mut SimulationEngine) -> Result<()> {
    for source in &config.sources {
        engine.add_renewable_source(source.build()?);
    }
    Ok(())
}

/// Runs a scenario from its configuration.
///
/// # Errors
///
/// Returns the first engine error; see [`build_engine`] and [`run_engine`].
pub fn run_scenario(config: &ScenarioConfig) -> Result<ScenarioRun> {
    let engine = build_engine(config)?;
    run_engine(config, engine)
}

/// Drives an already-built engine through the configured horizon.
///
/// Each tick draws environment inputs, applies them, fires scheduled
/// actions whose hour starts inside the step, then aggregates the step.
///
/// # Errors
///
/// Returns `InvalidArgument` for bad timing, or `UnknownDevice`,
/// `UnsupportedOperation`, or `InvalidArgument` from a scheduled action.
pub fn run_engine(config: &ScenarioConfig, mut engine: SimulationEngine) -> Result<ScenarioRun> {
    let sim = config.sim_config()?;
    let mut driver = config.environment.driver(sim.seed)?;
    let schedule = config.device_schedule();

    let records = simulate(&sim, &mut engine, &mut driver, &schedule)?;
    let summary = RunSummary::from_records(&records);
    info!(
        steps = summary.steps,
        consumption_kwh = summary.total_consumption_kwh,
        cost_usd = summary.total_cost_usd,
        "run complete"
    );

    Ok(ScenarioRun {
        engine,
        records,
        summary,
    })
}

/// Core run loop over explicit components.
///
/// # Arguments
///
/// * `sim` - Horizon, step length, and seed
/// * `engine` - Household to drive; left in its end-of-run state
/// * `driver` - Source of per-step environment inputs
/// * `schedule` - Hour-of-day device automation
///
/// # Returns
///
/// One [`StepRecord`] per step, in order.
///
/// # Errors
///
/// Returns `InvalidArgument` for a horizon past [`crate::sim::types::MAX_STEPS`];
/// otherwise stops at the first failing step and returns its error.
pub fn simulate(
    sim: &SimConfig,
    engine: &mut SimulationEngine,
    driver: &mut EnvironmentDriver,
    schedule: &DeviceSchedule,
) -> Result<Vec<StepRecord>> {
    let total_steps = sim.checked_total_steps()?;
    let mut records = Vec::with_capacity(total_steps);
    let mut clock = Clock::new(total_steps, sim.step_hours);

    clock.try_run(|tick| -> Result<()> {
        // The last step is shortened so the run ends exactly at the horizon.
        let tick = Tick {
            step_hours: tick.step_hours.min(sim.hours - tick.time_hr),
            ..tick
        };

        let inputs = driver.inputs_at(tick.time_hr);
        engine.apply_environment(&inputs)?;

        for hour in tick.hours_started() {
            let hour_of_day = hour % HOURS_PER_DAY as usize;
            for entry in schedule.due_at(hour_of_day) {
                debug!(hour, device = %entry.device, action = entry.action.label(), "scheduled action");
                engine.apply_action_by_name(&entry.device, &entry.action)?;
            }
        }

        let report = engine.step(tick.step_hours)?;
        debug!(
            step = tick.index,
            time_hr = tick.time_hr,
            sunlight_wm2 = inputs.sunlight_intensity_wm2,
            wind_ms = inputs.wind_speed_ms,
            consumption_kwh = report.total_consumption_kwh,
            generated_kwh = report.total_generated_kwh,
            cost_usd = report.cost_usd,
            "step"
        );
        records.push(StepRecord {
            step: tick.index,
            time_hr: tick.time_hr,
            inputs,
            report,
        });
        Ok(())
    })?;

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{Device, HomeDevice};
    use crate::store::MemoryDeviceStore;
    use approx::assert_relative_eq;

    #[test]
    fn baseline_runs_a_day() {
        let run = run_scenario(&ScenarioConfig::baseline()).unwrap();
        assert_eq!(run.records.len(), 24);
        assert_eq!(run.summary.steps, 24);
        assert!(run.summary.total_consumption_kwh > 0.0);
        assert!(run.summary.total_generated_kwh > 0.0);
    }

    #[test]
    fn baseline_schedule_fires() {
        let run = run_scenario(&ScenarioConfig::baseline()).unwrap();
        let hvac = run.engine.device_id("HVAC System").unwrap();
        assert!(!run.engine.device(hvac).unwrap().is_on());

        let at_hour_6 = &run.records[6].report;
        let lamp = at_hour_6.device("Living Room Light").unwrap();
        assert_relative_eq!(lamp.status.power_rating_watts, 3.0);

        let at_hour_18 = &run.records[18].report;
        let hvac_status = &at_hour_18.device("HVAC System").unwrap().status;
        assert_relative_eq!(hvac_status.power_rating_watts, 300.0);
    }

    #[test]
    fn same_seed_same_records() {
        let a = run_scenario(&ScenarioConfig::baseline()).unwrap();
        let b = run_scenario(&ScenarioConfig::baseline()).unwrap();
        assert_eq!(a.records, b.records);
    }

    #[test]
    fn partial_final_step_is_shortened() {
        let mut cfg = ScenarioConfig::solar_surplus();
        cfg.simulation.hours = 2.5;
        let run = run_scenario(&cfg).unwrap();
        assert_eq!(run.records.len(), 3);
        assert_relative_eq!(run.summary.hours, 2.5);
        assert_relative_eq!(run.records[2].report.duration_hours, 0.5);
    }

    #[test]
    fn unknown_scheduled_device_fails_the_run() {
        let mut cfg = ScenarioConfig::solar_surplus();
        cfg.schedule.push(crate::sim::schedule::ScheduleEntry::new(
            0,
            "Garage",
            crate::sim::schedule::DeviceAction::TurnOn,
        ));
        assert!(run_scenario(&cfg).is_err());
    }

    #[test]
    fn store_devices_take_precedence() {
        let cfg = ScenarioConfig::baseline();
        let mut store = MemoryDeviceStore::new();
        store
            .save(&crate::store::DeviceRecord::from(&HomeDevice::from(
                crate::devices::Refrigerator::new("Cellar Fridge", 90.0).unwrap(),
            )))
            .unwrap();

        let engine = build_engine_from_store(&cfg, &store).unwrap();
        assert_eq!(engine.devices().len(), 1);
        assert_eq!(engine.sources().len(), 2);

        let empty = MemoryDeviceStore::new();
        let engine = build_engine_from_store(&cfg, &empty).unwrap();
        assert_eq!(engine.devices().len(), 4);
    }
}
