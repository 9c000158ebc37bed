//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use std::path::PathBuf;

use home_energy_sim::devices::{ClimateControl, Light, Refrigerator};
use home_energy_sim::sim::engine::{DeviceId, SimulationEngine, SourceId};
use home_energy_sim::sources::{SolarPanel, WindTurbine};

/// Handles into [`original_household`].
pub struct Household {
    pub engine: SimulationEngine,
    pub living_room: DeviceId,
    pub bedroom: DeviceId,
    pub hvac: DeviceId,
    pub fridge: DeviceId,
    pub solar: SourceId,
    pub wind: SourceId,
}

/// Two lights, HVAC, fridge, 10 m² solar, and a 5 m turbine at $0.30/kWh,
/// everything switched on.
pub fn original_household() -> Household {
    let mut engine = SimulationEngine::new(0.30).unwrap();
    let living_room = engine
        .add_device(Light::new("Living Room Light", 15.0, true).unwrap())
        .unwrap();
    let bedroom = engine
        .add_device(Light::new("Bedroom Light", 10.0, false).unwrap())
        .unwrap();
    let hvac = engine
        .add_device(ClimateControl::new("HVAC System", 1000.0).unwrap())
        .unwrap();
    let fridge = engine
        .add_device(Refrigerator::new("Refrigerator", 150.0).unwrap())
        .unwrap();
    let solar = engine.add_renewable_source(SolarPanel::new("Rooftop Solar", 10.0, 0.2).unwrap());
    let wind = engine.add_renewable_source(WindTurbine::new("Turbine", 5.0, 0.3).unwrap());

    for id in [living_room, bedroom, hvac, fridge] {
        engine.turn_on(id).unwrap();
    }

    Household {
        engine,
        living_room,
        bedroom,
        hvac,
        fridge,
        solar,
        wind,
    }
}

/// A fresh path under the system temp directory, unique per test and process.
pub fn temp_path(test: &str, file: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "home-energy-sim-{}-{test}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(file);
    let _ = std::fs::remove_file(&path);
    path
}
