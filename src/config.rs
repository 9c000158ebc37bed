//! TOML-based scenario configuration and preset definitions.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::devices::{ClimateControl, HomeDevice, Light, Refrigerator};
use crate::error::Result;
use crate::sim::driver::{EnvironmentDriver, HOURS_PER_DAY};
use crate::sim::schedule::{DeviceAction, DeviceSchedule, ScheduleEntry};
use crate::sim::types::SimConfig;
use crate::sources::{EnergySource, SolarPanel, WindTurbine};

/// Top-level scenario configuration parsed from TOML.
///
/// Section defaults match the baseline scenario. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::baseline`]
/// for the built-in household.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run horizon, step, seed, and tariff.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Environment generator parameters.
    #[serde(default)]
    pub environment: EnvironmentConfig,
    /// Household devices, in registration order.
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
    /// Renewable sources, in registration order.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
    /// Hour-of-day device automation.
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
}

/// Run horizon, step, seed, and tariff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Simulated hours (>= 0).
    pub hours: f64,
    /// Step length in hours (> 0).
    pub step_hours: f64,
    /// Master random seed.
    pub seed: u64,
    /// Grid electricity price (USD per kWh, >= 0).
    pub price_per_kwh: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            hours: 24.0,
            step_hours: 1.0,
            seed: 42,
            price_per_kwh: 0.30,
        }
    }
}

/// Environment generator parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Irradiance at solar noon (W/m²).
    pub peak_sunlight_wm2: f64,
    /// Hour of day with peak sunlight.
    pub solar_noon_hour: f64,
    /// Hours from noon to darkness on either side.
    pub daylight_half_span_hours: f64,
    /// Lower bound of the wind speed draw (m/s).
    pub wind_min_ms: f64,
    /// Upper bound of the wind speed draw (m/s).
    pub wind_max_ms: f64,
    /// Largest per-step indoor temperature change (°C).
    pub max_temperature_drift_c: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            peak_sunlight_wm2: 1000.0,
            solar_noon_hour: 12.0,
            daylight_half_span_hours: 12.0,
            wind_min_ms: 0.0,
            wind_max_ms: 10.0,
            max_temperature_drift_c: 0.5,
        }
    }
}

impl EnvironmentConfig {
    /// Builds the seeded environment driver for a run.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a non-finite parameter or an
    /// unsampleable wind or drift range.
    pub fn driver(&self, seed: u64) -> Result<EnvironmentDriver> {
        EnvironmentDriver::new(
            self.peak_sunlight_wm2,
            self.solar_noon_hour,
            self.daylight_half_span_hours,
            self.wind_min_ms,
            self.wind_max_ms,
            self.max_temperature_drift_c,
            seed,
        )
    }
}

/// One household device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DeviceConfig {
    Light {
        name: String,
        /// Wattage at full brightness.
        watts: f64,
        #[serde(default)]
        occupancy_sensor: bool,
        /// Initial brightness (0..=100); full brightness when omitted.
        #[serde(default)]
        brightness_percent: Option<i32>,
        #[serde(default)]
        on: bool,
    },
    ClimateControl {
        name: String,
        watts: f64,
        #[serde(default)]
        target_temperature_c: Option<f64>,
        #[serde(default)]
        current_temperature_c: Option<f64>,
        /// Initial fan speed (0..=3); replaces `watts` with the fan table value.
        #[serde(default)]
        fan_speed: Option<i32>,
        #[serde(default)]
        on: bool,
    },
    Refrigerator {
        name: String,
        watts: f64,
        #[serde(default)]
        internal_temperature_c: Option<f64>,
        #[serde(default)]
        on: bool,
    },
}

impl DeviceConfig {
    pub fn name(&self) -> &str {
        match self {
            Self::Light { name, .. }
            | Self::ClimateControl { name, .. }
            | Self::Refrigerator { name, .. } => name,
        }
    }

    /// Constructs the device in its configured initial state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for any out-of-range value.
    pub fn build(&self) -> Result<HomeDevice> {
        let device = match self {
            Self::Light {
                name,
                watts,
                occupancy_sensor,
                brightness_percent,
                on,
            } => {
                let mut light = Light::new(name.clone(), *watts, *occupancy_sensor)?;
                if let Some(level) = brightness_percent {
                    light.dim(*level)?;
                }
                light.set_on(*on);
                HomeDevice::from(light)
            }
            Self::ClimateControl {
                name,
                watts,
                target_temperature_c,
                current_temperature_c,
                fan_speed,
                on,
            } => {
                let mut unit = ClimateControl::new(name.clone(), *watts)?;
                if let Some(celsius) = target_temperature_c {
                    unit.set_target_temperature_c(*celsius)?;
                }
                if let Some(celsius) = current_temperature_c {
                    unit.set_current_temperature_c(*celsius)?;
                }
                if let Some(speed) = fan_speed {
                    unit.set_fan_speed(*speed)?;
                }
                unit.set_on(*on);
                HomeDevice::from(unit)
            }
            Self::Refrigerator {
                name,
                watts,
                internal_temperature_c,
                on,
            } => {
                let mut fridge = Refrigerator::new(name.clone(), *watts)?;
                if let Some(celsius) = internal_temperature_c {
                    fridge.set_internal_temperature_c(*celsius)?;
                }
                fridge.set_on(*on);
                HomeDevice::from(fridge)
            }
        };
        Ok(device)
    }
}

/// One renewable source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SourceConfig {
    SolarPanel {
        name: String,
        surface_area_m2: f64,
        efficiency: f64,
    },
    WindTurbine {
        name: String,
        blade_diameter_m: f64,
        efficiency: f64,
    },
}

impl SourceConfig {
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a negative size or an efficiency outside `[0, 1]`.
    pub fn build(&self) -> Result<EnergySource> {
        Ok(match self {
            Self::SolarPanel {
                name,
                surface_area_m2,
                efficiency,
            } => SolarPanel::new(name.clone(), *surface_area_m2, *efficiency)?.into(),
            Self::WindTurbine {
                name,
                blade_diameter_m,
                efficiency,
            } => WindTurbine::new(name.clone(), *blade_diameter_m, *efficiency)?.into(),
        })
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.step_hours"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

fn light(name: &str, watts: f64, occupancy_sensor: bool) -> DeviceConfig {
    DeviceConfig::Light {
        name: name.to_string(),
        watts,
        occupancy_sensor,
        brightness_percent: None,
        on: true,
    }
}

fn fridge(name: &str, watts: f64) -> DeviceConfig {
    DeviceConfig::Refrigerator {
        name: name.to_string(),
        watts,
        internal_temperature_c: None,
        on: true,
    }
}

fn hvac(name: &str, watts: f64) -> DeviceConfig {
    DeviceConfig::ClimateControl {
        name: name.to_string(),
        watts,
        target_temperature_c: None,
        current_temperature_c: Some(28.0),
        fan_speed: None,
        on: true,
    }
}

fn solar(name: &str, surface_area_m2: f64, efficiency: f64) -> SourceConfig {
    SourceConfig::SolarPanel {
        name: name.to_string(),
        surface_area_m2,
        efficiency,
    }
}

fn wind(name: &str, blade_diameter_m: f64, efficiency: f64) -> SourceConfig {
    SourceConfig::WindTurbine {
        name: name.to_string(),
        blade_diameter_m,
        efficiency,
    }
}

impl ScenarioConfig {
    /// Returns the baseline household: two lights, HVAC, fridge, rooftop
    /// solar, and a small turbine at $0.30/kWh, with the morning, evening,
    /// and night automation.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            environment: EnvironmentConfig::default(),
            devices: vec![
                light("Living Room Light", 15.0, true),
                light("Bedroom Light", 10.0, false),
                hvac("HVAC System", 1000.0),
                fridge("Refrigerator", 150.0),
            ],
            sources: vec![
                solar("Rooftop Solar", 10.0, 0.2),
                wind("Backyard Turbine", 5.0, 0.3),
            ],
            schedule: vec![
                ScheduleEntry::new(6, "Living Room Light", DeviceAction::Dim { level: 20 }),
                ScheduleEntry::new(
                    6,
                    "HVAC System",
                    DeviceAction::SetTargetTemperature { celsius: 24.0 },
                ),
                ScheduleEntry::new(6, "HVAC System", DeviceAction::SetFanSpeed { speed: 1 }),
                ScheduleEntry::new(18, "Living Room Light", DeviceAction::Dim { level: 80 }),
                ScheduleEntry::new(
                    18,
                    "HVAC System",
                    DeviceAction::SetTargetTemperature { celsius: 22.0 },
                ),
                ScheduleEntry::new(18, "HVAC System", DeviceAction::SetFanSpeed { speed: 2 }),
                ScheduleEntry::new(22, "HVAC System", DeviceAction::TurnOff),
            ],
        }
    }

    /// Returns the solar-surplus preset: a fridge under a 10 m² array on a
    /// cheap tariff, so daytime generation far exceeds demand.
    pub fn solar_surplus() -> Self {
        Self {
            simulation: SimulationConfig {
                price_per_kwh: 0.12,
                ..SimulationConfig::default()
            },
            environment: EnvironmentConfig {
                wind_max_ms: 0.0,
                max_temperature_drift_c: 0.0,
                ..EnvironmentConfig::default()
            },
            devices: vec![fridge("Refrigerator", 150.0)],
            sources: vec![solar("Rooftop Solar", 10.0, 0.2)],
            schedule: Vec::new(),
        }
    }

    /// Returns the all-electric preset: a larger household with two HVAC
    /// zones, no wind, and a pricier tariff.
    pub fn all_electric() -> Self {
        Self {
            simulation: SimulationConfig {
                hours: 48.0,
                step_hours: 0.5,
                price_per_kwh: 0.42,
                ..SimulationConfig::default()
            },
            environment: EnvironmentConfig {
                peak_sunlight_wm2: 850.0,
                daylight_half_span_hours: 7.0,
                wind_max_ms: 0.0,
                max_temperature_drift_c: 1.0,
                ..EnvironmentConfig::default()
            },
            devices: vec![
                light("Kitchen Light", 20.0, true),
                light("Living Room Light", 15.0, true),
                light("Bedroom Light", 10.0, false),
                hvac("Upstairs HVAC", 1000.0),
                hvac("Downstairs HVAC", 1500.0),
                fridge("Refrigerator", 150.0),
                fridge("Garage Freezer", 200.0),
            ],
            sources: vec![solar("Rooftop Solar", 25.0, 0.21)],
            schedule: vec![
                ScheduleEntry::new(7, "Upstairs HVAC", DeviceAction::SetFanSpeed { speed: 1 }),
                ScheduleEntry::new(7, "Downstairs HVAC", DeviceAction::SetFanSpeed { speed: 2 }),
                ScheduleEntry::new(9, "Bedroom Light", DeviceAction::TurnOff),
                ScheduleEntry::new(19, "Bedroom Light", DeviceAction::TurnOn),
                ScheduleEntry::new(19, "Kitchen Light", DeviceAction::Dim { level: 60 }),
                ScheduleEntry::new(23, "Downstairs HVAC", DeviceAction::SetFanSpeed { speed: 0 }),
                ScheduleEntry::new(23, "Kitchen Light", DeviceAction::TurnOff),
            ],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "solar_surplus", "all_electric"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "solar_surplus" => Ok(Self::solar_surplus()),
            "all_electric" => Ok(Self::all_electric()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Run parameters derived from the `[simulation]` section.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a negative horizon or a non-positive step.
    pub fn sim_config(&self) -> Result<SimConfig> {
        let s = &self.simulation;
        SimConfig::new(s.hours, s.step_hours, s.seed)
    }

    /// The `[[schedule]]` entries as a runnable schedule.
    pub fn device_schedule(&self) -> DeviceSchedule {
        DeviceSchedule::new(self.schedule.clone())
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if !(s.hours.is_finite() && s.hours >= 0.0) {
            errors.push(ConfigError::new("simulation.hours", "must be >= 0"));
        }
        if !(s.step_hours.is_finite() && s.step_hours > 0.0) {
            errors.push(ConfigError::new("simulation.step_hours", "must be > 0"));
        }
        if !(s.price_per_kwh.is_finite() && s.price_per_kwh >= 0.0) {
            errors.push(ConfigError::new("simulation.price_per_kwh", "must be >= 0"));
        }
        let timing_ok = s.hours.is_finite() && s.hours >= 0.0 && s.step_hours > 0.0;
        if timing_ok && s.step_hours.is_finite() {
            if let Err(e) = self.sim_config() {
                errors.push(ConfigError::new("simulation.hours", e.to_string()));
            }
        }

        let env = &self.environment;
        let env_fields = [
            ("environment.peak_sunlight_wm2", env.peak_sunlight_wm2),
            ("environment.solar_noon_hour", env.solar_noon_hour),
            ("environment.daylight_half_span_hours", env.daylight_half_span_hours),
            ("environment.wind_min_ms", env.wind_min_ms),
            ("environment.wind_max_ms", env.wind_max_ms),
            ("environment.max_temperature_drift_c", env.max_temperature_drift_c),
        ];
        let mut env_finite = true;
        for (field, value) in env_fields {
            if !value.is_finite() {
                errors.push(ConfigError::new(field, "must be finite"));
                env_finite = false;
            }
        }
        if env.peak_sunlight_wm2 < 0.0 {
            errors.push(ConfigError::new("environment.peak_sunlight_wm2", "must be >= 0"));
        }
        if env.solar_noon_hour.is_finite() && !(0.0..HOURS_PER_DAY).contains(&env.solar_noon_hour) {
            errors.push(ConfigError::new(
                "environment.solar_noon_hour",
                "must be in [0, 24)",
            ));
        }
        if env.daylight_half_span_hours <= 0.0 {
            errors.push(ConfigError::new(
                "environment.daylight_half_span_hours",
                "must be > 0",
            ));
        }
        if env.wind_min_ms < 0.0 {
            errors.push(ConfigError::new("environment.wind_min_ms", "must be >= 0"));
        }
        if env.wind_min_ms > env.wind_max_ms {
            errors.push(ConfigError::new(
                "environment.wind_min_ms",
                "must be <= environment.wind_max_ms",
            ));
        }
        if env.max_temperature_drift_c < 0.0 {
            errors.push(ConfigError::new(
                "environment.max_temperature_drift_c",
                "must be >= 0",
            ));
        }
        if env_finite {
            if let Err(e) = env.driver(s.seed) {
                errors.push(ConfigError::new("environment", e.to_string()));
            }
        }

        let mut names = HashSet::new();
        for (i, device) in self.devices.iter().enumerate() {
            if !names.insert(device.name()) {
                errors.push(ConfigError::new(
                    format!("devices[{i}].name"),
                    format!("duplicate device name \"{}\"", device.name()),
                ));
            }
            if let Err(e) = device.build() {
                errors.push(ConfigError::new(format!("devices[{i}]"), e.to_string()));
            }
        }

        for (i, source) in self.sources.iter().enumerate() {
            if let Err(e) = source.build() {
                errors.push(ConfigError::new(format!("sources[{i}]"), e.to_string()));
            }
        }

        for (i, entry) in self.schedule.iter().enumerate() {
            if entry.hour >= HOURS_PER_DAY as usize {
                errors.push(ConfigError::new(
                    format!("schedule[{i}].hour"),
                    "must be in [0, 24)",
                ));
            }
            if !names.contains(entry.device.as_str()) {
                errors.push(ConfigError::new(
                    format!("schedule[{i}].device"),
                    format!("no device named \"{}\"", entry.device),
                ));
            }
        }

        errors
    }
}
