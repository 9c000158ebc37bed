//! Simulation engine that owns the household and aggregates each step.

use tracing::debug;

use crate::devices::{Device, DeviceStatus, HomeDevice};
use crate::error::{Result, SimError, ensure_finite, ensure_non_negative};
use crate::sources::{EnergySource, RenewableSource};

use super::environment::EnvironmentInputs;
use super::report::{DeviceBreakdown, SimulationReport, SourceBreakdown};
use super::schedule::DeviceAction;

/// Stable handle to a device registered with a [`SimulationEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(usize);

/// Stable handle to a source registered with a [`SimulationEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(usize);

impl DeviceId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl SourceId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Simulation engine owning every device and source plus the energy price.
///
/// Callers never get mutable access to the collections themselves: they
/// hold [`DeviceId`]/[`SourceId`] handles and mutate through the engine,
/// so a step can never observe a half-applied change.
///
/// # Examples
///
/// ```
/// use home_energy_sim::devices::Light;
/// use home_energy_sim::sim::engine::SimulationEngine;
///
/// let mut engine = SimulationEngine::new(0.30).unwrap();
/// let lamp = engine.add_device(Light::new("Lamp", 15.0, false).unwrap()).unwrap();
/// engine.turn_on(lamp).unwrap();
///
/// let report = engine.step(1.0).unwrap();
/// assert!((report.total_consumption_kwh - 0.015).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    devices: Vec<HomeDevice>,
    sources: Vec<EnergySource>,
    price_per_kwh: f64,
}

impl SimulationEngine {
    /// Creates an empty engine billing at `price_per_kwh`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a negative or non-finite price.
    pub fn new(price_per_kwh: f64) -> Result<Self> {
        Ok(Self {
            devices: Vec::new(),
            sources: Vec::new(),
            price_per_kwh: ensure_non_negative("price_per_kwh", price_per_kwh)?,
        })
    }

    pub fn price_per_kwh(&self) -> f64 {
        self.price_per_kwh
    }

    /// Registers a device at the end of the device list.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentifier` if a device with the same name exists.
    pub fn add_device(&mut self, device: impl Into<HomeDevice>) -> Result<DeviceId> {
        let device = device.into();
        if self.device_id(device.name()).is_some() {
            return Err(SimError::DuplicateIdentifier(device.name().to_string()));
        }
        debug!(device = device.name(), kind = %device.device_type(), "device added");
        self.devices.push(device);
        Ok(DeviceId(self.devices.len() - 1))
    }

    /// Registers a generator at the end of the source list.
    pub fn add_renewable_source(&mut self, source: impl Into<EnergySource>) -> SourceId {
        let source = source.into();
        debug!(source = source.name(), kind = %source.source_type(), "source added");
        self.sources.push(source);
        SourceId(self.sources.len() - 1)
    }

    /// Finds a device handle by name.
    pub fn device_id(&self, name: &str) -> Option<DeviceId> {
        self.devices
            .iter()
            .position(|d| d.name() == name)
            .map(DeviceId)
    }

    /// Finds the first source handle with the given name.
    pub fn source_id(&self, name: &str) -> Option<SourceId> {
        self.sources
            .iter()
            .position(|s| s.name() == name)
            .map(SourceId)
    }

    pub fn device(&self, id: DeviceId) -> Option<&HomeDevice> {
        self.devices.get(id.0)
    }

    pub fn source(&self, id: SourceId) -> Option<&EnergySource> {
        self.sources.get(id.0)
    }

    /// Devices in insertion order.
    pub fn devices(&self) -> &[HomeDevice] {
        &self.devices
    }

    /// Sources in insertion order.
    pub fn sources(&self) -> &[EnergySource] {
        &self.sources
    }

    /// Status snapshot of every device, in insertion order.
    pub fn statuses(&self) -> Vec<DeviceStatus> {
        self.devices.iter().map(Device::describe).collect()
    }

    fn device_mut(&mut self, id: DeviceId) -> Result<&mut HomeDevice> {
        self.devices
            .get_mut(id.0)
            .ok_or_else(|| SimError::UnknownDevice(format!("#{}", id.0)))
    }

    fn source_mut(&mut self, id: SourceId) -> Result<&mut EnergySource> {
        self.sources
            .get_mut(id.0)
            .ok_or(SimError::UnknownSource(id.0))
    }

    pub fn turn_on(&mut self, id: DeviceId) -> Result<()> {
        self.device_mut(id)?.turn_on();
        Ok(())
    }

    pub fn turn_off(&mut self, id: DeviceId) -> Result<()> {
        self.device_mut(id)?.turn_off();
        Ok(())
    }

    /// # Errors
    ///
    /// `UnsupportedOperation` unless the device is a light; `InvalidArgument`
    /// for a level outside `0..=100`.
    pub fn dim(&mut self, id: DeviceId, level: i32) -> Result<()> {
        self.apply_action(id, &DeviceAction::Dim { level })
    }

    /// # Errors
    ///
    /// `UnsupportedOperation` unless the device is a climate unit;
    /// `InvalidArgument` for a speed outside `0..=3`.
    pub fn set_fan_speed(&mut self, id: DeviceId, speed: i32) -> Result<()> {
        self.apply_action(id, &DeviceAction::SetFanSpeed { speed })
    }

    pub fn set_target_temperature_c(&mut self, id: DeviceId, celsius: f64) -> Result<()> {
        self.apply_action(id, &DeviceAction::SetTargetTemperature { celsius })
    }

    pub fn set_internal_temperature_c(&mut self, id: DeviceId, celsius: f64) -> Result<()> {
        self.apply_action(id, &DeviceAction::SetInternalTemperature { celsius })
    }

    pub fn set_current_temperature_c(&mut self, id: DeviceId, celsius: f64) -> Result<()> {
        let device = self.device_mut(id)?;
        let name = device.name().to_string();
        let device_type = device.device_type().as_str();
        device
            .as_climate_control_mut()
            .ok_or(SimError::UnsupportedOperation {
                device: name,
                device_type,
                operation: "set_current_temperature",
            })?
            .set_current_temperature_c(celsius)
    }

    /// # Errors
    ///
    /// `UnsupportedSourceOperation` unless the source is a solar panel;
    /// `InvalidArgument` for negative intensity.
    pub fn set_sunlight_intensity(&mut self, id: SourceId, wm2: f64) -> Result<()> {
        let source = self.source_mut(id)?;
        let name = source.name().to_string();
        let source_type = source.source_type().as_str();
        source
            .as_solar_mut()
            .ok_or(SimError::UnsupportedSourceOperation {
                name,
                source_type,
                operation: "set_sunlight_intensity",
            })?
            .set_sunlight_intensity(wm2)
    }

    /// # Errors
    ///
    /// `UnsupportedSourceOperation` unless the source is a wind turbine;
    /// `InvalidArgument` for negative speed.
    pub fn set_wind_speed(&mut self, id: SourceId, ms: f64) -> Result<()> {
        let source = self.source_mut(id)?;
        let name = source.name().to_string();
        let source_type = source.source_type().as_str();
        source
            .as_wind_mut()
            .ok_or(SimError::UnsupportedSourceOperation {
                name,
                source_type,
                operation: "set_wind_speed",
            })?
            .set_wind_speed(ms)
    }

    /// Applies a control command to one device.
    ///
    /// # Errors
    ///
    /// `UnknownDevice` for a foreign handle, `UnsupportedOperation` when the
    /// command does not fit the device type, `InvalidArgument` when the
    /// device rejects the value. State is unchanged on error.
    pub fn apply_action(&mut self, id: DeviceId, action: &DeviceAction) -> Result<()> {
        let device = self.device_mut(id)?;
        let unsupported = |d: &HomeDevice| SimError::UnsupportedOperation {
            device: d.name().to_string(),
            device_type: d.device_type().as_str(),
            operation: action.label(),
        };

        match *action {
            DeviceAction::TurnOn => device.turn_on(),
            DeviceAction::TurnOff => device.turn_off(),
            DeviceAction::Dim { level } => match device {
                HomeDevice::Light(light) => light.dim(level)?,
                other => return Err(unsupported(&*other)),
            },
            DeviceAction::SetFanSpeed { speed } => match device {
                HomeDevice::ClimateControl(unit) => unit.set_fan_speed(speed)?,
                other => return Err(unsupported(&*other)),
            },
            DeviceAction::SetTargetTemperature { celsius } => match device {
                HomeDevice::ClimateControl(unit) => unit.set_target_temperature_c(celsius)?,
                other => return Err(unsupported(&*other)),
            },
            DeviceAction::SetInternalTemperature { celsius } => match device {
                HomeDevice::Refrigerator(fridge) => fridge.set_internal_temperature_c(celsius)?,
                other => return Err(unsupported(&*other)),
            },
        }
        Ok(())
    }

    /// Applies a control command to the device with the given name.
    ///
    /// # Errors
    ///
    /// `UnknownDevice` if no device has that name, otherwise as
    /// [`SimulationEngine::apply_action`].
    pub fn apply_action_by_name(&mut self, name: &str, action: &DeviceAction) -> Result<()> {
        let id = self
            .device_id(name)
            .ok_or_else(|| SimError::UnknownDevice(name.to_string()))?;
        self.apply_action(id, action)
    }

    /// Feeds environment readings to every source and climate unit.
    ///
    /// All inputs and derived temperatures are validated before anything is
    /// written, so a rejected call leaves the household untouched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for negative sunlight or wind speed, or a
    /// non-finite value anywhere.
    pub fn apply_environment(&mut self, inputs: &EnvironmentInputs) -> Result<()> {
        inputs.validate()?;

        let drifted = self
            .devices
            .iter_mut()
            .filter_map(HomeDevice::as_climate_control_mut)
            .map(|unit| {
                ensure_finite(
                    "current_temperature_c",
                    unit.current_temperature_c() + inputs.temperature_drift_c,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        for source in &mut self.sources {
            match source {
                EnergySource::Solar(panel) => {
                    panel.set_sunlight_intensity(inputs.sunlight_intensity_wm2)?;
                }
                EnergySource::Wind(turbine) => turbine.set_wind_speed(inputs.wind_speed_ms)?,
            }
        }
        let units = self
            .devices
            .iter_mut()
            .filter_map(HomeDevice::as_climate_control_mut);
        for (unit, celsius) in units.zip(drifted) {
            unit.set_current_temperature_c(celsius)?;
        }
        Ok(())
    }

    /// Runs one aggregation pass over `duration_hours`.
    ///
    /// Each device is described before its energy is computed, so the
    /// breakdown reflects the state the energy was computed from. Surplus
    /// generation floors net consumption at zero and is never banked.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `duration_hours` is negative or not
    /// finite, or if a total overflows.
    pub fn step(&self, duration_hours: f64) -> Result<SimulationReport> {
        let hours = ensure_non_negative("duration_hours", duration_hours)?;

        let mut total_consumption_kwh = 0.0;
        let mut devices = Vec::with_capacity(self.devices.len());
        for device in &self.devices {
            let status = device.describe();
            let energy_kwh = device.energy_over_interval(hours)?;
            total_consumption_kwh += energy_kwh;
            devices.push(DeviceBreakdown { status, energy_kwh });
        }

        let mut total_generated_kwh = 0.0;
        let mut sources = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let output_watts = source.output_watts();
            let energy_kwh = source.energy_over_interval(hours);
            total_generated_kwh += energy_kwh;
            sources.push(SourceBreakdown {
                name: source.name().to_string(),
                source_type: source.source_type(),
                output_watts,
                energy_kwh,
            });
        }

        let total_consumption_kwh = ensure_finite("total_consumption_kwh", total_consumption_kwh)?;
        let total_generated_kwh = ensure_finite("total_generated_kwh", total_generated_kwh)?;
        let net_consumption_kwh = (total_consumption_kwh - total_generated_kwh).max(0.0);
        let cost_usd = ensure_finite("cost_usd", net_consumption_kwh * self.price_per_kwh)?;

        Ok(SimulationReport {
            duration_hours: hours,
            total_consumption_kwh,
            total_generated_kwh,
            net_consumption_kwh,
            cost_usd,
            devices,
            sources,
        })
    }
}
