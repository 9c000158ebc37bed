use tracing::info;

use crate::devices::types::{Device, DeviceDetails, DeviceStatus, DeviceType, Switch};
use crate::error::{Result, ensure_finite};

/// Default compartment temperature in °C.
pub const DEFAULT_INTERNAL_TEMPERATURE_C: f64 = 4.0;

/// A refrigerator drawing a constant rating while on.
#[derive(Debug, Clone, PartialEq)]
pub struct Refrigerator {
    switch: Switch,
    internal_temperature_c: f64,
}

impl Refrigerator {
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `power_rating_watts` is negative or not finite.
    pub fn new(name: impl Into<String>, power_rating_watts: f64) -> Result<Self> {
        Ok(Self {
            switch: Switch::new(name, power_rating_watts)?,
            internal_temperature_c: DEFAULT_INTERNAL_TEMPERATURE_C,
        })
    }

    pub fn internal_temperature_c(&self) -> f64 {
        self.internal_temperature_c
    }

    /// # Errors
    ///
    /// Returns `InvalidArgument` if `celsius` is not finite.
    pub fn set_internal_temperature_c(&mut self, celsius: f64) -> Result<()> {
        self.internal_temperature_c = ensure_finite("internal_temperature_c", celsius)?;
        info!(device = %self.switch.name, celsius, "internal temperature set");
        Ok(())
    }

    pub(crate) fn set_on(&mut self, on: bool) {
        self.switch.is_on = on;
    }
}

impl Device for Refrigerator {
    fn name(&self) -> &str {
        &self.switch.name
    }

    fn device_type(&self) -> DeviceType {
        DeviceType::Refrigerator
    }

    fn power_rating_watts(&self) -> f64 {
        self.switch.power_rating_watts
    }

    fn is_on(&self) -> bool {
        self.switch.is_on
    }

    fn turn_on(&mut self) {
        self.switch.turn_on();
    }

    fn turn_off(&mut self) {
        self.switch.turn_off();
    }

    fn describe(&self) -> DeviceStatus {
        DeviceStatus {
            name: self.switch.name.clone(),
            device_type: DeviceType::Refrigerator,
            is_on: self.switch.is_on,
            power_rating_watts: self.switch.power_rating_watts,
            details: DeviceDetails::Refrigerator {
                internal_temperature_c: self.internal_temperature_c,
            },
        }
    }
}
