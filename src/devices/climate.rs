use tracing::info;

use crate::devices::types::{Device, DeviceDetails, DeviceStatus, DeviceType, Switch};
use crate::error::{Result, SimError, ensure_finite};

/// Power draw in watts for fan speeds 0 (off) through 3 (high).
pub const FAN_SPEED_WATTS: [f64; 4] = [0.0, 100.0, 300.0, 500.0];

/// Default set point in °C.
pub const DEFAULT_TARGET_TEMPERATURE_C: f64 = 22.0;

/// Indoor temperature assumed before any environment drift is applied.
pub const DEFAULT_CURRENT_TEMPERATURE_C: f64 = 25.0;

/// A heating/cooling unit whose draw is set by its fan speed.
///
/// The rating passed at construction holds until the first
/// [`ClimateControl::set_fan_speed`], which overwrites it from
/// [`FAN_SPEED_WATTS`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateControl {
    switch: Switch,
    target_temperature_c: f64,
    current_temperature_c: f64,
    fan_speed: u8,
}

impl ClimateControl {
    /// Creates a unit with fan speed 0, switched off.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `power_rating_watts` is negative or not finite.
    pub fn new(name: impl Into<String>, power_rating_watts: f64) -> Result<Self> {
        Ok(Self {
            switch: Switch::new(name, power_rating_watts)?,
            target_temperature_c: DEFAULT_TARGET_TEMPERATURE_C,
            current_temperature_c: DEFAULT_CURRENT_TEMPERATURE_C,
            fan_speed: 0,
        })
    }

    pub fn target_temperature_c(&self) -> f64 {
        self.target_temperature_c
    }

    pub fn current_temperature_c(&self) -> f64 {
        self.current_temperature_c
    }

    pub fn fan_speed(&self) -> u8 {
        self.fan_speed
    }

    /// Sets the fan speed and overwrites the power rating from the table.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` unless `speed` is 0, 1, 2 or 3.
    pub fn set_fan_speed(&mut self, speed: i32) -> Result<()> {
        let watts = usize::try_from(speed)
            .ok()
            .and_then(|i| FAN_SPEED_WATTS.get(i).copied())
            .ok_or_else(|| SimError::invalid("fan_speed", speed, "must be 0, 1, 2 or 3"))?;

        // `speed` indexed the table, so it fits in a u8.
        self.fan_speed = speed as u8;
        self.switch.power_rating_watts = watts;
        info!(device = %self.switch.name, fan_speed = speed, watts, "fan speed set");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidArgument` if `celsius` is not finite.
    pub fn set_target_temperature_c(&mut self, celsius: f64) -> Result<()> {
        self.target_temperature_c = ensure_finite("target_temperature_c", celsius)?;
        info!(device = %self.switch.name, celsius, "target temperature set");
        Ok(())
    }

    /// Environment-facing setter for the measured indoor temperature.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `celsius` is not finite.
    pub fn set_current_temperature_c(&mut self, celsius: f64) -> Result<()> {
        self.current_temperature_c = ensure_finite("current_temperature_c", celsius)?;
        Ok(())
    }

    /// Restores a persisted fan speed without touching the saved rating.
    pub(crate) fn restore_fan_speed(&mut self, speed: i32) -> Result<()> {
        if !(0..FAN_SPEED_WATTS.len() as i32).contains(&speed) {
            return Err(SimError::invalid("fan_speed", speed, "must be 0, 1, 2 or 3"));
        }
        self.fan_speed = speed as u8;
        Ok(())
    }

    pub(crate) fn set_on(&mut self, on: bool) {
        self.switch.is_on = on;
    }
}

impl Device for ClimateControl {
    fn name(&self) -> &str {
        &self.switch.name
    }

    fn device_type(&self) -> DeviceType {
        DeviceType::ClimateControl
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
            device_type: DeviceType::ClimateControl,
            is_on: self.switch.is_on,
            power_rating_watts: self.switch.power_rating_watts,
            details: DeviceDetails::ClimateControl {
                target_temperature_c: self.target_temperature_c,
                current_temperature_c: self.current_temperature_c,
                fan_speed: self.fan_speed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hvac() -> ClimateControl {
        ClimateControl::new("HVAC", 1000.0).unwrap()
    }

    #[test]
    fn defaults() {
        let h = hvac();
        assert_eq!(h.target_temperature_c(), 22.0);
        assert_eq!(h.current_temperature_c(), 25.0);
        assert_eq!(h.fan_speed(), 0);
        assert_eq!(h.power_rating_watts(), 1000.0);
    }

    #[test]
    fn fan_speed_table() {
        let mut h = hvac();
        for (speed, watts) in [(0, 0.0), (1, 100.0), (2, 300.0), (3, 500.0)] {
            h.set_fan_speed(speed).unwrap();
            assert_eq!(h.fan_speed(), speed as u8);
            assert_eq!(h.power_rating_watts(), watts);
        }
    }

    #[test]
    fn invalid_fan_speed_is_rejected_without_mutation() {
        let mut h = hvac();
        h.set_fan_speed(2).unwrap();
        assert!(h.set_fan_speed(4).unwrap_err().is_invalid_argument());
        assert!(h.set_fan_speed(-1).unwrap_err().is_invalid_argument());
        assert_eq!(h.fan_speed(), 2);
        assert_eq!(h.power_rating_watts(), 300.0);
    }

    #[test]
    fn temperature_setters_accept_any_finite_value() {
        let mut h = hvac();
        h.set_target_temperature_c(-40.0).unwrap();
        h.set_current_temperature_c(55.5).unwrap();
        assert_eq!(h.target_temperature_c(), -40.0);
        assert_eq!(h.current_temperature_c(), 55.5);
        assert!(h.set_target_temperature_c(f64::NAN).is_err());
        assert_eq!(h.target_temperature_c(), -40.0);
    }

    #[test]
    fn energy_uses_fan_rating_when_on() {
        let mut h = hvac();
        h.set_fan_speed(3).unwrap();
        assert_eq!(h.energy_over_interval(2.0).unwrap(), 0.0);
        h.turn_on();
        assert!((h.energy_over_interval(2.0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn restore_keeps_rating() {
        let mut h = ClimateControl::new("HVAC", 300.0).unwrap();
        h.restore_fan_speed(2).unwrap();
        assert_eq!(h.power_rating_watts(), 300.0);
        assert!(h.restore_fan_speed(7).is_err());
    }
}
