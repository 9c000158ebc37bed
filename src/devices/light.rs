use tracing::info;

use crate::devices::types::{Device, DeviceDetails, DeviceStatus, DeviceType, Switch};
use crate::error::{Result, SimError};

/// A dimmable light, optionally fitted with an occupancy sensor.
///
/// Dimming rescales the power rating linearly from the undimmed wattage
/// captured at construction, so repeated dims never compound.
///
/// # Examples
///
/// ```
/// use home_energy_sim::devices::{Device, Light};
///
/// let mut lamp = Light::new("Living Room Light", 15.0, true).unwrap();
/// lamp.dim(20).unwrap();
/// lamp.turn_on();
/// assert!((lamp.energy_over_interval(1.0).unwrap() - 0.003).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    switch: Switch,

    /// Wattage at 100% brightness.
    base_watts: f64,

    /// Brightness in percent (0..=100).
    brightness_percent: u8,

    has_occupancy_sensor: bool,
}

impl Light {
    /// Creates a light at full brightness, switched off.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `base_watts` is negative or not finite.
    pub fn new(name: impl Into<String>, base_watts: f64, has_occupancy_sensor: bool) -> Result<Self> {
        let switch = Switch::new(name, base_watts)?;
        Ok(Self {
            base_watts: switch.power_rating_watts,
            switch,
            brightness_percent: 100,
            has_occupancy_sensor,
        })
    }

    pub fn brightness_percent(&self) -> u8 {
        self.brightness_percent
    }

    pub fn base_watts(&self) -> f64 {
        self.base_watts
    }

    pub fn has_occupancy_sensor(&self) -> bool {
        self.has_occupancy_sensor
    }

    /// Sets brightness and rescales the power rating to `base * level / 100`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for `level` outside `0..=100`; the light is
    /// left untouched.
    pub fn dim(&mut self, level: i32) -> Result<()> {
        let level = u8::try_from(level)
            .ok()
            .filter(|l| *l <= 100)
            .ok_or_else(|| SimError::invalid("brightness", level, "must be in [0, 100]"))?;

        self.brightness_percent = level;
        self.switch.power_rating_watts = self.base_watts * f64::from(level) / 100.0;
        info!(device = %self.switch.name, brightness = level, "dimmed");
        Ok(())
    }

    pub(crate) fn set_on(&mut self, on: bool) {
        self.switch.is_on = on;
    }
}

impl Device for Light {
    fn name(&self) -> &str {
        &self.switch.name
    }

    fn device_type(&self) -> DeviceType {
        DeviceType::Light
    }

    fn power_rating_watts(&self) -> f64 {
        self.switch.power_rating_watts
    }

    fn is_on(&self) -> bool {
        self.switch.is_on
    }

    /// Turning on a sensor-equipped light also records an occupancy activation.
    fn turn_on(&mut self) {
        self.switch.turn_on();
        if self.has_occupancy_sensor {
            info!(device = %self.switch.name, "turned on due to occupancy");
        }
    }

    fn turn_off(&mut self) {
        self.switch.turn_off();
    }

    fn describe(&self) -> DeviceStatus {
        DeviceStatus {
            name: self.switch.name.clone(),
            device_type: DeviceType::Light,
            is_on: self.switch.is_on,
            power_rating_watts: self.switch.power_rating_watts,
            details: DeviceDetails::Light {
                brightness_percent: self.brightness_percent,
                has_occupancy_sensor: self.has_occupancy_sensor,
                base_watts: self.base_watts,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// In-memory log sink shared with the fmt subscriber.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn captured_logs(f: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn lamp() -> Light {
        Light::new("Lamp", 15.0, false).unwrap()
    }

    #[test]
    fn new_light_is_off_at_full_brightness() {
        let l = lamp();
        assert!(!l.is_on());
        assert_eq!(l.brightness_percent(), 100);
        assert_eq!(l.power_rating_watts(), 15.0);
    }

    #[test]
    fn dim_rescales_from_base_without_compounding() {
        let mut l = lamp();
        l.dim(50).unwrap();
        l.dim(50).unwrap();
        assert_relative_eq!(l.power_rating_watts(), 7.5);
        l.dim(100).unwrap();
        assert_relative_eq!(l.power_rating_watts(), 15.0);
    }

    #[test]
    fn dim_rejects_out_of_range_and_keeps_state() {
        let mut l = lamp();
        l.dim(40).unwrap();
        for bad in [-1, 101, 256, i32::MAX] {
            let err = l.dim(bad).unwrap_err();
            assert!(err.is_invalid_argument());
        }
        assert_eq!(l.brightness_percent(), 40);
        assert_relative_eq!(l.power_rating_watts(), 6.0);
    }

    #[test]
    fn dimmed_off_light_keeps_brightness_and_draws_nothing() {
        let mut l = lamp();
        l.dim(30).unwrap();
        assert_eq!(l.energy_over_interval(5.0).unwrap(), 0.0);
        assert_eq!(l.describe().details, DeviceDetails::Light {
            brightness_percent: 30,
            has_occupancy_sensor: false,
            base_watts: 15.0,
        });
    }

    #[test]
    fn energy_when_on_follows_rating() {
        let mut l = lamp();
        l.turn_on();
        assert_relative_eq!(l.energy_over_interval(1.0).unwrap(), 0.015);
        assert_relative_eq!(l.energy_over_interval(2.0).unwrap(), 0.030);
    }

    #[test]
    fn negative_hours_rejected() {
        let mut l = lamp();
        l.turn_on();
        assert!(l.energy_over_interval(-1.0).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn occupancy_turn_on_does_not_change_state_beyond_switch() {
        let mut l = Light::new("Hall", 10.0, true).unwrap();
        let before = l.describe();
        l.turn_on();
        let after = l.describe();
        assert!(after.is_on);
        assert_eq!(before.details, after.details);
        assert_eq!(before.power_rating_watts, after.power_rating_watts);
    }

    #[test]
    fn sensor_light_logs_occupancy_activation() {
        let mut hall = Light::new("Hall", 10.0, true).unwrap();
        let logs = captured_logs(|| hall.turn_on());
        assert!(logs.contains("turned on due to occupancy"), "logs: {logs}");
        assert!(logs.contains("Hall"));
    }

    #[test]
    fn plain_light_logs_no_occupancy() {
        let mut lamp = lamp();
        let logs = captured_logs(|| {
            lamp.turn_on();
            lamp.dim(50).unwrap();
        });
        assert!(logs.contains("turned on"), "logs: {logs}");
        assert!(logs.contains("dimmed"));
        assert!(!logs.contains("occupancy"));
    }
}
