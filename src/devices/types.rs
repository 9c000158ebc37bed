//! Common types and traits for household power consumers.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::error::{Result, ensure_non_negative};

/// Closed set of device kinds known to the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeviceType {
    Light,
    ClimateControl,
    Refrigerator,
}

impl DeviceType {
    /// Canonical tag used in snapshots and persisted records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::ClimateControl => "ClimateControl",
            Self::Refrigerator => "Refrigerator",
        }
    }

    /// Parses a persisted type tag, accepting the legacy `Smart*` spellings.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "Light" | "SmartLight" => Some(Self::Light),
            "ClimateControl" | "SmartHVAC" => Some(Self::ClimateControl),
            "Refrigerator" | "SmartRefrigerator" => Some(Self::Refrigerator),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific part of a [`DeviceStatus`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DeviceDetails {
    Light {
        brightness_percent: u8,
        has_occupancy_sensor: bool,
        /// Undimmed wattage captured at construction.
        base_watts: f64,
    },
    ClimateControl {
        target_temperature_c: f64,
        current_temperature_c: f64,
        fan_speed: u8,
    },
    Refrigerator {
        internal_temperature_c: f64,
    },
}

/// Read-only status snapshot of one device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceStatus {
    pub name: String,
    pub device_type: DeviceType,
    pub is_on: bool,
    pub power_rating_watts: f64,
    pub details: DeviceDetails,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_on { "ON" } else { "OFF" };
        write!(
            f,
            "{}: Status={state}, Power={:.1} W",
            self.name, self.power_rating_watts
        )?;
        match &self.details {
            DeviceDetails::Light {
                brightness_percent,
                has_occupancy_sensor,
                ..
            } => write!(
                f,
                ", Brightness={brightness_percent}%, Occupancy Sensor={}",
                if *has_occupancy_sensor { "ON" } else { "OFF" }
            ),
            DeviceDetails::ClimateControl {
                target_temperature_c,
                current_temperature_c,
                fan_speed,
            } => write!(
                f,
                ", Target={target_temperature_c:.1}°C, Current={current_temperature_c:.1}°C, Fan={fan_speed}"
            ),
            DeviceDetails::Refrigerator {
                internal_temperature_c,
            } => write!(f, ", Internal={internal_temperature_c:.1}°C"),
        }
    }
}

/// Capability set shared by every power consumer.
///
/// Energy uses the load convention: a device that is on draws
/// `power_rating_watts` for the whole interval, a device that is off draws
/// nothing regardless of its sub-state.
pub trait Device {
    fn name(&self) -> &str;

    fn device_type(&self) -> DeviceType;

    /// Current power draw while switched on, in watts (always `>= 0`).
    fn power_rating_watts(&self) -> f64;

    fn is_on(&self) -> bool;

    /// Switches the device on. Idempotent.
    fn turn_on(&mut self);

    /// Switches the device off. Idempotent.
    fn turn_off(&mut self);

    /// Energy drawn over `hours`, in kWh.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `hours` is negative or not finite.
    fn energy_over_interval(&self, hours: f64) -> Result<f64> {
        let hours = ensure_non_negative("hours", hours)?;
        if !self.is_on() {
            return Ok(0.0);
        }
        Ok(self.power_rating_watts() * hours / 1000.0)
    }

    /// Returns a status snapshot without mutating the device.
    fn describe(&self) -> DeviceStatus;
}

/// Name, rating, and on/off switch shared by every concrete device.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Switch {
    pub(crate) name: String,
    pub(crate) power_rating_watts: f64,
    pub(crate) is_on: bool,
}

impl Switch {
    /// Devices start switched off.
    pub(crate) fn new(name: impl Into<String>, power_rating_watts: f64) -> Result<Self> {
        let power_rating_watts = ensure_non_negative("power_rating_watts", power_rating_watts)?;
        Ok(Self {
            name: name.into(),
            power_rating_watts,
            is_on: false,
        })
    }

    pub(crate) fn turn_on(&mut self) {
        if !self.is_on {
            info!(device = %self.name, "turned on");
        }
        self.is_on = true;
    }

    pub(crate) fn turn_off(&mut self) {
        if self.is_on {
            info!(device = %self.name, "turned off");
        }
        self.is_on = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_tags_are_accepted() {
        assert_eq!(DeviceType::from_tag("SmartHVAC"), Some(DeviceType::ClimateControl));
        assert_eq!(DeviceType::from_tag("Light"), Some(DeviceType::Light));
        assert_eq!(DeviceType::from_tag("Toaster"), None);
    }

    #[test]
    fn tag_round_trips_through_as_str() {
        for t in [
            DeviceType::Light,
            DeviceType::ClimateControl,
            DeviceType::Refrigerator,
        ] {
            assert_eq!(DeviceType::from_tag(t.as_str()), Some(t));
        }
    }

    #[test]
    fn switch_rejects_negative_rating() {
        assert!(Switch::new("Lamp", -1.0).is_err());
    }

    #[test]
    fn switch_starts_off_and_toggles_idempotently() {
        let mut s = Switch::new("Lamp", 10.0).unwrap();
        assert!(!s.is_on);
        s.turn_on();
        s.turn_on();
        assert!(s.is_on);
        s.turn_off();
        s.turn_off();
        assert!(!s.is_on);
    }

    #[test]
    fn status_display_mentions_type_fields() {
        let status = DeviceStatus {
            name: "Fridge".to_string(),
            device_type: DeviceType::Refrigerator,
            is_on: true,
            power_rating_watts: 150.0,
            details: DeviceDetails::Refrigerator {
                internal_temperature_c: 4.0,
            },
        };
        let s = status.to_string();
        assert!(s.starts_with("Fridge: Status=ON"));
        assert!(s.contains("Internal=4.0°C"));
    }
}
