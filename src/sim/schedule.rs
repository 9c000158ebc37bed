//! Hour-of-day device automation.

use serde::{Deserialize, Serialize};

/// A control command addressed to one device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeviceAction {
    TurnOn,
    TurnOff,
    /// Light only.
    Dim { level: i32 },
    /// Climate control only.
    SetFanSpeed { speed: i32 },
    /// Climate control only.
    SetTargetTemperature { celsius: f64 },
    /// Refrigerator only.
    SetInternalTemperature { celsius: f64 },
}

impl DeviceAction {
    /// Short operation name used in logs and errors.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
            Self::Dim { .. } => "dim",
            Self::SetFanSpeed { .. } => "set_fan_speed",
            Self::SetTargetTemperature { .. } => "set_target_temperature",
            Self::SetInternalTemperature { .. } => "set_internal_temperature",
        }
    }
}

/// One scheduled command: at `hour` (0..24) of every simulated day, apply
/// `action` to the device named `device`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleEntry {
    pub hour: usize,
    pub device: String,
    pub action: DeviceAction,
}

impl ScheduleEntry {
    pub fn new(hour: usize, device: impl Into<String>, action: DeviceAction) -> Self {
        Self {
            hour,
            device: device.into(),
            action,
        }
    }
}

/// Daily device schedule, kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceSchedule {
    entries: Vec<ScheduleEntry>,
}

impl DeviceSchedule {
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    /// Entries due at `hour_of_day`, in declaration order.
    pub fn due_at(&self, hour_of_day: usize) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter().filter(move |e| e.hour == hour_of_day)
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
