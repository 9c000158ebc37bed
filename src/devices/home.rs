use crate::devices::types::{Device, DeviceStatus, DeviceType};
use crate::devices::{ClimateControl, Light, Refrigerator};

/// Closed set of household devices owned by the engine.
///
/// Dispatches the shared [`Device`] capabilities to the concrete variant;
/// variant-specific controls are reached with the `as_*_mut` accessors.
#[derive(Debug, Clone, PartialEq)]
pub enum HomeDevice {
    Light(Light),
    ClimateControl(ClimateControl),
    Refrigerator(Refrigerator),
}

impl HomeDevice {
    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match self {
            Self::Light(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_climate_control_mut(&mut self) -> Option<&mut ClimateControl> {
        match self {
            Self::ClimateControl(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_refrigerator_mut(&mut self) -> Option<&mut Refrigerator> {
        match self {
            Self::Refrigerator(r) => Some(r),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn Device {
        match self {
            Self::Light(l) => l,
            Self::ClimateControl(c) => c,
            Self::Refrigerator(r) => r,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Device {
        match self {
            Self::Light(l) => l,
            Self::ClimateControl(c) => c,
            Self::Refrigerator(r) => r,
        }
    }
}

impl Device for HomeDevice {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn device_type(&self) -> DeviceType {
        self.inner().device_type()
    }

    fn power_rating_watts(&self) -> f64 {
        self.inner().power_rating_watts()
    }

    fn is_on(&self) -> bool {
        self.inner().is_on()
    }

    fn turn_on(&mut self) {
        self.inner_mut().turn_on();
    }

    fn turn_off(&mut self) {
        self.inner_mut().turn_off();
    }

    fn describe(&self) -> DeviceStatus {
        self.inner().describe()
    }
}

impl From<Light> for HomeDevice {
    fn from(value: Light) -> Self {
        Self::Light(value)
    }
}

impl From<ClimateControl> for HomeDevice {
    fn from(value: ClimateControl) -> Self {
        Self::ClimateControl(value)
    }
}

impl From<Refrigerator> for HomeDevice {
    fn from(value: Refrigerator) -> Self {
        Self::Refrigerator(value)
    }
}
