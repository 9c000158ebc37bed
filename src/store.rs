//! Device persistence: flat records, the store contract, and two backends.
//!
//! Records are keyed by device name. Saving a record whose name already
//! exists replaces it in place; otherwise it is appended.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::devices::{
    ClimateControl, Device, DeviceDetails, DeviceStatus, DeviceType, HomeDevice, Light,
    Refrigerator,
};
use crate::error::{Result, SimError};
use crate::sim::engine::SimulationEngine;

/// Rating assumed for a light record written without one.
pub const LEGACY_LIGHT_WATTS: f64 = 10.0;
/// Rating assumed for a climate control record written without one.
pub const LEGACY_CLIMATE_CONTROL_WATTS: f64 = 1000.0;
/// Rating assumed for a refrigerator record written without one.
pub const LEGACY_REFRIGERATOR_WATTS: f64 = 150.0;

/// Flat persisted form of one device.
///
/// Type-specific columns are `None` for devices of other types. For lights
/// `rated_watts` is the undimmed wattage; for the other types it is the
/// current rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub name: String,
    pub device_type: String,
    pub is_on: bool,
    #[serde(default)]
    pub rated_watts: Option<f64>,
    #[serde(default)]
    pub brightness_percent: Option<u8>,
    #[serde(default)]
    pub has_occupancy_sensor: Option<bool>,
    #[serde(default)]
    pub target_temperature_c: Option<f64>,
    #[serde(default)]
    pub current_temperature_c: Option<f64>,
    #[serde(default)]
    pub fan_speed: Option<u8>,
    #[serde(default)]
    pub internal_temperature_c: Option<f64>,
}

impl DeviceRecord {
    fn empty(name: String, device_type: DeviceType, is_on: bool, rated_watts: f64) -> Self {
        Self {
            name,
            device_type: device_type.as_str().to_string(),
            is_on,
            rated_watts: Some(rated_watts),
            brightness_percent: None,
            has_occupancy_sensor: None,
            target_temperature_c: None,
            current_temperature_c: None,
            fan_speed: None,
            internal_temperature_c: None,
        }
    }
}

impl From<&DeviceStatus> for DeviceRecord {
    fn from(status: &DeviceStatus) -> Self {
        let name = status.name.clone();
        match status.details {
            DeviceDetails::Light {
                brightness_percent,
                has_occupancy_sensor,
                base_watts,
            } => Self {
                brightness_percent: Some(brightness_percent),
                has_occupancy_sensor: Some(has_occupancy_sensor),
                ..Self::empty(name, status.device_type, status.is_on, base_watts)
            },
            DeviceDetails::ClimateControl {
                target_temperature_c,
                current_temperature_c,
                fan_speed,
            } => Self {
                target_temperature_c: Some(target_temperature_c),
                current_temperature_c: Some(current_temperature_c),
                fan_speed: Some(fan_speed),
                ..Self::empty(
                    name,
                    status.device_type,
                    status.is_on,
                    status.power_rating_watts,
                )
            },
            DeviceDetails::Refrigerator {
                internal_temperature_c,
            } => Self {
                internal_temperature_c: Some(internal_temperature_c),
                ..Self::empty(
                    name,
                    status.device_type,
                    status.is_on,
                    status.power_rating_watts,
                )
            },
        }
    }
}

impl From<&HomeDevice> for DeviceRecord {
    fn from(device: &HomeDevice) -> Self {
        Self::from(&device.describe())
    }
}

impl HomeDevice {
    /// Rebuilds a device from its persisted record.
    ///
    /// Legacy records without `rated_watts` get the historical default rating
    /// for their type, and a legacy climate record's fan speed re-derives the
    /// rating from the fan table.
    ///
    /// # Errors
    ///
    /// Returns `UnknownDeviceType` for an unrecognised type tag and
    /// `InvalidArgument` for out-of-range values.
    pub fn from_record(record: &DeviceRecord) -> Result<Self> {
        let device_type = DeviceType::from_tag(&record.device_type)
            .ok_or_else(|| SimError::UnknownDeviceType(record.device_type.clone()))?;
        let name = record.name.clone();

        let device = match device_type {
            DeviceType::Light => {
                let watts = record.rated_watts.unwrap_or(LEGACY_LIGHT_WATTS);
                let sensor = record.has_occupancy_sensor.unwrap_or(false);
                let mut light = Light::new(name, watts, sensor)?;
                if let Some(level) = record.brightness_percent {
                    light.dim(i32::from(level))?;
                }
                light.set_on(record.is_on);
                Self::from(light)
            }
            DeviceType::ClimateControl => {
                let watts = record.rated_watts.unwrap_or(LEGACY_CLIMATE_CONTROL_WATTS);
                let mut unit = ClimateControl::new(name, watts)?;
                if let Some(celsius) = record.target_temperature_c {
                    unit.set_target_temperature_c(celsius)?;
                }
                if let Some(celsius) = record.current_temperature_c {
                    unit.set_current_temperature_c(celsius)?;
                }
                if let Some(speed) = record.fan_speed {
                    if record.rated_watts.is_some() {
                        unit.restore_fan_speed(i32::from(speed))?;
                    } else {
                        unit.set_fan_speed(i32::from(speed))?;
                    }
                }
                unit.set_on(record.is_on);
                Self::from(unit)
            }
            DeviceType::Refrigerator => {
                let watts = record.rated_watts.unwrap_or(LEGACY_REFRIGERATOR_WATTS);
                let mut fridge = Refrigerator::new(name, watts)?;
                if let Some(celsius) = record.internal_temperature_c {
                    fridge.set_internal_temperature_c(celsius)?;
                }
                fridge.set_on(record.is_on);
                Self::from(fridge)
            }
        };
        Ok(device)
    }
}

/// Persistence collaborator for device state.
pub trait DeviceStore {
    /// Returns every stored record, in storage order.
    ///
    /// # Errors
    ///
    /// Returns `Store` or `Io` if the backing storage cannot be read.
    fn load(&self) -> Result<Vec<DeviceRecord>>;

    /// Inserts the record, or replaces the stored record with the same name.
    ///
    /// # Errors
    ///
    /// Returns `Store` or `Io` if the backing storage cannot be written.
    fn save(&mut self, record: &DeviceRecord) -> Result<()>;

    /// Upserts every record in order.
    fn save_all(&mut self, records: &[DeviceRecord]) -> Result<()> {
        records.iter().try_for_each(|r| self.save(r))
    }
}

fn upsert(records: &mut Vec<DeviceRecord>, record: &DeviceRecord) {
    match records.iter_mut().find(|r| r.name == record.name) {
        Some(existing) => *existing = record.clone(),
        None => records.push(record.clone()),
    }
}

/// In-memory store, mainly for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryDeviceStore {
    records: Vec<DeviceRecord>,
}

impl MemoryDeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DeviceStore for MemoryDeviceStore {
    fn load(&self) -> Result<Vec<DeviceRecord>> {
        Ok(self.records.clone())
    }

    fn save(&mut self, record: &DeviceRecord) -> Result<()> {
        upsert(&mut self.records, record);
        Ok(())
    }
}

/// CSV file store with a header row. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct CsvDeviceStore {
    path: PathBuf,
}

impl CsvDeviceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, records: &[DeviceRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        let mut wtr = csv::Writer::from_writer(BufWriter::new(file));
        for record in records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        debug!(path = %self.path.display(), count = records.len(), "device store written");
        Ok(())
    }
}

impl DeviceStore for CsvDeviceStore {
    fn load(&self) -> Result<Vec<DeviceRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut rdr = csv::Reader::from_reader(file);
        let records = rdr
            .deserialize()
            .collect::<std::result::Result<Vec<DeviceRecord>, _>>()?;
        Ok(records)
    }

    fn save(&mut self, record: &DeviceRecord) -> Result<()> {
        self.save_all(std::slice::from_ref(record))
    }

    fn save_all(&mut self, records: &[DeviceRecord]) -> Result<()> {
        let mut stored = self.load()?;
        for record in records {
            upsert(&mut stored, record);
        }
        self.write_all(&stored)
    }
}

/// Registers every stored device with `engine`, in storage order.
///
/// Every record is rebuilt before any is registered, so a bad record leaves
/// the engine untouched.
///
/// # Errors
///
/// Returns the store's read error, `UnknownDeviceType` for an unrecognised
/// type tag, `InvalidArgument` for a malformed record, or
/// `DuplicateIdentifier` if a stored name is already registered.
pub fn load_devices(store: &impl DeviceStore, engine: &mut SimulationEngine) -> Result<usize> {
    let devices = store
        .load()?
        .iter()
        .map(HomeDevice::from_record)
        .collect::<Result<Vec<_>>>()?;

    let count = devices.len();
    let mut staged = engine.clone();
    for device in devices {
        staged.add_device(device)?;
    }
    *engine = staged;
    debug!(count, "devices loaded from store");
    Ok(count)
}

/// Upserts the current state of every engine device.
///
/// # Errors
///
/// Returns the store's write error.
pub fn save_devices(store: &mut impl DeviceStore, engine: &SimulationEngine) -> Result<()> {
    let records: Vec<DeviceRecord> = engine.devices().iter().map(DeviceRecord::from).collect();
    store.save_all(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn legacy(name: &str, tag: &str) -> DeviceRecord {
        DeviceRecord {
            name: name.to_string(),
            device_type: tag.to_string(),
            is_on: true,
            rated_watts: None,
            brightness_percent: None,
            has_occupancy_sensor: None,
            target_temperature_c: None,
            current_temperature_c: None,
            fan_speed: None,
            internal_temperature_c: None,
        }
    }

    #[test]
    fn light_record_keeps_base_watts_and_brightness() {
        let mut light = Light::new("Lamp", 15.0, true).unwrap();
        light.dim(40).unwrap();
        light.set_on(true);
        let record = DeviceRecord::from(&HomeDevice::from(light));
        assert_eq!(record.device_type, "Light");
        assert_eq!(record.rated_watts, Some(15.0));
        assert_eq!(record.brightness_percent, Some(40));
        assert_eq!(record.fan_speed, None);

        let rebuilt = HomeDevice::from_record(&record).unwrap();
        assert!(rebuilt.is_on());
        assert_relative_eq!(rebuilt.power_rating_watts(), 6.0);
    }

    #[test]
    fn climate_record_keeps_rating_at_speed_zero() {
        let mut unit = ClimateControl::new("HVAC", 1000.0).unwrap();
        unit.set_target_temperature_c(24.0).unwrap();
        let record = DeviceRecord::from(&HomeDevice::from(unit));
        let rebuilt = HomeDevice::from_record(&record).unwrap();
        assert_eq!(rebuilt.power_rating_watts(), 1000.0);
        assert!(!rebuilt.is_on());
        assert_eq!(rebuilt.describe(), HomeDevice::from_record(&record).unwrap().describe());
    }

    #[test]
    fn legacy_tags_and_default_ratings() {
        let light = HomeDevice::from_record(&legacy("L", "SmartLight")).unwrap();
        assert_eq!(light.device_type(), DeviceType::Light);
        assert_eq!(light.power_rating_watts(), LEGACY_LIGHT_WATTS);

        let fridge = HomeDevice::from_record(&legacy("F", "SmartRefrigerator")).unwrap();
        assert_eq!(fridge.power_rating_watts(), LEGACY_REFRIGERATOR_WATTS);

        let mut hvac = legacy("H", "SmartHVAC");
        hvac.fan_speed = Some(2);
        let hvac = HomeDevice::from_record(&hvac).unwrap();
        assert_eq!(hvac.power_rating_watts(), 300.0);
    }

    #[test]
    fn unknown_tag_is_reported() {
        let err = HomeDevice::from_record(&legacy("T", "SmartToaster")).unwrap_err();
        assert!(matches!(err, SimError::UnknownDeviceType(tag) if tag == "SmartToaster"));
    }

    #[test]
    fn memory_store_upserts_by_name() {
        let mut store = MemoryDeviceStore::new();
        store.save(&legacy("A", "Light")).unwrap();
        store.save(&legacy("B", "Light")).unwrap();
        let mut updated = legacy("A", "Light");
        updated.is_on = false;
        store.save(&updated).unwrap();

        let records = store.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "A");
        assert!(!records[0].is_on);
    }

    #[test]
    fn load_devices_surfaces_unknown_types() {
        let mut store = MemoryDeviceStore::new();
        store.save(&legacy("Lamp", "Light")).unwrap();
        store.save(&legacy("Toaster", "Toaster")).unwrap();

        let mut engine = SimulationEngine::new(0.3).unwrap();
        let err = load_devices(&store, &mut engine).unwrap_err();
        assert!(matches!(err, SimError::UnknownDeviceType(tag) if tag == "Toaster"));
        assert!(engine.devices().is_empty());
    }

    #[test]
    fn load_devices_rejects_names_already_registered() {
        let mut store = MemoryDeviceStore::new();
        store.save(&legacy("Lamp", "Light")).unwrap();
        store.save(&legacy("Fridge", "Refrigerator")).unwrap();

        let mut engine = SimulationEngine::new(0.3).unwrap();
        engine
            .add_device(Refrigerator::new("Fridge", 100.0).unwrap())
            .unwrap();
        let err = load_devices(&store, &mut engine).unwrap_err();
        assert!(matches!(err, SimError::DuplicateIdentifier(_)));
        assert_eq!(engine.devices().len(), 1);
    }

    #[test]
    fn save_devices_round_trips_through_memory() {
        let mut engine = SimulationEngine::new(0.3).unwrap();
        let fridge = engine
            .add_device(Refrigerator::new("Fridge", 150.0).unwrap())
            .unwrap();
        engine.turn_on(fridge).unwrap();
        engine.set_internal_temperature_c(fridge, 3.0).unwrap();

        let mut store = MemoryDeviceStore::new();
        save_devices(&mut store, &engine).unwrap();

        let mut restored = SimulationEngine::new(0.3).unwrap();
        load_devices(&store, &mut restored).unwrap();
        assert_eq!(restored.statuses(), engine.statuses());
    }
}
