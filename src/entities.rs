//! Entity adapters
//!
//! Vehicles are exposed as entity snapshots: sensors, binary sensors, a charge
//! switch, a refresh button and a location. Each platform keeps a closed table
//! of descriptions mapping an entity key to an accessor on [`Vehicle`], and an
//! entity is only created when the vehicle reports the matching capability.

pub mod binary_sensor;
pub mod button;
pub mod location;
pub mod sensor;
pub mod switch;

pub use binary_sensor::BinarySensorDescription;
pub use button::{Notification, press_refresh};
pub use sensor::{SensorDescription, SensorGroup};
pub use switch::set_charging;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::models::Vehicle;

pub const DOMAIN: &str = "enode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Sensor,
    BinarySensor,
    Switch,
    Button,
    Geolocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
    Total,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Diagnostic,
    Config,
}

/// Current value of an entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StateValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

/// Device grouping for a vehicle's entities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifiers: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

impl DeviceInfo {
    /// Identifiers always include the vehicle id; the rest needs the information capability
    pub fn for_vehicle(vehicle: &Vehicle) -> Self {
        let mut info = DeviceInfo {
            identifiers: vec![(DOMAIN.to_string(), vehicle.id.clone())],
            ..Default::default()
        };
        if vehicle.capabilities.information.is_capable {
            if let Some(vin) = &vehicle.information.vin {
                info.identifiers.push((DOMAIN.to_string(), vin.clone()));
            }
            info.name = Some(vehicle.name());
            info.manufacturer = vehicle.information.brand.clone();
            info.model = vehicle.information.model.clone();
            info.serial_number = vehicle.information.vin.clone();
        }
        info
    }
}

#[derive(Debug, Clone, Copy)]
pub enum EntityKind {
    Sensor(&'static SensorDescription),
    BinarySensor(&'static BinarySensorDescription),
    ChargeSwitch,
    RefreshButton,
    Location,
}

/// An entity bound to one vehicle id
#[derive(Debug, Clone)]
pub struct VehicleEntity {
    pub vehicle_id: String,
    pub user_id: String,
    pub device: DeviceInfo,
    pub kind: EntityKind,
}

/// Serializable view of an entity at one moment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub unique_id: String,
    pub platform: Platform,
    pub key: &'static str,
    pub translation_key: &'static str,
    pub vehicle_id: String,
    pub available: bool,
    pub state: Option<StateValue>,
    pub attributes: BTreeMap<String, Value>,
    pub device: DeviceInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_class: Option<StateClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reset: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_category: Option<EntityCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<&'static str>>,
    pub enabled_by_default: bool,
}

impl VehicleEntity {
    pub fn new(vehicle: &Vehicle, kind: EntityKind) -> Self {
        Self {
            vehicle_id: vehicle.id.clone(),
            user_id: vehicle.user_id.clone(),
            device: DeviceInfo::for_vehicle(vehicle),
            kind,
        }
    }

    pub fn key(&self) -> &'static str {
        match self.kind {
            EntityKind::Sensor(d) => d.key,
            EntityKind::BinarySensor(d) => d.key,
            EntityKind::ChargeSwitch => switch::KEY,
            EntityKind::RefreshButton => button::KEY,
            EntityKind::Location => location::KEY,
        }
    }

    pub fn translation_key(&self) -> &'static str {
        match self.kind {
            EntityKind::Sensor(d) => d.translation_key,
            EntityKind::BinarySensor(d) => d.translation_key,
            EntityKind::ChargeSwitch => switch::TRANSLATION_KEY,
            EntityKind::RefreshButton => button::TRANSLATION_KEY,
            EntityKind::Location => location::TRANSLATION_KEY,
        }
    }

    pub fn platform(&self) -> Platform {
        match self.kind {
            EntityKind::Sensor(_) => Platform::Sensor,
            EntityKind::BinarySensor(_) => Platform::BinarySensor,
            EntityKind::ChargeSwitch => Platform::Switch,
            EntityKind::RefreshButton => Platform::Button,
            EntityKind::Location => Platform::Geolocation,
        }
    }

    pub fn unique_id(&self) -> String {
        format!("vehicle_{}_{}", self.vehicle_id, self.key())
    }

    /// Look up this entity's vehicle in the current data
    pub fn vehicle<'v>(&self, vehicles: &'v [Vehicle]) -> Option<&'v Vehicle> {
        vehicles.iter().find(|v| v.id == self.vehicle_id)
    }

    pub fn available(&self, vehicles: &[Vehicle]) -> bool {
        self.vehicle(vehicles).is_some_and(|v| v.is_reachable())
    }

    pub fn snapshot(&self, vehicles: &[Vehicle]) -> EntitySnapshot {
        let vehicle = self.vehicle(vehicles);
        let mut attributes = BTreeMap::new();
        attributes.insert("vehicle_id".to_string(), json!(self.vehicle_id));
        attributes.insert("user_id".to_string(), json!(self.user_id));

        let mut snapshot = EntitySnapshot {
            unique_id: self.unique_id(),
            platform: self.platform(),
            key: self.key(),
            translation_key: self.translation_key(),
            vehicle_id: self.vehicle_id.clone(),
            available: self.available(vehicles),
            state: None,
            attributes,
            device: self.device.clone(),
            device_class: None,
            state_class: None,
            unit_of_measurement: None,
            last_reset: None,
            entity_category: None,
            options: None,
            enabled_by_default: true,
        };

        match self.kind {
            EntityKind::Sensor(d) => sensor::fill(d, vehicle, &mut snapshot),
            EntityKind::BinarySensor(d) => binary_sensor::fill(d, vehicle, &mut snapshot),
            EntityKind::ChargeSwitch => switch::fill(vehicle, &mut snapshot),
            EntityKind::RefreshButton => button::fill(&mut snapshot),
            EntityKind::Location => location::fill(vehicle, &mut snapshot),
        }
        snapshot
    }
}

/// Every entity the given vehicles support, grouped by vehicle
pub fn build_entities(vehicles: &[Vehicle]) -> Vec<VehicleEntity> {
    let mut entities = Vec::new();
    for vehicle in vehicles {
        entities.extend(sensor::entities_for(vehicle));
        entities.extend(binary_sensor::entities_for(vehicle));
        entities.extend(switch::entities_for(vehicle));
        entities.extend(button::entities_for(vehicle));
        entities.extend(location::entities_for(vehicle));
    }
    entities
}

/// Build entities for the vehicles and snapshot them against the same data
pub fn snapshots(vehicles: &[Vehicle]) -> Vec<EntitySnapshot> {
    build_entities(vehicles)
        .iter()
        .map(|e| e.snapshot(vehicles))
        .collect()
}
