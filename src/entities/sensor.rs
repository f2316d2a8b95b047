use chrono::{DateTime, Utc};

use super::{EntityKind, EntitySnapshot, StateClass, StateValue, VehicleEntity};
use crate::models::{PowerDeliveryState, Vehicle};

/// Which part of the vehicle a sensor reads, and which capability gates it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorGroup {
    ChargeState,
    Odometer,
    SmartCharging,
}

impl SensorGroup {
    fn supported_by(&self, vehicle: &Vehicle) -> bool {
        let caps = &vehicle.capabilities;
        match self {
            SensorGroup::ChargeState => caps.charge_state.is_capable,
            SensorGroup::Odometer => caps.odometer.is_capable,
            SensorGroup::SmartCharging => caps.smart_charging.is_capable,
        }
    }

    fn last_reset(&self, vehicle: &Vehicle) -> Option<DateTime<Utc>> {
        match self {
            SensorGroup::ChargeState => vehicle.charge_state.last_updated,
            SensorGroup::Odometer => vehicle.odometer.last_updated,
            SensorGroup::SmartCharging => Some(vehicle.last_seen),
        }
    }
}

#[derive(Debug)]
pub struct SensorDescription {
    pub key: &'static str,
    pub translation_key: &'static str,
    pub group: SensorGroup,
    pub device_class: Option<&'static str>,
    pub state_class: Option<StateClass>,
    pub unit: Option<&'static str>,
    pub enabled_by_default: bool,
    pub has_options: bool,
    pub value: fn(&Vehicle) -> Option<StateValue>,
}

fn number(v: Option<f64>) -> Option<StateValue> {
    v.map(StateValue::Number)
}

pub static CHARGE_STATE_SENSORS: [SensorDescription; 7] = [
    SensorDescription {
        key: "battery_capacity",
        translation_key: "charge_state_battery_capacity",
        group: SensorGroup::ChargeState,
        device_class: Some("energy"),
        state_class: Some(StateClass::Total),
        unit: Some("kWh"),
        enabled_by_default: true,
        has_options: false,
        value: |v| number(v.charge_state.battery_capacity),
    },
    SensorDescription {
        key: "battery_level",
        translation_key: "charge_state_battery_level",
        group: SensorGroup::ChargeState,
        device_class: Some("battery"),
        state_class: Some(StateClass::Measurement),
        unit: Some("%"),
        enabled_by_default: true,
        has_options: false,
        value: |v| number(v.charge_state.battery_level),
    },
    SensorDescription {
        key: "charge_limit",
        translation_key: "charge_state_charge_limit",
        group: SensorGroup::ChargeState,
        device_class: Some("battery"),
        state_class: Some(StateClass::Measurement),
        unit: Some("%"),
        enabled_by_default: true,
        has_options: false,
        value: |v| number(v.charge_state.charge_limit),
    },
    SensorDescription {
        key: "charge_time_remaining",
        translation_key: "charge_state_charge_time_remaining",
        group: SensorGroup::ChargeState,
        device_class: Some("duration"),
        state_class: Some(StateClass::Total),
        unit: Some("min"),
        enabled_by_default: true,
        has_options: false,
        value: |v| v.charge_state.charge_time_remaining.map(StateValue::Integer),
    },
    SensorDescription {
        key: "max_current",
        translation_key: "charge_state_max_current",
        group: SensorGroup::ChargeState,
        device_class: Some("current"),
        state_class: Some(StateClass::Measurement),
        unit: Some("A"),
        enabled_by_default: false,
        has_options: false,
        value: |v| number(v.charge_state.max_current),
    },
    SensorDescription {
        key: "power_delivery_state",
        translation_key: "charge_state_power_delivery_state",
        group: SensorGroup::ChargeState,
        device_class: Some("enum"),
        state_class: None,
        unit: None,
        enabled_by_default: true,
        has_options: true,
        value: |v| {
            v.charge_state
                .power_delivery_state
                .map(|s| StateValue::Text(s.as_str().to_string()))
        },
    },
    SensorDescription {
        key: "range",
        translation_key: "charge_state_range",
        group: SensorGroup::ChargeState,
        device_class: Some("distance"),
        state_class: Some(StateClass::Total),
        unit: Some("km"),
        enabled_by_default: true,
        has_options: false,
        value: |v| number(v.charge_state.range),
    },
];

pub static ODOMETER_SENSORS: [SensorDescription; 1] = [SensorDescription {
    key: "distance",
    translation_key: "odometer_distance",
    group: SensorGroup::Odometer,
    device_class: Some("distance"),
    state_class: Some(StateClass::Total),
    unit: Some("km"),
    enabled_by_default: true,
    has_options: false,
    value: |v| number(v.odometer.distance),
}];

pub static SMART_CHARGING_SENSORS: [SensorDescription; 2] = [
    SensorDescription {
        key: "deadline",
        translation_key: "smart_charging_deadline",
        group: SensorGroup::SmartCharging,
        device_class: Some("timestamp"),
        state_class: None,
        unit: None,
        enabled_by_default: true,
        has_options: false,
        value: |v| {
            v.smart_charging_policy
                .as_ref()
                .and_then(|p| p.deadline)
                .map(|t| StateValue::Text(t.format("%H:%M:%S").to_string()))
        },
    },
    SensorDescription {
        key: "minimum_charge_limit",
        translation_key: "smart_charging_minimum_charge_limit",
        group: SensorGroup::SmartCharging,
        device_class: None,
        state_class: Some(StateClass::Measurement),
        unit: Some("%"),
        enabled_by_default: true,
        has_options: false,
        value: |v| {
            number(
                v.smart_charging_policy
                    .as_ref()
                    .and_then(|p| p.minimum_charge_limit),
            )
        },
    },
];

pub(super) fn entities_for(vehicle: &Vehicle) -> Vec<VehicleEntity> {
    [
        &CHARGE_STATE_SENSORS[..],
        &ODOMETER_SENSORS[..],
        &SMART_CHARGING_SENSORS[..],
    ]
    .into_iter()
    .flatten()
    .filter(|d| d.group.supported_by(vehicle))
    .map(|d| VehicleEntity::new(vehicle, EntityKind::Sensor(d)))
    .collect()
}

pub(super) fn fill(d: &SensorDescription, vehicle: Option<&Vehicle>, snapshot: &mut EntitySnapshot) {
    snapshot.device_class = d.device_class;
    snapshot.state_class = d.state_class;
    snapshot.unit_of_measurement = d.unit;
    snapshot.enabled_by_default = d.enabled_by_default;
    if d.has_options {
        snapshot.options = Some(PowerDeliveryState::ALL.iter().map(|s| s.as_str()).collect());
    }
    if let Some(vehicle) = vehicle {
        snapshot.state = (d.value)(vehicle);
        if d.state_class == Some(StateClass::Total) {
            snapshot.last_reset = d.group.last_reset(vehicle);
        }
    }
}
