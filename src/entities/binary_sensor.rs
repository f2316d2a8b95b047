use super::{EntityKind, EntitySnapshot, StateValue, VehicleEntity};
use crate::models::Vehicle;

#[derive(Debug)]
pub struct BinarySensorDescription {
    pub key: &'static str,
    pub translation_key: &'static str,
    pub device_class: Option<&'static str>,
    pub capable: fn(&Vehicle) -> bool,
    pub value: fn(&Vehicle) -> Option<bool>,
}

pub static BINARY_SENSORS: [BinarySensorDescription; 4] = [
    BinarySensorDescription {
        key: "is_fully_charged",
        translation_key: "charge_state_is_fully_charged",
        device_class: None,
        capable: |v| v.capabilities.charge_state.is_capable,
        value: |v| v.charge_state.is_fully_charged,
    },
    BinarySensorDescription {
        key: "is_plugged_in",
        translation_key: "charge_state_is_plugged_in",
        device_class: Some("plug"),
        capable: |v| v.capabilities.charge_state.is_capable,
        value: |v| v.charge_state.is_plugged_in,
    },
    BinarySensorDescription {
        key: "is_charging",
        translation_key: "charge_state_is_charging",
        device_class: Some("battery_charging"),
        capable: |v| v.capabilities.charge_state.is_capable,
        value: |v| v.charge_state.is_charging,
    },
    BinarySensorDescription {
        key: "is_enabled",
        translation_key: "smart_charging_is_enabled",
        device_class: None,
        capable: |v| v.capabilities.smart_charging.is_capable,
        value: |v| v.smart_charging_policy.as_ref().and_then(|p| p.is_enabled),
    },
];

pub(super) fn entities_for(vehicle: &Vehicle) -> Vec<VehicleEntity> {
    BINARY_SENSORS
        .iter()
        .filter(|d| (d.capable)(vehicle))
        .map(|d| VehicleEntity::new(vehicle, EntityKind::BinarySensor(d)))
        .collect()
}

pub(super) fn fill(
    d: &BinarySensorDescription,
    vehicle: Option<&Vehicle>,
    snapshot: &mut EntitySnapshot,
) {
    snapshot.device_class = d.device_class;
    snapshot.state = vehicle.and_then(d.value).map(StateValue::Bool);
}
