use super::{EntityKind, EntitySnapshot, StateValue, VehicleEntity};
use crate::error::Result;
use crate::instance::Instance;
use crate::models::{ChargeAction, ChargeKind, Vehicle};

pub const KEY: &str = "is_charging";
pub const TRANSLATION_KEY: &str = "charge_state_is_charging";

pub(super) fn entities_for(vehicle: &Vehicle) -> Vec<VehicleEntity> {
    let caps = &vehicle.capabilities;
    if caps.start_charging.is_capable || caps.stop_charging.is_capable {
        vec![VehicleEntity::new(vehicle, EntityKind::ChargeSwitch)]
    } else {
        Vec::new()
    }
}

pub(super) fn fill(vehicle: Option<&Vehicle>, snapshot: &mut EntitySnapshot) {
    snapshot.device_class = Some("switch");
    snapshot.state = vehicle
        .and_then(|v| v.charge_state.is_charging)
        .map(StateValue::Bool);
}

/// Turn charging on or off. Unknown or incapable vehicles are a no-op.
pub async fn set_charging(
    instance: &Instance,
    vehicle_id: &str,
    action: ChargeKind,
) -> Result<Option<ChargeAction>> {
    let Some(vehicle) = instance.coordinator().vehicle(vehicle_id) else {
        return Ok(None);
    };
    let capable = match action {
        ChargeKind::Start => vehicle.capabilities.start_charging.is_capable,
        ChargeKind::Stop => vehicle.capabilities.stop_charging.is_capable,
    };
    if !capable {
        instance.logger().debug(&format!(
            "Vehicle {} cannot {} charging, ignoring",
            vehicle_id,
            action.as_str()
        ));
        return Ok(None);
    }

    let result = instance.api().control_charging(vehicle_id, action).await?;
    instance.logger().info(&format!(
        "Charge action {} for vehicle {} is {:?}",
        action.as_str(),
        vehicle_id,
        result.state
    ));
    Ok(Some(result))
}
