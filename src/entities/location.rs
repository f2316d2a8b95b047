use serde_json::json;

use super::{EntityKind, EntitySnapshot, VehicleEntity};
use crate::models::Vehicle;

pub const KEY: &str = "location";
pub const TRANSLATION_KEY: &str = "location";

pub(super) fn entities_for(vehicle: &Vehicle) -> Vec<VehicleEntity> {
    if vehicle.capabilities.location.is_capable {
        vec![VehicleEntity::new(vehicle, EntityKind::Location)]
    } else {
        Vec::new()
    }
}

pub(super) fn fill(vehicle: Option<&Vehicle>, snapshot: &mut EntitySnapshot) {
    let Some(vehicle) = vehicle else {
        snapshot.attributes.insert("source".to_string(), json!(""));
        return;
    };
    let location = &vehicle.location;
    let attrs = &mut snapshot.attributes;
    attrs.insert("source".to_string(), json!(vehicle.vendor));
    attrs.insert("latitude".to_string(), json!(location.latitude));
    attrs.insert("longitude".to_string(), json!(location.longitude));
    attrs.insert("location_id".to_string(), json!(location.id));
    attrs.insert("last_updated".to_string(), json!(location.last_updated));
}
