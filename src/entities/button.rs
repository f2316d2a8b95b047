use serde::Serialize;

use super::{EntityCategory, EntityKind, EntitySnapshot, VehicleEntity};
use crate::error::{BridgeError, Result};
use crate::instance::Instance;
use crate::models::Vehicle;

pub const KEY: &str = "refresh";
pub const TRANSLATION_KEY: &str = "vehicle_refresh";

/// User-facing message raised when an action is refused by Enode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

pub(super) fn entities_for(vehicle: &Vehicle) -> Vec<VehicleEntity> {
    vec![VehicleEntity::new(vehicle, EntityKind::RefreshButton)]
}

pub(super) fn fill(snapshot: &mut EntitySnapshot) {
    snapshot.device_class = Some("restart");
    snapshot.entity_category = Some(EntityCategory::Diagnostic);
}

/// Send a refresh hint. API refusals come back as a notification; other errors propagate.
pub async fn press_refresh(instance: &Instance, vehicle_id: &str) -> Result<Option<Notification>> {
    match instance.api().refresh_vehicle_data(vehicle_id).await {
        Ok(()) => Ok(None),
        Err(BridgeError::Api { title, detail, .. }) => {
            instance.logger().error(&format!(
                "Failed to refresh data for vehicle {}: {} - {}",
                vehicle_id, title, detail
            ));
            Ok(Some(Notification {
                title,
                message: detail,
            }))
        }
        Err(e) => Err(e),
    }
}
