//! Webhook event payloads
//!
//! Enode delivers webhooks as a JSON array of events discriminated by the
//! `event` field. A batch is decoded all-or-nothing: one malformed or unknown
//! event rejects the whole delivery.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};
use crate::models::{BasicUser, SmartChargingStatus, Vehicle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleEvent {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub user: BasicUser,
    pub vehicle: Vehicle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartChargingStatusEvent {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub user: BasicUser,
    pub smart_charging_status: SmartChargingStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsInvalidatedEvent {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub user: BasicUser,
    pub vendor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorActionEvent {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub user: BasicUser,
    #[serde(alias = "vendor_action")]
    pub vendor_action: serde_json::Value,
    pub updated_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleExecutionEvent {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub user: BasicUser,
    pub status: serde_json::Value,
    pub schedule: serde_json::Value,
    pub updated_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatEvent {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub pending_events: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEvent {
    pub version: String,
    pub created_at: DateTime<Utc>,
}

/// One entry of a webhook delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum WebhookEvent {
    #[serde(rename = "user:vehicle:discovered")]
    VehicleDiscovered(VehicleEvent),
    #[serde(rename = "user:vehicle:updated")]
    VehicleUpdated(VehicleEvent),
    #[serde(rename = "user:vehicle:deleted")]
    VehicleDeleted(VehicleEvent),
    #[serde(rename = "user:vehicle:smart-charging-status-updated")]
    SmartChargingStatusUpdated(SmartChargingStatusEvent),
    #[serde(rename = "user:credentials:invalidated")]
    CredentialsInvalidated(CredentialsInvalidatedEvent),
    #[serde(rename = "user:vendor-action:updated")]
    VendorActionUpdated(VendorActionEvent),
    #[serde(rename = "user:schedule:execution-updated")]
    ScheduleExecutionUpdated(ScheduleExecutionEvent),
    #[serde(rename = "system:heartbeat")]
    Heartbeat(HeartbeatEvent),
    #[serde(rename = "enode:webhook:test")]
    Test(TestEvent),
}

impl WebhookEvent {
    /// Wire discriminator of this event
    pub fn event_type(&self) -> &'static str {
        match self {
            WebhookEvent::VehicleDiscovered(_) => "user:vehicle:discovered",
            WebhookEvent::VehicleUpdated(_) => "user:vehicle:updated",
            WebhookEvent::VehicleDeleted(_) => "user:vehicle:deleted",
            WebhookEvent::SmartChargingStatusUpdated(_) => {
                "user:vehicle:smart-charging-status-updated"
            }
            WebhookEvent::CredentialsInvalidated(_) => "user:credentials:invalidated",
            WebhookEvent::VendorActionUpdated(_) => "user:vendor-action:updated",
            WebhookEvent::ScheduleExecutionUpdated(_) => "user:schedule:execution-updated",
            WebhookEvent::Heartbeat(_) => "system:heartbeat",
            WebhookEvent::Test(_) => "enode:webhook:test",
        }
    }

    pub fn version(&self) -> &str {
        match self {
            WebhookEvent::VehicleDiscovered(e)
            | WebhookEvent::VehicleUpdated(e)
            | WebhookEvent::VehicleDeleted(e) => &e.version,
            WebhookEvent::SmartChargingStatusUpdated(e) => &e.version,
            WebhookEvent::CredentialsInvalidated(e) => &e.version,
            WebhookEvent::VendorActionUpdated(e) => &e.version,
            WebhookEvent::ScheduleExecutionUpdated(e) => &e.version,
            WebhookEvent::Heartbeat(e) => &e.version,
            WebhookEvent::Test(e) => &e.version,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            WebhookEvent::VehicleDiscovered(e)
            | WebhookEvent::VehicleUpdated(e)
            | WebhookEvent::VehicleDeleted(e) => e.created_at,
            WebhookEvent::SmartChargingStatusUpdated(e) => e.created_at,
            WebhookEvent::CredentialsInvalidated(e) => e.created_at,
            WebhookEvent::VendorActionUpdated(e) => e.created_at,
            WebhookEvent::ScheduleExecutionUpdated(e) => e.created_at,
            WebhookEvent::Heartbeat(e) => e.created_at,
            WebhookEvent::Test(e) => e.created_at,
        }
    }
}

/// Decode a raw webhook body into its events
pub fn decode_batch(body: &[u8]) -> Result<Vec<WebhookEvent>> {
    serde_json::from_slice::<Vec<WebhookEvent>>(body)
        .map_err(|e| BridgeError::decode(format!("invalid webhook batch: {}", e)))
}
