#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use enode_bridge::api::EnodeApi;
use enode_bridge::config::EntryConfig;
use enode_bridge::entry::EntryStore;
use enode_bridge::error::{BridgeError, Result};
use enode_bridge::instance::Instance;
use enode_bridge::models::{
    ActionState, Capability, ChargeAction, ChargeKind, ChargeState, Link, Location, Odometer,
    TargetType, Vehicle, VehicleCapabilities, VehicleInformation, VendorType, Webhook,
    WebhookEventType, WebhookTest, WebhookTestStatus,
};

/// Recorded call against the mock
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListVehicles,
    ListUserVehicles(String),
    UserLink {
        user_id: String,
        language: String,
        redirect_uri: String,
        vendor_type: Option<VendorType>,
    },
    CreateWebhook {
        url: String,
        secret: String,
        events: Vec<WebhookEventType>,
    },
    DeleteWebhook(String),
    TestWebhook(String),
    ControlCharging(String, ChargeKind),
    RefreshHint(String),
}

/// Scriptable in-memory Enode API
#[derive(Default)]
pub struct MockApi {
    pub calls: Mutex<Vec<Call>>,
    pub vehicles: Mutex<Vec<Vehicle>>,
    pub fail_list: Mutex<Option<String>>,
    pub test_status: Mutex<Option<WebhookTestStatus>>,
    pub refresh_error: Mutex<Option<(String, String)>>,
    pub refresh_status: Mutex<Option<u16>>,
}

impl MockApi {
    pub fn new(vehicles: Vec<Vehicle>) -> Arc<Self> {
        let api = Self::default();
        *api.vehicles.lock().unwrap() = vehicles;
        Arc::new(api)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_vehicles(&self, vehicles: Vec<Vehicle>) {
        *self.vehicles.lock().unwrap() = vehicles;
    }

    pub fn fail_listing(&self, message: Option<&str>) {
        *self.fail_list.lock().unwrap() = message.map(str::to_string);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn listing(&self) -> Result<Vec<Vehicle>> {
        if let Some(msg) = self.fail_list.lock().unwrap().clone() {
            return Err(BridgeError::http(503, msg));
        }
        Ok(self.vehicles.lock().unwrap().clone())
    }
}

#[async_trait::async_trait]
impl EnodeApi for MockApi {
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        self.record(Call::ListVehicles);
        self.listing()
    }

    async fn list_user_vehicles(&self, user_id: &str) -> Result<Vec<Vehicle>> {
        self.record(Call::ListUserVehicles(user_id.to_string()));
        self.listing()
    }

    async fn user_link(
        &self,
        user_id: &str,
        language: &str,
        redirect_uri: &str,
        _vendor: Option<&str>,
        vendor_type: Option<VendorType>,
    ) -> Result<Link> {
        self.record(Call::UserLink {
            user_id: user_id.to_string(),
            language: language.to_string(),
            redirect_uri: redirect_uri.to_string(),
            vendor_type,
        });
        Ok(Link {
            url: "https://link.enode.io/session/abc".to_string(),
            token: "tok".to_string(),
        })
    }

    async fn create_webhook(
        &self,
        url: &str,
        secret: &str,
        events: &[WebhookEventType],
    ) -> Result<Webhook> {
        self.record(Call::CreateWebhook {
            url: url.to_string(),
            secret: secret.to_string(),
            events: events.to_vec(),
        });
        Ok(Webhook {
            id: "wh-1".to_string(),
            url: url.to_string(),
            events: events.iter().map(|e| e.as_str().to_string()).collect(),
            is_active: true,
            created_at: Utc::now(),
            api_version: None,
            last_success: None,
            authentication: None,
        })
    }

    async fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        self.record(Call::DeleteWebhook(webhook_id.to_string()));
        Ok(())
    }

    async fn test_webhook(&self, webhook_id: &str) -> Result<WebhookTest> {
        self.record(Call::TestWebhook(webhook_id.to_string()));
        let status = self
            .test_status
            .lock()
            .unwrap()
            .unwrap_or(WebhookTestStatus::Success);
        Ok(WebhookTest {
            status,
            description: match status {
                WebhookTestStatus::Success => "Test event sent".to_string(),
                WebhookTestStatus::Failure => "Endpoint unreachable".to_string(),
            },
            response: None,
        })
    }

    async fn control_charging(&self, vehicle_id: &str, action: ChargeKind) -> Result<ChargeAction> {
        self.record(Call::ControlCharging(vehicle_id.to_string(), action));
        Ok(ChargeAction {
            id: "action-1".to_string(),
            user_id: "user-1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            completed_at: None,
            state: ActionState::Pending,
            target_id: vehicle_id.to_string(),
            target_type: TargetType::Vehicle,
            kind: action,
            failure_reason: None,
        })
    }

    async fn refresh_vehicle_data(&self, vehicle_id: &str) -> Result<()> {
        self.record(Call::RefreshHint(vehicle_id.to_string()));
        if let Some(status) = *self.refresh_status.lock().unwrap() {
            return Err(BridgeError::http(status, "refresh hint failed"));
        }
        match self.refresh_error.lock().unwrap().clone() {
            Some((title, detail)) => Err(BridgeError::api("bad-request", title, detail)),
            None => Ok(()),
        }
    }
}

pub fn all_capabilities() -> VehicleCapabilities {
    VehicleCapabilities {
        information: Capability::capable(),
        charge_state: Capability::capable(),
        location: Capability::capable(),
        odometer: Capability::capable(),
        set_max_current: Capability::capable(),
        start_charging: Capability::capable(),
        stop_charging: Capability::capable(),
        smart_charging: Capability::capable(),
    }
}

/// A reachable vehicle with every capability and populated state
pub fn vehicle(id: &str) -> Vehicle {
    let updated = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    Vehicle {
        id: id.to_string(),
        user_id: "user-1".to_string(),
        vendor: "TESLA".to_string(),
        is_reachable: Some(true),
        last_seen: Utc.with_ymd_and_hms(2024, 5, 1, 10, 5, 0).unwrap(),
        information: VehicleInformation {
            display_name: None,
            vin: Some(format!("VIN-{}", id)),
            brand: Some("Tesla".to_string()),
            model: Some("Model Y".to_string()),
            year: Some(2023),
        },
        charge_state: ChargeState {
            battery_level: Some(64.0),
            battery_capacity: Some(75.0),
            range: Some(310.0),
            charge_limit: Some(80.0),
            is_charging: Some(false),
            is_plugged_in: Some(true),
            is_fully_charged: Some(false),
            last_updated: Some(updated),
            ..Default::default()
        },
        smart_charging_policy: None,
        location: Location {
            id: Some("home".to_string()),
            latitude: Some(59.91),
            longitude: Some(10.75),
            last_updated: Some(updated),
        },
        odometer: Odometer {
            distance: Some(12345.0),
            last_updated: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()),
        },
        capabilities: all_capabilities(),
        scopes: vec!["vehicle:read:data".to_string()],
    }
}

pub fn entry_config(id: &str) -> EntryConfig {
    EntryConfig {
        id: id.to_string(),
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        sandbox: true,
        user_id: None,
        language: "en-US".to_string(),
    }
}

/// Instance backed by a mock and a temporary store
pub fn instance(
    id: &str,
    api: Arc<MockApi>,
    dir: &std::path::Path,
    external_url: Option<&str>,
) -> Instance {
    instance_with(entry_config(id), api, dir, external_url)
}

pub fn instance_with(
    config: EntryConfig,
    api: Arc<MockApi>,
    dir: &std::path::Path,
    external_url: Option<&str>,
) -> Instance {
    let store = EntryStore::open(dir, &config.id).unwrap();
    Instance::new(
        config,
        external_url.map(str::to_string),
        api,
        store,
        Duration::from_secs(300),
    )
}

/// Wire form of a vehicle as Enode sends it
pub fn vehicle_json(id: &str, battery_level: f64) -> serde_json::Value {
    let capable = serde_json::json!({ "isCapable": true, "interventionIds": [] });
    serde_json::json!({
        "id": id,
        "userId": "user-1",
        "vendor": "TESLA",
        "lastSeen": "2024-05-01T10:05:00Z",
        "isReachable": true,
        "information": {
            "vin": "5YJ3E1EA1KF000001",
            "brand": "Tesla",
            "model": "Model 3",
            "year": 2021,
            "displayName": null
        },
        "chargeState": {
            "batteryLevel": battery_level,
            "range": 290.5,
            "isPluggedIn": true,
            "isCharging": true,
            "isFullyCharged": false,
            "batteryCapacity": 73.5,
            "chargeLimit": 90,
            "chargeRate": 11.2,
            "chargeTimeRemaining": 95,
            "lastUpdated": "2024-05-01T10:00:00Z",
            "maxCurrent": 16,
            "powerDeliveryState": "PLUGGED_IN:CHARGING"
        },
        "smartChargingPolicy": {
            "deadline": "07:00",
            "isEnabled": true,
            "minimumChargeLimit": 40
        },
        "location": {
            "id": null,
            "latitude": 59.9139,
            "longitude": 10.7522,
            "lastUpdated": "2024-05-01T09:58:00Z"
        },
        "odometer": {
            "distance": 24130.4,
            "lastUpdated": "2024-05-01T09:00:00Z"
        },
        "capabilities": {
            "information": capable,
            "chargeState": capable,
            "location": capable,
            "odometer": capable,
            "setMaxCurrent": { "isCapable": false, "interventionIds": ["int-1"] },
            "startCharging": capable,
            "stopCharging": capable,
            "smartCharging": capable
        },
        "scopes": ["vehicle:read:data", "vehicle:control:charging"]
    })
}

/// A `user:vehicle:updated` event carrying `vehicle_json`
pub fn vehicle_updated_event(id: &str, battery_level: f64) -> serde_json::Value {
    serde_json::json!({
        "event": "user:vehicle:updated",
        "version": "2024-10-01",
        "createdAt": "2024-05-01T10:05:01Z",
        "user": { "id": "user-1" },
        "vehicle": vehicle_json(id, battery_level),
        "updatedFields": ["chargeState.batteryLevel"]
    })
}

pub fn test_event() -> serde_json::Value {
    serde_json::json!({
        "event": "enode:webhook:test",
        "version": "2024-10-01",
        "createdAt": "2024-05-01T10:05:02Z"
    })
}
