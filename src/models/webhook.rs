use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Device families Enode aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorType {
    Vehicle,
    Charger,
    Hvac,
    Inverter,
    Battery,
    Meter,
}

impl VendorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorType::Vehicle => "vehicle",
            VendorType::Charger => "charger",
            VendorType::Hvac => "hvac",
            VendorType::Inverter => "inverter",
            VendorType::Battery => "battery",
            VendorType::Meter => "meter",
        }
    }

    /// Subscription events scoped to this device family
    pub fn webhook_events(&self) -> Vec<WebhookEventType> {
        WebhookEventType::for_vendor_type(*self)
    }
}

/// Subscription vocabulary for `POST /webhooks`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebhookEventType {
    All,
    UserVehicleDiscovered,
    UserVehicleUpdated,
    UserVehicleDeleted,
    UserVehicleSmartChargingStatusUpdated,
    UserChargeActionUpdated,
    UserVendorActionUpdated,
    UserScheduleExecutionUpdated,
    UserChargerDiscovered,
    UserChargerUpdated,
    UserChargerDeleted,
    UserHvacDiscovered,
    UserHvacUpdated,
    UserHvacDeleted,
    UserInverterDiscovered,
    UserInverterUpdated,
    UserInverterDeleted,
    UserInverterStatisticsUpdated,
    UserCredentialsInvalidated,
    UserBatteryDiscovered,
    UserBatteryUpdated,
    UserBatteryDeleted,
    EnodeWebhookTest,
    UserMeterDiscovered,
    UserMeterUpdated,
    UserMeterDeleted,
}

impl WebhookEventType {
    pub const ALL: [WebhookEventType; 26] = [
        Self::All,
        Self::UserVehicleDiscovered,
        Self::UserVehicleUpdated,
        Self::UserVehicleDeleted,
        Self::UserVehicleSmartChargingStatusUpdated,
        Self::UserChargeActionUpdated,
        Self::UserVendorActionUpdated,
        Self::UserScheduleExecutionUpdated,
        Self::UserChargerDiscovered,
        Self::UserChargerUpdated,
        Self::UserChargerDeleted,
        Self::UserHvacDiscovered,
        Self::UserHvacUpdated,
        Self::UserHvacDeleted,
        Self::UserInverterDiscovered,
        Self::UserInverterUpdated,
        Self::UserInverterDeleted,
        Self::UserInverterStatisticsUpdated,
        Self::UserCredentialsInvalidated,
        Self::UserBatteryDiscovered,
        Self::UserBatteryUpdated,
        Self::UserBatteryDeleted,
        Self::EnodeWebhookTest,
        Self::UserMeterDiscovered,
        Self::UserMeterUpdated,
        Self::UserMeterDeleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "*",
            Self::UserVehicleDiscovered => "user:vehicle:discovered",
            Self::UserVehicleUpdated => "user:vehicle:updated",
            Self::UserVehicleDeleted => "user:vehicle:deleted",
            Self::UserVehicleSmartChargingStatusUpdated => {
                "user:vehicle:smart-charging-status-updated"
            }
            Self::UserChargeActionUpdated => "user:charge-action:updated",
            Self::UserVendorActionUpdated => "user:vendor-action:updated",
            Self::UserScheduleExecutionUpdated => "user:schedule:execution-updated",
            Self::UserChargerDiscovered => "user:charger:discovered",
            Self::UserChargerUpdated => "user:charger:updated",
            Self::UserChargerDeleted => "user:charger:deleted",
            Self::UserHvacDiscovered => "user:hvac:discovered",
            Self::UserHvacUpdated => "user:hvac:updated",
            Self::UserHvacDeleted => "user:hvac:deleted",
            Self::UserInverterDiscovered => "user:inverter:discovered",
            Self::UserInverterUpdated => "user:inverter:updated",
            Self::UserInverterDeleted => "user:inverter:deleted",
            Self::UserInverterStatisticsUpdated => "user:inverter:statistics-updated",
            Self::UserCredentialsInvalidated => "user:credentials:invalidated",
            Self::UserBatteryDiscovered => "user:battery:discovered",
            Self::UserBatteryUpdated => "user:battery:updated",
            Self::UserBatteryDeleted => "user:battery:deleted",
            Self::EnodeWebhookTest => "enode:webhook:test",
            Self::UserMeterDiscovered => "user:meter:discovered",
            Self::UserMeterUpdated => "user:meter:updated",
            Self::UserMeterDeleted => "user:meter:deleted",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.as_str() == s)
    }

    pub fn for_vendor_type(vendor_type: VendorType) -> Vec<Self> {
        let prefix = format!("user:{}:", vendor_type.as_str());
        Self::ALL
            .iter()
            .copied()
            .filter(|e| e.as_str().starts_with(&prefix))
            .collect()
    }
}

impl Serialize for WebhookEventType {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WebhookEventType {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        Self::from_wire(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown webhook event type: {}", raw)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookAuthentication {
    pub header_name: String,
}

/// Server-side webhook registration. The secret is never returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub events: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub last_success: Option<DateTime<Utc>>,
    #[serde(default)]
    pub authentication: Option<WebhookAuthentication>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookTestStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookTestEndpoint {
    pub code: u16,
    #[serde(default)]
    pub headers: Option<Vec<String>>,
    pub body: String,
}

/// Response of `POST /webhooks/{id}/test`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookTest {
    pub status: WebhookTestStatus,
    pub description: String,
    #[serde(default)]
    pub response: Option<WebhookTestEndpoint>,
}

impl WebhookTest {
    pub fn is_success(&self) -> bool {
        self.status == WebhookTestStatus::Success
    }
}
