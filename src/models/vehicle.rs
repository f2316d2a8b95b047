use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInformation {
    pub display_name: Option<String>,
    pub vin: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
}

/// Power delivery state reported in the charge state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerDeliveryState {
    #[serde(rename = "UNKNOWN")]
    Unknown,
    #[serde(rename = "UNPLUGGED")]
    Unplugged,
    #[serde(rename = "PLUGGED_IN:INITIALIZING")]
    PluggedInInitializing,
    #[serde(rename = "PLUGGED_IN:CHARGING")]
    PluggedInCharging,
    #[serde(rename = "PLUGGED_IN:STOPPED")]
    PluggedInStopped,
    #[serde(rename = "PLUGGED_IN:COMPLETE")]
    PluggedInComplete,
    #[serde(rename = "PLUGGED_IN:NO_POWER")]
    PluggedInNoPower,
    #[serde(rename = "PLUGGED_IN:FAULT")]
    PluggedInFault,
    #[serde(rename = "PLUGGED_IN:DISCHARGING")]
    PluggedInDischarging,
}

impl PowerDeliveryState {
    pub const ALL: [PowerDeliveryState; 9] = [
        Self::Unknown,
        Self::Unplugged,
        Self::PluggedInInitializing,
        Self::PluggedInCharging,
        Self::PluggedInStopped,
        Self::PluggedInComplete,
        Self::PluggedInNoPower,
        Self::PluggedInFault,
        Self::PluggedInDischarging,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Unplugged => "UNPLUGGED",
            Self::PluggedInInitializing => "PLUGGED_IN:INITIALIZING",
            Self::PluggedInCharging => "PLUGGED_IN:CHARGING",
            Self::PluggedInStopped => "PLUGGED_IN:STOPPED",
            Self::PluggedInComplete => "PLUGGED_IN:COMPLETE",
            Self::PluggedInNoPower => "PLUGGED_IN:NO_POWER",
            Self::PluggedInFault => "PLUGGED_IN:FAULT",
            Self::PluggedInDischarging => "PLUGGED_IN:DISCHARGING",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeState {
    pub charge_rate: Option<f64>,
    /// Minutes until the charge limit is reached
    pub charge_time_remaining: Option<i64>,
    pub is_fully_charged: Option<bool>,
    pub is_plugged_in: Option<bool>,
    pub is_charging: Option<bool>,
    /// Percent
    pub battery_level: Option<f64>,
    /// Kilometers
    pub range: Option<f64>,
    /// kWh
    pub battery_capacity: Option<f64>,
    /// Percent
    pub charge_limit: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,
    pub power_delivery_state: Option<PowerDeliveryState>,
    /// Amperes
    pub max_current: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartChargingPolicy {
    #[serde(default, with = "time_of_day")]
    pub deadline: Option<NaiveTime>,
    pub is_enabled: Option<bool>,
    pub minimum_charge_limit: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Odometer {
    /// Kilometers
    pub distance: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Feature gate plus the interventions currently blocking it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    pub is_capable: bool,
    #[serde(default)]
    pub intervention_ids: Vec<String>,
}

impl Capability {
    pub fn capable() -> Self {
        Self {
            is_capable: true,
            intervention_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCapabilities {
    pub information: Capability,
    pub charge_state: Capability,
    pub location: Capability,
    pub odometer: Capability,
    pub set_max_current: Capability,
    pub start_charging: Capability,
    pub stop_charging: Capability,
    pub smart_charging: Capability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub user_id: String,
    pub vendor: String,
    pub is_reachable: Option<bool>,
    pub last_seen: DateTime<Utc>,
    pub information: VehicleInformation,
    pub charge_state: ChargeState,
    pub smart_charging_policy: Option<SmartChargingPolicy>,
    pub location: Location,
    pub odometer: Odometer,
    pub capabilities: VehicleCapabilities,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Vehicle {
    /// Human readable name: display name, else "brand model"
    pub fn name(&self) -> String {
        if let Some(name) = &self.information.display_name {
            return name.clone();
        }
        format!(
            "{} {}",
            self.information.brand.as_deref().unwrap_or("None"),
            self.information.model.as_deref().unwrap_or("None")
        )
    }

    pub fn is_reachable(&self) -> bool {
        self.is_reachable == Some(true)
    }
}

/// `HH:MM` or `HH:MM:SS` time-of-day values
mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => s.serialize_str(&t.format("%H:%M:%S").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| {
            NaiveTime::parse_from_str(&s, "%H:%M:%S%.f")
                .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M"))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_accepts_short_and_long_forms() {
        let p: SmartChargingPolicy =
            serde_json::from_str(r#"{"deadline":"07:30","isEnabled":true}"#).unwrap();
        assert_eq!(p.deadline, NaiveTime::from_hms_opt(7, 30, 0));
        let p: SmartChargingPolicy =
            serde_json::from_str(r#"{"deadline":"23:15:10","minimumChargeLimit":40}"#).unwrap();
        assert_eq!(p.deadline, NaiveTime::from_hms_opt(23, 15, 10));
        assert_eq!(p.minimum_charge_limit, Some(40.0));
        let p: SmartChargingPolicy = serde_json::from_str(r#"{}"#).unwrap();
        assert!(p.deadline.is_none());
    }

    #[test]
    fn power_delivery_state_uses_wire_names() {
        let cs: ChargeState =
            serde_json::from_str(r#"{"powerDeliveryState":"PLUGGED_IN:CHARGING"}"#).unwrap();
        assert_eq!(
            cs.power_delivery_state.map(|s| s.as_str()),
            Some("PLUGGED_IN:CHARGING")
        );
        assert!(serde_json::from_str::<ChargeState>(r#"{"powerDeliveryState":"SIDEWAYS"}"#).is_err());
    }

    #[test]
    fn name_falls_back_to_brand_and_model() {
        let info = VehicleInformation {
            brand: Some("Tesla".into()),
            model: Some("Model 3".into()),
            ..Default::default()
        };
        let v = Vehicle {
            id: "v".into(),
            user_id: "u".into(),
            vendor: "TESLA".into(),
            is_reachable: None,
            last_seen: Utc::now(),
            information: info,
            charge_state: ChargeState::default(),
            smart_charging_policy: None,
            location: Location::default(),
            odometer: Odometer::default(),
            capabilities: VehicleCapabilities::default(),
            scopes: vec![],
        };
        assert_eq!(v.name(), "Tesla Model 3");
        assert!(!v.is_reachable());
    }
}
