use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmartChargingStatusState {
    #[serde(rename = "DISABLED")]
    Disabled,
    #[serde(rename = "CONSIDERING")]
    Considering,
    #[serde(rename = "UNKNOWN")]
    Unknown,
    #[serde(rename = "PLAN:EXECUTING:STOPPING")]
    PlanExecutingStopping,
    #[serde(rename = "PLAN:EXECUTING:STOP_FAILED")]
    PlanExecutingStopFailed,
    #[serde(rename = "PLAN:EXECUTING:STOPPED")]
    PlanExecutingStopped,
    #[serde(rename = "PLAN:EXECUTING:STOPPED:AWAITING_PRICES")]
    PlanExecutingStoppedAwaitingPrices,
    #[serde(rename = "PLAN:EXECUTING:STARTING")]
    PlanExecutingStarting,
    #[serde(rename = "PLAN:EXECUTING:START_FAILED")]
    PlanExecutingStartFailed,
    #[serde(rename = "PLAN:EXECUTING:STARTED")]
    PlanExecutingStarted,
    #[serde(rename = "PLAN:EXECUTING:CHARGE_INTERRUPTED")]
    PlanExecutingChargeInterrupted,
    #[serde(rename = "PLAN:EXECUTING:OVERRIDDEN")]
    PlanExecutingOverridden,
    #[serde(rename = "PLAN:ENDED:FINISHED")]
    PlanEndedFinished,
    #[serde(rename = "PLAN:ENDED:UNPLUGGED")]
    PlanEndedUnplugged,
    #[serde(rename = "PLAN:ENDED:FAILED")]
    PlanEndedFailed,
    #[serde(rename = "PLAN:ENDED:DISABLED")]
    PlanEndedDisabled,
    #[serde(rename = "PLAN:ENDED:DEADLINE_CHANGED")]
    PlanEndedDeadlineChanged,
    #[serde(rename = "FULLY_CHARGED")]
    FullyCharged,
}

impl SmartChargingStatusState {
    /// A plan is currently in force
    pub fn is_executing(&self) -> bool {
        matches!(
            self,
            Self::PlanExecutingStopping
                | Self::PlanExecutingStopFailed
                | Self::PlanExecutingStopped
                | Self::PlanExecutingStoppedAwaitingPrices
                | Self::PlanExecutingStarting
                | Self::PlanExecutingStartFailed
                | Self::PlanExecutingStarted
                | Self::PlanExecutingChargeInterrupted
                | Self::PlanExecutingOverridden
        )
    }
}

/// Smart charging status pushed with `user:vehicle:smart-charging-status-updated`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartChargingStatus {
    pub updated_at: DateTime<Utc>,
    pub vehicle_id: String,
    pub user_id: String,
    pub vendor: String,
    pub state: SmartChargingStatusState,
    pub state_changed_at: DateTime<Utc>,
    #[serde(default)]
    pub consideration: Option<serde_json::Value>,
    #[serde(default)]
    pub plan: Option<serde_json::Value>,
    #[serde(default)]
    pub smart_override: Option<serde_json::Value>,
}
