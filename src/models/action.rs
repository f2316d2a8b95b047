use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of an issued action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionState {
    Pending,
    Confirmed,
    Failed,
    Cancelled,
}

impl ActionState {
    pub fn is_final(&self) -> bool {
        !matches!(self, ActionState::Pending)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeKind {
    Start,
    Stop,
}

impl ChargeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeKind::Start => "START",
            ChargeKind::Stop => "STOP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Vehicle,
    Charger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    #[serde(rename = "type")]
    pub kind: String,
    pub detail: String,
}

/// Charge action as returned by `POST /vehicles/{id}/charging`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeAction {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub state: ActionState,
    pub target_id: String,
    pub target_type: TargetType,
    pub kind: ChargeKind,
    #[serde(default)]
    pub failure_reason: Option<FailureReason>,
}
