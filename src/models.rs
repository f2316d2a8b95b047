//! Typed Enode API payloads
//!
//! Wire names are camelCase; Rust fields are snake_case. Optional wire fields
//! decode to `None` when absent so partial vendor data never fails a poll.

pub mod action;
pub mod common;
pub mod smart_charging;
pub mod vehicle;
pub mod webhook;

pub use action::{ActionState, ChargeAction, ChargeKind, FailureReason, TargetType};
pub use common::{BasicUser, ErrorResponse, Link, Paged, Pagination};
pub use smart_charging::{SmartChargingStatus, SmartChargingStatusState};
pub use vehicle::{
    Capability, ChargeState, Location, Odometer, PowerDeliveryState, SmartChargingPolicy,
    Vehicle, VehicleCapabilities, VehicleInformation,
};
pub use webhook::{
    VendorType, Webhook, WebhookAuthentication, WebhookEventType, WebhookTest,
    WebhookTestEndpoint, WebhookTestStatus,
};
