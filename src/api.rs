//! Enode REST API access
//!
//! [`EnodeApi`] is the seam the coordinator, webhook setup and entity actions
//! talk through. [`EnodeClient`] is the reqwest-backed implementation that
//! authenticates with OAuth2 client credentials.

mod auth;
mod client;

pub use auth::{ClientCredentials, TokenResponse};
pub use client::EnodeClient;

use crate::error::Result;
use crate::models::{
    ChargeAction, ChargeKind, Link, Vehicle, VendorType, Webhook, WebhookEventType, WebhookTest,
};

pub const PRODUCTION_OAUTH2_TOKEN: &str = "https://oauth.production.enode.io/oauth2/token";
pub const SANDBOX_OAUTH2_TOKEN: &str = "https://oauth.sandbox.enode.io/oauth2/token";
pub const PRODUCTION_API_URL: &str = "https://enode-api.production.enode.io";
pub const SANDBOX_API_URL: &str = "https://enode-api.sandbox.enode.io";

/// Scopes requested for every user link
pub const SCOPES: [&str; 14] = [
    "battery:control:operation_mode",
    "battery:read:location",
    "battery:read:data",
    "charger:control:charging",
    "charger:read:data",
    "hvac:control:mode",
    "hvac:read:data",
    "inverter:read:data",
    "inverter:read:location",
    "meter:read:location",
    "meter:read:data",
    "vehicle:control:charging",
    "vehicle:read:data",
    "vehicle:read:location",
];

/// Languages accepted by the link UI
pub const LANGUAGES: [&str; 14] = [
    "da-DK", "de-DE", "en-US", "en-GB", "es-ES", "fi-FI", "fr-FR", "it-IT", "nb-NO", "nl-NL",
    "nl-BE", "pt-PT", "ro-RO", "sv-SE",
];

pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Map a requested language onto one the link UI supports
pub fn link_language(language: &str) -> &str {
    if LANGUAGES.contains(&language) {
        language
    } else {
        DEFAULT_LANGUAGE
    }
}

/// Token and API base URLs for the selected environment
pub fn environment_urls(sandbox: bool) -> (&'static str, &'static str) {
    if sandbox {
        (SANDBOX_OAUTH2_TOKEN, SANDBOX_API_URL)
    } else {
        (PRODUCTION_OAUTH2_TOKEN, PRODUCTION_API_URL)
    }
}

/// Operations the bridge performs against Enode
#[async_trait::async_trait]
pub trait EnodeApi: Send + Sync {
    /// All vehicles visible to the client
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>>;

    /// Vehicles linked to one user
    async fn list_user_vehicles(&self, user_id: &str) -> Result<Vec<Vehicle>>;

    /// Start a link session for `user_id`
    async fn user_link(
        &self,
        user_id: &str,
        language: &str,
        redirect_uri: &str,
        vendor: Option<&str>,
        vendor_type: Option<VendorType>,
    ) -> Result<Link>;

    async fn create_webhook(
        &self,
        url: &str,
        secret: &str,
        events: &[WebhookEventType],
    ) -> Result<Webhook>;

    async fn delete_webhook(&self, webhook_id: &str) -> Result<()>;

    /// Ask Enode to deliver an `enode:webhook:test` event
    async fn test_webhook(&self, webhook_id: &str) -> Result<WebhookTest>;

    async fn control_charging(&self, vehicle_id: &str, action: ChargeKind) -> Result<ChargeAction>;

    /// Hint Enode to refresh vehicle data from the vendor
    async fn refresh_vehicle_data(&self, vehicle_id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_language_falls_back() {
        assert_eq!(link_language("nl-BE"), "nl-BE");
        assert_eq!(link_language("browser"), "en-US");
        assert_eq!(link_language("xx-XX"), "en-US");
    }

    #[test]
    fn sandbox_selects_sandbox_hosts() {
        let (token, api) = environment_urls(true);
        assert!(token.contains("sandbox") && api.contains("sandbox"));
        let (token, api) = environment_urls(false);
        assert!(token.contains("production") && api.contains("production"));
    }
}
