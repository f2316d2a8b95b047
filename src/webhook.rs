//! Webhook ingestion and subscription management
//!
//! - `signature`: HMAC-SHA1 delivery authentication
//! - `processor`: applies decoded events to the coordinator
//! - `setup`: create, test and delete the subscription

pub mod processor;
pub mod signature;
pub mod setup;

pub use processor::{ProcessSummary, WebhookProcessor, process_body};
pub use signature::{SIGNATURE_HEADER, compute_signature, verify_signature};
pub use setup::{CreateOutcome, TEST_TIMEOUT, create_webhook, delete_webhook, test_webhook};

use crate::error::{BridgeError, Result};
use crate::instance::Instance;

/// Authenticate a delivery against the instance's stored secret
pub fn authenticate(instance: &Instance, body: &[u8], declared: Option<&str>) -> Result<()> {
    let secret = instance
        .store()
        .webhook_secret()
        .ok_or_else(|| BridgeError::signature("no webhook secret configured"))?;
    let declared = declared.ok_or_else(|| BridgeError::signature("missing signature header"))?;
    verify_signature(&secret, body, declared)
}
