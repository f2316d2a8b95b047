use std::time::Duration;

use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::error::{BridgeError, Result};
use crate::instance::Instance;
use crate::models::{VendorType, Webhook, WebhookEventType};

/// How long to wait for the test event after Enode accepted the test request
pub const TEST_TIMEOUT: Duration = Duration::from_secs(20);

const SECRET_LENGTH: usize = 32;

/// Path Enode delivers events to
pub const WEBHOOK_PATH: &str = "/api/enode/webhook";

/// The test event plus every vehicle event
pub fn supported_events() -> Vec<WebhookEventType> {
    let mut events = vec![WebhookEventType::EnodeWebhookTest];
    events.extend(VendorType::Vehicle.webhook_events());
    events
}

pub fn webhook_url(external_url: &str, entry_id: &str) -> String {
    format!(
        "{}{}?entry_id={}",
        external_url.trim_end_matches('/'),
        WEBHOOK_PATH,
        entry_id
    )
}

pub fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LENGTH)
        .map(char::from)
        .collect()
}

/// Result of a create request
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// A webhook was already stored; nothing was sent
    Existing { id: String },
    Created(Webhook),
}

/// Register the webhook subscription for an instance
pub async fn create_webhook(instance: &Instance) -> Result<CreateOutcome> {
    if let Some(id) = instance.store().webhook_id() {
        instance
            .logger()
            .debug(&format!("Webhook {} already configured", id));
        return Ok(CreateOutcome::Existing { id });
    }

    let external_url = instance.external_url().ok_or_else(|| {
        BridgeError::validation("web.external_url", "An external URL is required for webhooks")
    })?;
    let url = webhook_url(external_url, instance.id());
    instance
        .logger()
        .debug(&format!("Creating webhook with URL: {}", url));

    let secret = generate_secret();
    let webhook = instance
        .api()
        .create_webhook(&url, &secret, &supported_events())
        .await?;
    instance.store().set_webhook(&webhook.id, &secret)?;
    instance
        .logger()
        .info(&format!("Webhook created: {}", webhook.id));
    Ok(CreateOutcome::Created(webhook))
}

/// Ask Enode for a test delivery and wait for it to arrive
pub async fn test_webhook(instance: &Instance) -> Result<()> {
    test_webhook_with_timeout(instance, TEST_TIMEOUT).await
}

pub async fn test_webhook_with_timeout(instance: &Instance, timeout: Duration) -> Result<()> {
    let webhook_id = instance
        .store()
        .webhook_id()
        .ok_or_else(|| BridgeError::validation("webhook_id", "No webhook configured"))?;

    let waiter = instance.coordinator().test_signal().prepare();
    let response = instance.api().test_webhook(&webhook_id).await?;
    instance
        .logger()
        .info(&format!("Webhook test response: {:?}", response));
    if !response.is_success() {
        return Err(BridgeError::webhook_test_failed(response.description));
    }

    match tokio::time::timeout(timeout, waiter).await {
        Ok(Ok(_)) => Ok(()),
        Ok(Err(_)) => Err(BridgeError::cancelled("webhook test was superseded")),
        Err(_) => Err(BridgeError::timeout(format!(
            "no test event received within {}s",
            timeout.as_secs()
        ))),
    }
}

/// Forget the stored webhook, then remove it remotely. Returns the removed id.
pub async fn delete_webhook(instance: &Instance) -> Result<Option<String>> {
    let webhook_id = instance.store().clear_webhook()?;
    if let Some(id) = &webhook_id {
        instance.api().delete_webhook(id).await?;
        instance
            .logger()
            .info(&format!("Webhook deleted: {}", id));
    }
    Ok(webhook_id)
}
