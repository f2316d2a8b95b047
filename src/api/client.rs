use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::auth::ClientCredentials;
use super::{EnodeApi, SCOPES, environment_urls, link_language};
use crate::config::EntryConfig;
use crate::error::{BridgeError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::models::{
    ChargeAction, ChargeKind, ErrorResponse, Link, Paged, Vehicle, VendorType, Webhook,
    WebhookEventType, WebhookTest,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest-backed Enode client
pub struct EnodeClient {
    http: reqwest::Client,
    base_url: String,
    credentials: ClientCredentials,
    logger: StructuredLogger,
}

impl EnodeClient {
    /// Build a client for a configured entry, selecting production or sandbox hosts
    pub fn from_entry(entry: &EntryConfig) -> Result<Self> {
        let (token_url, api_url) = environment_urls(entry.sandbox);
        let mut client = Self::with_urls(api_url, token_url, &entry.client_id, &entry.client_secret)?;
        client.logger = client.logger.for_entry(&entry.id);
        Ok(client)
    }

    /// Build a client against explicit API and token endpoints
    pub fn with_urls(
        api_url: &str,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BridgeError::config(format!("failed to build HTTP client: {}", e)))?;
        let credentials = ClientCredentials::new(http.clone(), token_url, client_id, client_secret);
        Ok(Self {
            http,
            base_url: api_url.trim_end_matches('/').to_string(),
            credentials,
            logger: get_logger("api"),
        })
    }

    pub fn client_id(&self) -> &str {
        self.credentials.client_id()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        self.logger
            .debug(&format!("Making {} request to {}", method, url));
        let token = self.credentials.access_token().await?;

        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        self.logger.debug(&format!(
            "Received {} response having content length of {}",
            status.as_u16(),
            response.content_length().unwrap_or(0)
        ));

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.credentials.invalidate().await;
        }
        Err(self.error_from(status, response).await)
    }

    async fn error_from(&self, status: StatusCode, response: reqwest::Response) -> BridgeError {
        let text = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST
            && let Ok(err) = serde_json::from_str::<ErrorResponse>(&text)
        {
            self.logger
                .warn(&format!("API rejected request: {} - {}", err.title, err.detail));
            return BridgeError::api(err.kind, err.title, err.detail);
        }
        let message = if text.is_empty() {
            status.canonical_reason().unwrap_or("request failed").to_string()
        } else {
            text
        };
        BridgeError::http(status.as_u16(), message)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let response = self.send(method, path, body).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn request_empty(&self, method: Method, path: &str, body: Option<Value>) -> Result<()> {
        self.send(method, path, body).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl EnodeApi for EnodeClient {
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        let page: Paged<Vec<Vehicle>> = self.request(Method::GET, "/vehicles", None).await?;
        Ok(page.data)
    }

    async fn list_user_vehicles(&self, user_id: &str) -> Result<Vec<Vehicle>> {
        let path = format!("/users/{}/vehicles", user_id);
        let page: Paged<Vec<Vehicle>> = self.request(Method::GET, &path, None).await?;
        Ok(page.data)
    }

    async fn user_link(
        &self,
        user_id: &str,
        language: &str,
        redirect_uri: &str,
        vendor: Option<&str>,
        vendor_type: Option<VendorType>,
    ) -> Result<Link> {
        let mut body = json!({
            "language": link_language(language),
            "redirectUri": redirect_uri,
            "scopes": SCOPES,
        });
        if let Some(vendor) = vendor.filter(|v| !v.is_empty()) {
            body["vendor"] = json!(vendor);
        }
        if let Some(vendor_type) = vendor_type {
            body["vendorType"] = json!(vendor_type);
        }
        let path = format!("/users/{}/link", user_id);
        self.request(Method::POST, &path, Some(body)).await
    }

    async fn create_webhook(
        &self,
        url: &str,
        secret: &str,
        events: &[WebhookEventType],
    ) -> Result<Webhook> {
        let body = json!({
            "url": url,
            "secret": secret,
            "events": events,
        });
        self.request(Method::POST, "/webhooks", Some(body)).await
    }

    async fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        let path = format!("/webhooks/{}", webhook_id);
        self.request_empty(Method::DELETE, &path, None).await
    }

    async fn test_webhook(&self, webhook_id: &str) -> Result<WebhookTest> {
        let path = format!("/webhooks/{}/test", webhook_id);
        self.request(Method::POST, &path, None).await
    }

    async fn control_charging(&self, vehicle_id: &str, action: ChargeKind) -> Result<ChargeAction> {
        let path = format!("/vehicles/{}/charging", vehicle_id);
        let body = json!({ "action": action });
        self.request(Method::POST, &path, Some(body)).await
    }

    async fn refresh_vehicle_data(&self, vehicle_id: &str) -> Result<()> {
        let path = format!("/vehicles/{}/refresh-hint", vehicle_id);
        self.request_empty(Method::POST, &path, None).await
    }
}
