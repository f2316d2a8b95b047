use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::{BridgeError, Result};
use crate::logging::{StructuredLogger, get_logger};

/// Tokens are renewed this long before they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

struct CachedToken {
    value: String,
    renew_at: Instant,
}

/// OAuth2 client-credentials grant with an in-memory token cache
pub struct ClientCredentials {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: Mutex<Option<CachedToken>>,
    logger: StructuredLogger,
}

impl ClientCredentials {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cached: Mutex::new(None),
            logger: get_logger("auth"),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Return a valid bearer token, fetching a new one when needed
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && Instant::now() < token.renew_at
        {
            return Ok(token.value.clone());
        }

        let token = self.fetch().await?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            renew_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    /// Drop the cached token so the next call fetches a new one
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    async fn fetch(&self) -> Result<TokenResponse> {
        self.logger
            .debug(&format!("Requesting access token from {}", self.token_url));
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| BridgeError::network(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            self.logger.warn(&format!(
                "Token request rejected with status {}",
                status.as_u16()
            ));
            return Err(BridgeError::auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| BridgeError::auth(format!("invalid token response: {}", e)))
    }
}
