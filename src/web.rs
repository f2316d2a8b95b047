//! Axum-based HTTP server
//!
//! Serves the inbound Enode webhook, the link redirect callback and a small
//! JSON API over the configured entries.

mod enode;
mod entries;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::BridgeError;
use crate::instance::{Instance, InstanceRegistry};
use crate::linking::LinkFlows;

#[derive(Clone)]
pub struct AppState {
    pub instances: Arc<InstanceRegistry>,
    pub links: Arc<LinkFlows>,
}

impl AppState {
    pub fn new(instances: InstanceRegistry) -> Self {
        Self {
            instances: Arc::new(instances),
            links: Arc::new(LinkFlows::new()),
        }
    }

    pub(crate) fn instance(&self, entry_id: &str) -> Result<Arc<Instance>, BridgeError> {
        self.instances
            .get(entry_id)
            .ok_or_else(|| BridgeError::not_found(format!("unknown entry '{}'", entry_id)))
    }
}

impl BridgeError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::Validation { .. }
            | BridgeError::Signature { .. }
            | BridgeError::Decode { .. }
            | BridgeError::Api { .. } => StatusCode::BAD_REQUEST,
            BridgeError::NotFound { .. } => StatusCode::NOT_FOUND,
            BridgeError::Cancelled { .. } => StatusCode::CONFLICT,
            BridgeError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            BridgeError::Network { .. }
            | BridgeError::Http { .. }
            | BridgeError::Auth { .. }
            | BridgeError::WebhookTestFailed { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            BridgeError::Api { title, detail, .. } => {
                json!({ "error": self.to_string(), "title": title, "detail": detail })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/enode/webhook", post(enode::webhook))
        .route("/api/enode/done", get(enode::link_done))
        .route("/api/entries", get(entries::list_entries))
        .route("/api/entries/{entry}/vehicles", get(entries::vehicles))
        .route("/api/entries/{entry}/refresh", post(entries::refresh))
        .route("/api/entries/{entry}/entities", get(entries::entities))
        .route(
            "/api/entries/{entry}/vehicles/{vehicle}/charging",
            post(entries::charging),
        )
        .route(
            "/api/entries/{entry}/vehicles/{vehicle}/refresh",
            post(entries::refresh_vehicle),
        )
        .route(
            "/api/entries/{entry}/webhook",
            post(entries::create_webhook).delete(entries::delete_webhook),
        )
        .route("/api/entries/{entry}/webhook/test", post(entries::test_webhook))
        .route("/api/entries/{entry}/link", post(entries::start_link))
        .route("/api/entries/{entry}/events", get(entries::events))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    serve_until(state, host, port, std::future::pending()).await
}

/// Serve until `shutdown` completes
pub async fn serve_until<F>(state: AppState, host: &str, port: u16, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let router = build_router(state);

    let logger = crate::logging::get_logger("web");
    logger.info(&format!(
        "Starting web server; requested host={}, port={}",
        host, port
    ));

    let addr = match host.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, port),
        Err(_) => {
            logger.warn(&format!("Invalid host '{}'; falling back to 127.0.0.1", host));
            ([127, 0, 0, 1], port).into()
        }
    };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    logger.info(&format!(
        "Web server listening at http://{}:{}",
        local_addr.ip(),
        local_addr.port()
    ));

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
