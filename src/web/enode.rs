use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::AppState;
use crate::error::BridgeError;
use crate::webhook::{self, SIGNATURE_HEADER};

#[derive(Debug, Deserialize)]
pub struct WebhookParams {
    pub entry_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DoneParams {
    pub flow_id: Option<String>,
}

const LINK_DONE_PAGE: &str = "<script>window.close()</script>Success! This window can be closed";

/// Inbound Enode delivery. Authenticated batches are processed in the background.
pub async fn webhook(
    State(state): State<AppState>,
    Query(params): Query<WebhookParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(entry_id) = params.entry_id.filter(|id| !id.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "missing entry_id").into_response();
    };
    let instance = match state.instance(&entry_id) {
        Ok(instance) => instance,
        Err(e) => return e.into_response(),
    };

    let declared = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    if let Err(e) = webhook::authenticate(&instance, &body, declared) {
        instance
            .logger()
            .warn(&format!("Rejected webhook delivery: {}", e));
        return (StatusCode::BAD_REQUEST, "invalid signature").into_response();
    }

    tokio::spawn(async move {
        webhook::process_body(instance.coordinator(), instance.logger(), &body);
    });
    (StatusCode::OK, "ok").into_response()
}

/// Redirect target of a user link session
pub async fn link_done(State(state): State<AppState>, Query(params): Query<DoneParams>) -> Response {
    let logger = crate::logging::get_logger("linking");
    let Some(flow_id) = params.flow_id.filter(|id| !id.is_empty()) else {
        logger.debug("Callback flow_id is missing");
        return (StatusCode::BAD_REQUEST, "missing flow_id").into_response();
    };

    let link = match state.links.complete(&flow_id) {
        Ok(link) => link,
        Err(BridgeError::NotFound { .. }) => {
            logger.debug("Callback flow_id is invalid");
            return (StatusCode::BAD_REQUEST, "unknown flow_id").into_response();
        }
        Err(e) => return e.into_response(),
    };

    logger.info(&format!(
        "User {} linked successfully for entry {}",
        link.user_id, link.entry_id
    ));
    if let Some(instance) = state.instances.get(&link.entry_id) {
        tokio::spawn(async move {
            let _ = instance.coordinator().refresh().await;
        });
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html")],
        LINK_DONE_PAGE,
    )
        .into_response()
}
