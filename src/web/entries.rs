use std::convert::Infallible;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use super::AppState;
use crate::entities;
use crate::error::BridgeError;
use crate::linking;
use crate::models::ChargeKind;
use crate::webhook::{self, CreateOutcome};

#[derive(Debug, Deserialize)]
pub struct ChargingBody {
    pub action: ChargeKind,
}

#[derive(Debug, Default, Deserialize)]
pub struct LinkBody {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
}

type ApiResult = Result<Response, BridgeError>;

pub async fn list_entries(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "entries": state.instances.ids() }))
}

pub async fn vehicles(State(state): State<AppState>, Path(entry): Path<String>) -> ApiResult {
    let instance = state.instance(&entry)?;
    let coordinator = instance.coordinator();
    Ok(Json(json!({
        "vehicles": coordinator.vehicles(),
        "status": coordinator.status(),
    }))
    .into_response())
}

pub async fn refresh(State(state): State<AppState>, Path(entry): Path<String>) -> ApiResult {
    let instance = state.instance(&entry)?;
    let vehicles = instance.coordinator().refresh().await?;
    Ok(Json(json!({ "vehicles": vehicles.len() })).into_response())
}

pub async fn entities(State(state): State<AppState>, Path(entry): Path<String>) -> ApiResult {
    let instance = state.instance(&entry)?;
    let vehicles = instance.coordinator().vehicles();
    Ok(Json(entities::snapshots(&vehicles)).into_response())
}

pub async fn charging(
    State(state): State<AppState>,
    Path((entry, vehicle)): Path<(String, String)>,
    Json(body): Json<ChargingBody>,
) -> ApiResult {
    let instance = state.instance(&entry)?;
    let action = entities::set_charging(&instance, &vehicle, body.action).await?;
    Ok(Json(json!({ "action": action })).into_response())
}

pub async fn refresh_vehicle(
    State(state): State<AppState>,
    Path((entry, vehicle)): Path<(String, String)>,
) -> ApiResult {
    let instance = state.instance(&entry)?;
    let notification = entities::press_refresh(&instance, &vehicle).await?;
    Ok(Json(json!({ "notification": notification })).into_response())
}

pub async fn create_webhook(State(state): State<AppState>, Path(entry): Path<String>) -> ApiResult {
    let instance = state.instance(&entry)?;
    let body = match webhook::create_webhook(&instance).await? {
        CreateOutcome::Existing { id } => json!({ "status": "existing", "webhook_id": id }),
        CreateOutcome::Created(hook) => json!({ "status": "created", "webhook_id": hook.id }),
    };
    Ok(Json(body).into_response())
}

pub async fn delete_webhook(State(state): State<AppState>, Path(entry): Path<String>) -> ApiResult {
    let instance = state.instance(&entry)?;
    let removed = webhook::delete_webhook(&instance).await?;
    Ok(Json(json!({ "webhook_id": removed })).into_response())
}

pub async fn test_webhook(State(state): State<AppState>, Path(entry): Path<String>) -> ApiResult {
    let instance = state.instance(&entry)?;
    webhook::test_webhook(&instance).await?;
    Ok(Json(json!({ "status": "ok" })).into_response())
}

pub async fn start_link(
    State(state): State<AppState>,
    Path(entry): Path<String>,
    body: Bytes,
) -> ApiResult {
    let instance = state.instance(&entry)?;
    let params: LinkBody = if body.is_empty() {
        LinkBody::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| BridgeError::validation("body", e.to_string()))?
    };
    let started = linking::start_link(
        &instance,
        &state.links,
        params.user_id.as_deref(),
        params.vendor.as_deref(),
    )
    .await?;
    Ok(Json(started).into_response())
}

/// Cache updates as server-sent events
pub async fn events(State(state): State<AppState>, Path(entry): Path<String>) -> ApiResult {
    let instance = state.instance(&entry)?;
    let rx = instance.coordinator().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| {
        let update = msg.ok()?;
        let data = serde_json::to_string(&update).ok()?;
        Some(Ok::<Event, Infallible>(Event::default().event("update").data(data)))
    });
    Ok(Sse::new(stream)
        .keep_alive(KeepAlive::default())
        .into_response())
}
