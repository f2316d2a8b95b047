mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{MockApi, instance, vehicle};
use enode_bridge::coordinator::CoordinatorUpdate;
use enode_bridge::instance::InstanceRegistry;
use enode_bridge::web::{AppState, build_router};
use enode_bridge::webhook::{SIGNATURE_HEADER, compute_signature};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

fn state_with_entry(dir: &std::path::Path, secret: Option<&str>) -> AppState {
    let api = MockApi::new(vec![]);
    let inst = instance("home", api, dir, Some("https://ha.example.com"));
    if let Some(secret) = secret {
        inst.store().set_webhook("wh-1", secret).unwrap();
    }
    inst.coordinator().update_vehicle(vehicle("veh-1"));
    let mut registry = InstanceRegistry::new();
    registry.insert(inst);
    AppState::new(registry)
}

fn delivery(body: &[u8], signature: Option<&str>) -> Request<Body> {
    let mut req = Request::builder()
        .method("POST")
        .uri("/api/enode/webhook?entry_id=home")
        .header("content-type", "application/json");
    if let Some(sig) = signature {
        req = req.header(SIGNATURE_HEADER, sig);
    }
    req.body(Body::from(body.to_vec())).unwrap()
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn rejects_delivery_without_stored_secret() {
    let tmp = tempfile::tempdir().unwrap();
    let app = build_router(state_with_entry(tmp.path(), None));
    let body = b"[]";
    let sig = compute_signature("anything", body).unwrap();

    let resp = app.oneshot(delivery(body, Some(&sig))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(resp).await, "invalid signature");
}

#[tokio::test]
async fn rejects_bad_or_missing_signature() {
    let tmp = tempfile::tempdir().unwrap();
    let state = state_with_entry(tmp.path(), Some("s3cret"));
    let body = serde_json::to_vec(&json!([common::vehicle_updated_event("veh-1", 12.0)])).unwrap();
    let forged = compute_signature("wrong", &body).unwrap();

    let resp = build_router(state.clone())
        .oneshot(delivery(&body, Some(&forged)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = build_router(state.clone())
        .oneshot(delivery(&body, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let cached = state.instances.get("home").unwrap().coordinator().vehicle("veh-1");
    assert_eq!(cached.unwrap().charge_state.battery_level, Some(64.0));
}

#[tokio::test]
async fn signed_update_patches_vehicle() {
    let tmp = tempfile::tempdir().unwrap();
    let state = state_with_entry(tmp.path(), Some("s3cret"));
    let coordinator = state.instances.get("home").unwrap().coordinator().clone();
    let mut updates = coordinator.subscribe();

    let body = serde_json::to_vec(&json!([common::vehicle_updated_event("veh-1", 12.0)])).unwrap();
    let sig = compute_signature("s3cret", &body).unwrap();
    let resp = build_router(state)
        .oneshot(delivery(&body, Some(&sig)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let update = tokio::time::timeout(Duration::from_secs(2), updates.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        update,
        CoordinatorUpdate::VehicleUpdated {
            vehicle_id: "veh-1".to_string()
        }
    );
    assert_eq!(
        coordinator.vehicle("veh-1").unwrap().charge_state.battery_level,
        Some(12.0)
    );
}

#[tokio::test]
async fn signed_garbage_is_accepted_and_ignored() {
    let tmp = tempfile::tempdir().unwrap();
    let state = state_with_entry(tmp.path(), Some("s3cret"));
    let body = b"{\"not\":\"a batch\"}";
    let sig = compute_signature("s3cret", body).unwrap();

    let resp = build_router(state.clone())
        .oneshot(delivery(body, Some(&sig)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "ok");
}

#[tokio::test]
async fn signed_test_event_completes_pending_test() {
    let tmp = tempfile::tempdir().unwrap();
    let state = state_with_entry(tmp.path(), Some("s3cret"));
    let coordinator = state.instances.get("home").unwrap().coordinator().clone();
    let waiter = coordinator.test_signal().prepare();

    let body = serde_json::to_vec(&json!([common::test_event()])).unwrap();
    let sig = compute_signature("s3cret", &body).unwrap();
    let resp = build_router(state)
        .oneshot(delivery(&body, Some(&sig)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resolved = tokio::time::timeout(Duration::from_secs(2), waiter)
        .await
        .unwrap()
        .unwrap();
    assert!(resolved);
}
