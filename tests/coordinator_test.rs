mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Call, MockApi, vehicle};
use enode_bridge::coordinator::{CoordinatorUpdate, VehicleCoordinator};
use tokio::sync::watch;

fn coordinator(api: &Arc<MockApi>, user_id: Option<&str>) -> VehicleCoordinator {
    VehicleCoordinator::new(
        api.clone(),
        user_id.map(str::to_string),
        Duration::from_secs(300),
    )
}

#[tokio::test]
async fn refresh_replaces_cache_and_reports_success() {
    let api = MockApi::new(vec![vehicle("v1"), vehicle("v2")]);
    let coord = coordinator(&api, None);
    let mut rx = coord.subscribe();

    let vehicles = coord.refresh().await.unwrap();
    assert_eq!(vehicles.len(), 2);
    assert_eq!(coord.vehicles().len(), 2);
    assert!(coord.vehicle("v2").is_some());

    let status = coord.status();
    assert!(status.last_update_success);
    assert!(status.last_updated.is_some());
    assert!(status.last_error.is_none());
    assert_eq!(
        rx.recv().await.unwrap(),
        CoordinatorUpdate::Refreshed { vehicles: 2 }
    );
    assert_eq!(api.calls(), vec![Call::ListVehicles]);
}

#[tokio::test]
async fn configured_user_routes_to_user_listing() {
    let api = MockApi::new(vec![vehicle("v1")]);
    let coord = coordinator(&api, Some("user-1"));
    coord.refresh().await.unwrap();
    assert_eq!(api.calls(), vec![Call::ListUserVehicles("user-1".to_string())]);
}

#[tokio::test]
async fn failed_poll_keeps_last_known_good() {
    let api = MockApi::new(vec![vehicle("v1")]);
    let coord = coordinator(&api, None);
    coord.refresh().await.unwrap();
    let good_at = coord.status().last_updated;

    api.fail_listing(Some("upstream down"));
    let mut rx = coord.subscribe();
    assert!(coord.refresh().await.is_err());

    assert_eq!(coord.vehicles().len(), 1);
    let status = coord.status();
    assert!(!status.last_update_success);
    assert_eq!(status.last_updated, good_at);
    assert!(status.last_error.unwrap().contains("upstream down"));
    assert!(matches!(
        rx.recv().await.unwrap(),
        CoordinatorUpdate::RefreshFailed { .. }
    ));
}

#[tokio::test]
async fn push_update_replaces_matching_vehicle() {
    let api = MockApi::new(vec![vehicle("v1"), vehicle("v2")]);
    let coord = coordinator(&api, None);
    coord.refresh().await.unwrap();

    let mut patched = vehicle("v2");
    patched.charge_state.battery_level = Some(99.0);
    let mut rx = coord.subscribe();
    coord.update_vehicle(patched);

    let cached = coord.vehicles();
    assert_eq!(cached.len(), 2);
    assert_eq!(cached[0].id, "v1");
    assert_eq!(cached[1].charge_state.battery_level, Some(99.0));
    assert_eq!(
        rx.recv().await.unwrap(),
        CoordinatorUpdate::VehicleUpdated {
            vehicle_id: "v2".to_string()
        }
    );
}

#[tokio::test]
async fn push_update_appends_unknown_vehicle() {
    let api = MockApi::new(vec![]);
    let coord = coordinator(&api, None);
    coord.update_vehicle(vehicle("new"));
    assert_eq!(coord.vehicles().len(), 1);
    assert!(api.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn run_polls_on_interval_until_shutdown() {
    let api = MockApi::new(vec![vehicle("v1")]);
    let coord = Arc::new(coordinator(&api, None));
    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(coord.clone().run(rx));

    // The immediate first tick is skipped
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(api.calls().is_empty());

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(api.calls().len(), 1);

    tx.send(true).unwrap();
    handle.await.unwrap();
}
