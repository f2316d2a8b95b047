mod common;

use enode_bridge::error::BridgeError;
use enode_bridge::events::{WebhookEvent, decode_batch};
use enode_bridge::models::PowerDeliveryState;
use serde_json::json;

#[test]
fn decodes_full_vehicle_update() {
    let body = serde_json::to_vec(&json!([common::vehicle_updated_event("veh-1", 71.0)])).unwrap();
    let events = decode_batch(&body).unwrap();
    assert_eq!(events.len(), 1);

    let WebhookEvent::VehicleUpdated(event) = &events[0] else {
        panic!("expected a vehicle update, got {:?}", events[0]);
    };
    let v = &event.vehicle;
    assert_eq!(v.id, "veh-1");
    assert_eq!(event.user.id, "user-1");
    assert_eq!(v.charge_state.battery_level, Some(71.0));
    assert_eq!(v.charge_state.charge_rate, Some(11.2));
    assert_eq!(v.charge_state.charge_time_remaining, Some(95));
    assert_eq!(
        v.charge_state.power_delivery_state,
        Some(PowerDeliveryState::PluggedInCharging)
    );
    assert!(!v.capabilities.set_max_current.is_capable);
    assert_eq!(v.capabilities.set_max_current.intervention_ids, vec!["int-1"]);
    assert!(v.location.id.is_none());
    let policy = v.smart_charging_policy.as_ref().unwrap();
    assert_eq!(policy.is_enabled, Some(true));
    assert_eq!(v.name(), "Tesla Model 3");
    assert_eq!(events[0].event_type(), "user:vehicle:updated");
}

#[test]
fn decodes_mixed_batch_in_order() {
    let body = serde_json::to_vec(&json!([
        {
            "event": "user:credentials:invalidated",
            "version": "2024-10-01",
            "createdAt": "2024-05-01T10:00:00Z",
            "user": { "id": "user-1" },
            "vendor": "TESLA"
        },
        {
            "event": "user:vehicle:smart-charging-status-updated",
            "version": "2024-10-01",
            "createdAt": "2024-05-01T10:00:01Z",
            "user": { "id": "user-1" },
            "smartChargingStatus": {
                "updatedAt": "2024-05-01T10:00:01Z",
                "vehicleId": "veh-1",
                "userId": "user-1",
                "vendor": "TESLA",
                "state": "PLAN:EXECUTING:STARTED",
                "stateChangedAt": "2024-05-01T09:55:00Z",
                "consideration": null,
                "plan": null,
                "smartOverride": null
            }
        },
        common::test_event(),
    ]))
    .unwrap();

    let events = decode_batch(&body).unwrap();
    let kinds: Vec<_> = events.iter().map(|e| e.event_type()).collect();
    assert_eq!(
        kinds,
        vec![
            "user:credentials:invalidated",
            "user:vehicle:smart-charging-status-updated",
            "enode:webhook:test",
        ]
    );
    match &events[0] {
        WebhookEvent::CredentialsInvalidated(e) => assert_eq!(e.vendor, "TESLA"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn vendor_action_accepts_snake_case_key() {
    let body = serde_json::to_vec(&json!([{
        "event": "user:vendor-action:updated",
        "version": "2024-10-01",
        "createdAt": "2024-05-01T10:00:00Z",
        "user": { "id": "user-1" },
        "vendor_action": { "id": "a1", "state": "CONFIRMED" },
        "updatedFields": ["state"]
    }]))
    .unwrap();
    let events = decode_batch(&body).unwrap();
    match &events[0] {
        WebhookEvent::VendorActionUpdated(e) => {
            assert_eq!(e.vendor_action["state"], "CONFIRMED");
            assert_eq!(e.updated_fields, vec!["state"]);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn vehicle_missing_required_field_rejects_batch() {
    let mut event = common::vehicle_updated_event("veh-1", 50.0);
    event["vehicle"].as_object_mut().unwrap().remove("capabilities");
    let body = serde_json::to_vec(&json!([common::test_event(), event])).unwrap();
    assert!(matches!(
        decode_batch(&body).unwrap_err(),
        BridgeError::Decode { .. }
    ));
}

#[test]
fn non_json_body_is_a_decode_error() {
    assert!(matches!(
        decode_batch(b"not json at all").unwrap_err(),
        BridgeError::Decode { .. }
    ));
}
