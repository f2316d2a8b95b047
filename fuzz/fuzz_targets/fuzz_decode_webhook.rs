#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary delivery bodies must decode or fail cleanly
    if let Ok(events) = enode_bridge::events::decode_batch(data) {
        for event in &events {
            let _ = event.event_type();
            let _ = event.created_at();
        }
    }

    // Signature checks take untrusted header values
    if let Ok(header) = std::str::from_utf8(data) {
        let _ = enode_bridge::webhook::verify_signature("fuzz-secret", data, header);
    }
});
