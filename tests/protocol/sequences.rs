//! Longer message sequences: isolation, quota monotonicity, mixed dialects.

use std::sync::Arc;

use lti_postmessage::{
    FrameResize, HandledMessage, HandlerConfig, PostMessageApi, QuotaConfig, RequestEnvelope,
    ResponsePayload,
};
use serde_json::json;

const PUT: &str = "org.imsglobal.lti.put_data";
const GET: &str = "org.imsglobal.lti.get_data";

fn quiet_api(quota: QuotaConfig) -> PostMessageApi {
    PostMessageApi::with_sink(HandlerConfig { quota }, Arc::new(|_: &str| {}))
}

fn is_error(api: &PostMessageApi, request: &RequestEnvelope, origin: &str) -> bool {
    api.process_message(request, origin)
        .expect("correlated request must be answered")
        .payload
        .is_error()
}

#[test]
fn writes_never_leak_across_origins() {
    let api = quiet_api(QuotaConfig::default());
    let origins = [
        "http://a.example",
        "https://a.example",
        "http://a.example:8080",
        "http://b.example",
    ];

    for (i, origin) in origins.iter().enumerate() {
        let put = RequestEnvelope::new(PUT, i.to_string())
            .with_key(format!("only_{i}"))
            .with_value(origin.to_string());
        assert!(!is_error(&api, &put, origin));
    }

    for (i, writer) in origins.iter().enumerate() {
        for (j, reader) in origins.iter().enumerate() {
            let get = RequestEnvelope::new(GET, "r").with_key(format!("only_{i}"));
            let response = api.process_message(&get, reader).unwrap();
            if i == j {
                assert_eq!(
                    response.payload,
                    ResponsePayload::Data {
                        key: format!("only_{i}"),
                        value: Some(writer.to_string()),
                    }
                );
            } else {
                assert!(response.payload.is_error(), "{writer} leaked to {reader}");
            }
        }
    }
}

#[test]
fn saturated_origin_only_accepts_non_growing_writes() {
    let api = quiet_api(QuotaConfig {
        enabled: true,
        max_bytes: 64,
        max_keys: 0,
    });
    let origin = "http://tool.example";

    // Fill with 8-byte entries until the table reaches 64 bytes.
    let mut i = 0;
    while !api.storage().reached_storage_limit(origin) {
        let put = RequestEnvelope::new(PUT, i.to_string())
            .with_key(format!("k{i}"))
            .with_value("x".repeat(6));
        assert!(!is_error(&api, &put, origin));
        i += 1;
    }
    let saturated = api.storage().usage(origin);
    assert_eq!(saturated.bytes, 64);

    // Growing writes are refused and leave usage untouched.
    let new_key = RequestEnvelope::new(PUT, "n").with_key("fresh").with_value("");
    assert!(is_error(&api, &new_key, origin));
    let grow = RequestEnvelope::new(PUT, "g").with_key("k0").with_value("x".repeat(7));
    assert!(is_error(&api, &grow, origin));
    assert_eq!(api.storage().usage(origin), saturated);

    // Same-size and shrinking writes still go through.
    let same = RequestEnvelope::new(PUT, "s").with_key("k0").with_value("y".repeat(6));
    assert!(!is_error(&api, &same, origin));
    let shrink = RequestEnvelope::new(PUT, "h").with_key("k1").with_value("y");
    assert!(!is_error(&api, &shrink, origin));

    // Back under the limit, growth is allowed again.
    assert!(!api.storage().reached_storage_limit(origin));
    assert!(!is_error(&api, &new_key, origin));
}

#[test]
fn deleting_absent_keys_is_idempotent() {
    let api = quiet_api(QuotaConfig::default());
    let origin = "http://tool.example";
    api.process_message(
        &RequestEnvelope::new(PUT, "1").with_key("keep").with_value("v"),
        origin,
    );
    let before = api.storage().usage(origin);

    for id in 0..3 {
        let delete = RequestEnvelope::new(PUT, id.to_string()).with_key("absent");
        let response = api.process_message(&delete, origin).unwrap();
        assert_eq!(
            response.payload,
            ResponsePayload::Data {
                key: "absent".to_string(),
                value: None,
            }
        );
    }
    assert_eq!(api.storage().usage(origin), before);
}

#[test]
fn resize_and_lti_messages_interleave() {
    let api = quiet_api(QuotaConfig::default());
    let origin = "http://tool.example";

    let sequence = [
        json!(r#"{"subject":"lti.frameResize","height":300}"#),
        json!({ "subject": PUT, "message_id": "1", "key": "k", "value": "v" }),
        json!(r#"{"subject":"lti.frameResize","height":0}"#),
        json!("not json at all"),
        json!({ "subject": GET, "message_id": "2", "key": "k" }),
    ];

    let handled: Vec<_> = sequence
        .iter()
        .map(|data| api.handle_message(data, origin))
        .collect();

    assert_eq!(
        handled[0],
        Some(HandledMessage::FrameResize(FrameResize { height: 300 }))
    );
    assert!(matches!(handled[1], Some(HandledMessage::Response(_))));
    assert_eq!(handled[2], None);
    assert_eq!(handled[3], None);
    match &handled[4] {
        Some(HandledMessage::Response(response)) => {
            assert_eq!(response.to_json()["value"], json!("v"));
        }
        other => panic!("expected get_data response, got {other:?}"),
    }
}
