//! Integration tests for topic state replay.

use serde_json::{json, Value};
use topic_state::{
    build_topic_state, decode_messages, encode_state, FieldName, PayloadEncoding, Record,
    ReplayConfig, TopicAction, TopicState,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn records(value: Value) -> Vec<Record> {
    serde_json::from_value(value).unwrap()
}

fn name(s: &str) -> FieldName {
    FieldName::new(s).unwrap()
}

// --- Replay Scenarios ---

#[test]
fn test_create_update_delete_scenario() {
    init_tracing();

    let messages = records(json!([
        {"id": "A", "action": "created", "v": 1},
        {"id": "A", "action": "updated", "v": 2},
        {"id": "B", "action": "created", "v": 1},
        {"id": "A", "action": "deleted"}
    ]));

    let state = build_topic_state(messages, &name("id"), &name("action"));
    assert_eq!(state, records(json!([{"id": "B", "action": "created", "v": 1}])));
}

#[test]
fn test_device_registry_workflow() {
    init_tracing();

    let messages = records(json!([
        {"deviceId": "d1", "vendorId": "acme", "topicAction": "created", "updated": 1},
        {"deviceId": "d2", "vendorId": "acme", "topicAction": "created", "updated": 1},
        {"deviceId": "d1", "vendorId": "globex", "topicAction": "updated", "updated": 2},
        {"deviceId": "d3", "vendorId": "initech", "topicAction": "updated", "updated": 2},
        {"deviceId": "d2", "topicAction": "heartbeat"},
        {"deviceId": "d2", "topicAction": "deleted"},
        {"deviceId": "d4", "vendorId": "acme", "topicAction": "created", "updated": 3}
    ]));

    let state = build_topic_state(messages, &name("deviceId"), &name("topicAction"));
    assert_eq!(
        state,
        records(json!([
            {"deviceId": "d1", "vendorId": "globex", "topicAction": "updated", "updated": 2},
            {"deviceId": "d4", "vendorId": "acme", "topicAction": "created", "updated": 3}
        ]))
    );
}

#[test]
fn test_recreate_after_delete() {
    let messages = records(json!([
        {"id": 1, "action": "created", "name": "first"},
        {"id": 1, "action": "deleted"},
        {"id": 1, "action": "created", "name": "second"}
    ]));

    let state = build_topic_state(messages, &name("id"), &name("action"));
    assert_eq!(state, records(json!([{"id": 1, "action": "created", "name": "second"}])));
}

#[test]
fn test_update_keeps_unmentioned_fields() {
    let messages = records(json!([
        {"id": "x", "action": "created", "a": 1, "b": 2},
        {"id": "x", "action": "updated", "b": 3}
    ]));

    let state = build_topic_state(messages, &name("id"), &name("action"));
    assert_eq!(state, records(json!([{"id": "x", "action": "updated", "a": 1, "b": 3}])));
}

#[test]
fn test_order_is_preserved() {
    let messages = records(json!([
        {"id": "c", "action": "created"},
        {"id": "a", "action": "created"},
        {"id": "b", "action": "created"},
        {"id": "a", "action": "updated", "touched": true}
    ]));

    let state = build_topic_state(messages, &name("id"), &name("action"));
    let ids: Vec<&Value> = state.iter().map(|r| &r["id"]).collect();
    assert_eq!(ids, vec![&json!("c"), &json!("a"), &json!("b")]);
}

// --- Incremental Replay ---

#[test]
fn test_incremental_matches_batch() {
    let messages = records(json!([
        {"id": "A", "topicAction": "created", "v": 1},
        {"id": "B", "topicAction": "created", "v": 1},
        {"id": "A", "topicAction": "updated", "v": 5},
        {"id": "B", "topicAction": "deleted"}
    ]));

    let batch = build_topic_state(messages.clone(), &name("id"), &name("topicAction"));

    let mut topic = TopicState::new(ReplayConfig::default());
    let (head, tail) = messages.split_at(2);
    topic.apply_all(head.to_vec());
    let resumed_from = topic.records().to_vec();

    let mut resumed = TopicState::from_snapshot(ReplayConfig::default(), resumed_from);
    resumed.apply_all(tail.to_vec());

    let mut full = TopicState::new(ReplayConfig::default());
    full.apply_all(messages);

    assert_eq!(resumed.records(), batch.as_slice());
    assert_eq!(resumed.digest().unwrap(), full.digest().unwrap());
}

#[test]
fn test_guarded_consumer() {
    // A consumer that only forwards messages consistent with current state.
    let incoming = records(json!([
        {"id": "A", "topicAction": "created"},
        {"id": "A", "topicAction": "created"},
        {"id": "B", "topicAction": "updated"},
        {"id": "A", "topicAction": "deleted"},
        {"id": "A", "topicAction": "deleted"}
    ]));

    let mut topic = TopicState::new(ReplayConfig::default());
    let mut rejected = 0;

    for message in incoming {
        let allowed = match TopicAction::of(&message, &topic.config().action_key) {
            Some(TopicAction::Created) => topic.can_create(&message),
            Some(TopicAction::Updated) => topic.can_update(&message),
            Some(TopicAction::Deleted) => topic.can_remove(&message),
            None => false,
        };
        if allowed {
            topic.apply(message);
        } else {
            rejected += 1;
        }
    }

    assert!(topic.is_empty());
    assert_eq!(rejected, 3);
    assert_eq!(topic.stats().created, 1);
    assert_eq!(topic.stats().deleted, 1);
}

// --- Codec ---

#[test]
fn test_replay_from_encoded_log() {
    let log = json!([
        {"id": "A", "topicAction": "created", "v": 1},
        {"id": "A", "topicAction": "updated", "v": 2}
    ]);

    for encoding in [PayloadEncoding::Json, PayloadEncoding::MessagePack] {
        let bytes = encode_state(&records(log.clone()), encoding).unwrap();

        let messages = decode_messages(&bytes, encoding).unwrap();
        let mut topic = TopicState::new(ReplayConfig::default());
        topic.apply_all(messages);

        let snapshot = encode_state(topic.records(), encoding).unwrap();
        let restored = decode_messages(&snapshot, encoding).unwrap();
        assert_eq!(restored, records(json!([{"id": "A", "topicAction": "updated", "v": 2}])));
    }
}
