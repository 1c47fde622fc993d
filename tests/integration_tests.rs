//! End-to-end tests over the public crate API: minting snowflakes,
//! moving them across the wire form, and fanning dispatches out through
//! the gateway. Nothing here needs a database.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;

use rollplayer_chat::domain::Snowflake;
use rollplayer_chat::presentation::websocket::{ConnectionHandle, Gateway};
use rollplayer_chat::presentation::websocket::messages::GatewaySend;
use rollplayer_chat::shared::snowflake::{Category, SnowflakeGenerator, ROLLPLAYER_EPOCH};

#[tokio::test]
async fn concurrent_minting_yields_unique_ids() {
    let generator = Arc::new(SnowflakeGenerator::new(ROLLPLAYER_EPOCH));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let generator = Arc::clone(&generator);
        handles.push(tokio::spawn(async move {
            let mut ids = Vec::with_capacity(256);
            for _ in 0..256 {
                ids.push(generator.generate(Category::Message).unwrap());
            }
            ids
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.await.unwrap() {
            assert!(seen.insert(id), "duplicate id minted: {id}");
        }
    }
    assert_eq!(seen.len(), 1024);
}

#[tokio::test]
async fn minted_id_survives_the_wire_form() {
    let generator = SnowflakeGenerator::new(ROLLPLAYER_EPOCH);
    let id = generator.generate(Category::User).unwrap();

    // The only wire form is the decimal string.
    let wire = id.to_string();
    let parsed: Snowflake = wire.parse().unwrap();
    assert_eq!(parsed, id);

    // JSON carries the same string, never a bare number.
    let json = serde_json::to_value(id).unwrap();
    assert_eq!(json, serde_json::Value::String(wire));

    let (_, category, _) = parsed.parts().unwrap();
    assert_eq!(category, Category::User);
}

#[tokio::test]
async fn minted_timestamp_is_close_to_now() {
    let generator = SnowflakeGenerator::new(ROLLPLAYER_EPOCH);
    let id = generator.generate(Category::Message).unwrap();

    let now_ms = chrono::Utc::now().timestamp_millis() as u64;
    let minted_ms = id.timestamp_ms();
    assert!(minted_ms <= now_ms);
    assert!(now_ms - minted_ms < 5_000, "minted timestamp too far in the past");
}

#[tokio::test]
async fn dispatch_fans_out_to_every_channel_subscriber() {
    let generator = SnowflakeGenerator::new(ROLLPLAYER_EPOCH);
    let gateway = Gateway::new();
    let channel_id = generator.generate(Category::Channel).unwrap();
    let other_channel = generator.generate(Category::Channel).unwrap();

    let mut receivers = Vec::new();
    for name in ["alice", "bob"] {
        let (tx, rx) = mpsc::unbounded_channel();
        gateway.connect(
            ConnectionHandle {
                id: name.to_string(),
                sender: tx,
            },
            channel_id,
        );
        receivers.push(rx);
    }

    let (tx, mut bystander) = mpsc::unbounded_channel();
    gateway.connect(
        ConnectionHandle {
            id: "carol".to_string(),
            sender: tx,
        },
        other_channel,
    );

    let message_id = generator.generate(Category::Message).unwrap();
    let frame = GatewaySend::dispatch(
        "MESSAGE_CREATE",
        serde_json::json!({
            "id": message_id,
            "channel_id": channel_id,
            "content": "hello",
        }),
    );
    let delivered = gateway.broadcast(channel_id, frame);
    assert_eq!(delivered, 2);

    for mut rx in receivers {
        let frame = rx.try_recv().unwrap();
        assert_eq!(frame.op, 0);
        assert_eq!(frame.t.as_deref(), Some("MESSAGE_CREATE"));

        let payload = frame.d.unwrap();
        let id: Snowflake = payload["id"].as_str().unwrap().parse().unwrap();
        assert_eq!(id, message_id);
    }

    assert!(bystander.try_recv().is_err());
}
