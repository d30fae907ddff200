//! End-to-end pipeline tests: raw feed bytes through the frame decoder,
//! classification, routing, and all three workers, against the recording
//! outbound double and a real SQLite audit store.

use std::sync::Arc;
use std::time::Duration;

use bridgebot_core::events::FeedEvent;
use bridgebot_outbound::MockOutbound;
use bridgebot_pipeline::{Pipeline, ACK_TEXT};
use bridgebot_store::SqliteAuditStore;
use bridgebot_stream::FrameDecoder;

const SELF_USER_ID: i64 = 99;

const SAMPLE_FRAME: &[u8] = b"{\"direct_message\":{\"sender\":{\"id\":42,\"screen_name\":\"alice\"},\"text\":\"hello\\r\\n\",\"id\":1,\"created_at\":\"Mon Jan 01 00:00:00 +0000 2024\"}}\r\n";

fn temp_store() -> SqliteAuditStore {
    let dir = std::env::temp_dir().join(format!("bridgebot-e2e-{}", uuid::Uuid::now_v7()));
    SqliteAuditStore::new(dir.join("posts.db"))
}

fn dm_frame(id: i64, sender_id: i64, text: &str) -> Vec<u8> {
    format!(
        "{{\"direct_message\":{{\"id\":{id},\"sender\":{{\"id\":{sender_id},\"screen_name\":\"bob\"}},\"text\":\"{text}\",\"created_at\":\"Mon Jan 01 00:00:00 +0000 2024\"}}}}\r\n"
    )
    .into_bytes()
}

fn ingest(pipeline: &Pipeline, decoder: &mut FrameDecoder, chunk: &[u8]) {
    for record in decoder.feed(chunk) {
        pipeline.router.route(FeedEvent::classify(record, SELF_USER_ID));
    }
}

async fn wait_until(mut done: impl FnMut() -> bool) {
    let result = tokio::time::timeout(Duration::from_secs(2), async {
        while !done() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(result.is_ok(), "pipeline did not settle in time");
}

#[tokio::test]
async fn sample_frame_produces_post_notification_and_audit_row() {
    let store = Arc::new(temp_store());
    let api = Arc::new(MockOutbound::new());
    let pipeline = Pipeline::spawn(store.clone(), api.clone());

    let mut decoder = FrameDecoder::new();
    ingest(&pipeline, &mut decoder, SAMPLE_FRAME);

    wait_until(|| api.published().len() == 1 && api.notifications().len() == 1).await;

    // The escaped CRLF inside the text is string data and gets trimmed off.
    assert_eq!(api.published(), vec!["hello"]);
    assert_eq!(api.notifications(), vec![(ACK_TEXT.to_string(), 42)]);

    let rows = store.recent(10).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].message_id, 1);
    assert_eq!(rows[0].sender_id, 42);
    assert_eq!(rows[0].sender_screen_name, "alice");
    assert_eq!(rows[0].text, "hello");
    assert_eq!(rows[0].timestamp, "2024-01-01 00:00:00");
}

#[tokio::test]
async fn double_terminator_chunk_produces_two_events() {
    let store = Arc::new(temp_store());
    let api = Arc::new(MockOutbound::new());
    let pipeline = Pipeline::spawn(store, api.clone());

    let mut chunk = dm_frame(1, 42, "first");
    chunk.extend_from_slice(b"\r\n");
    chunk.extend_from_slice(&dm_frame(2, 43, "second"));

    let mut decoder = FrameDecoder::new();
    ingest(&pipeline, &mut decoder, &chunk);

    wait_until(|| api.published().len() == 2).await;
    assert_eq!(api.published(), vec!["first", "second"]);
    assert_eq!(
        api.notifications(),
        vec![(ACK_TEXT.to_string(), 42), (ACK_TEXT.to_string(), 43)]
    );
}

#[tokio::test]
async fn self_message_never_reaches_the_pipeline() {
    let store = Arc::new(temp_store());
    let api = Arc::new(MockOutbound::new());
    let pipeline = Pipeline::spawn(store.clone(), api.clone());

    let mut decoder = FrameDecoder::new();
    // a message from the bot itself, then a real one
    ingest(&pipeline, &mut decoder, &dm_frame(1, SELF_USER_ID, "echo"));
    ingest(&pipeline, &mut decoder, &dm_frame(2, 42, "real"));

    wait_until(|| api.published().len() == 1).await;
    assert_eq!(api.published(), vec!["real"]);
    assert_eq!(api.notifications(), vec![(ACK_TEXT.to_string(), 42)]);
    assert_eq!(store.count().unwrap(), 1);
}

#[tokio::test]
async fn keep_alive_lines_block_nothing() {
    let store = Arc::new(temp_store());
    let api = Arc::new(MockOutbound::new());
    let pipeline = Pipeline::spawn(store, api.clone());

    let mut decoder = FrameDecoder::new();
    ingest(&pipeline, &mut decoder, b"\r\n");
    ingest(&pipeline, &mut decoder, &dm_frame(1, 42, "after ping"));
    ingest(&pipeline, &mut decoder, b"\r\n\r\n");
    ingest(&pipeline, &mut decoder, &dm_frame(2, 43, "after more pings"));

    wait_until(|| api.published().len() == 2).await;
    assert_eq!(api.published(), vec!["after ping", "after more pings"]);
}

#[tokio::test]
async fn audit_failure_does_not_stop_publishing() {
    // A store that cannot write: every append fails, the pipeline keeps
    // going.
    let store = Arc::new(SqliteAuditStore::new("/proc/no-such-dir/posts.db"));
    let api = Arc::new(MockOutbound::new());
    let pipeline = Pipeline::spawn(store, api.clone());

    let mut decoder = FrameDecoder::new();
    ingest(&pipeline, &mut decoder, &dm_frame(1, 42, "still flows"));

    wait_until(|| api.published().len() == 1).await;
    assert_eq!(api.published(), vec!["still flows"]);
    assert_eq!(api.notifications(), vec![(ACK_TEXT.to_string(), 42)]);
}

#[tokio::test]
async fn frame_split_across_chunks_flows_through() {
    let store = Arc::new(temp_store());
    let api = Arc::new(MockOutbound::new());
    let pipeline = Pipeline::spawn(store, api.clone());

    let frame = dm_frame(1, 42, "split across chunks");
    let (head, tail) = frame.split_at(frame.len() / 2);

    let mut decoder = FrameDecoder::new();
    ingest(&pipeline, &mut decoder, head);
    ingest(&pipeline, &mut decoder, tail);

    wait_until(|| api.published().len() == 1).await;
    assert_eq!(api.published(), vec!["split across chunks"]);
}
