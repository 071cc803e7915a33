//! Integration tests for the session lifecycle
//!
//! These tests verify heartbeat gating, reconnection, and write
//! serialization against a scripted in-process server.

mod common;

use async_trait::async_trait;
use common::{MockBehavior, MockWsServer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use steadysockets::{
    FixedDelay, FixedInterval, FrameOutcome, OutboundSink, Route, Session, SessionConfig,
    SessionHandler,
};

/// Handler that treats "hello" as the authentication frame and
/// heartbeats with "hb"
struct TestHandler {
    frames_seen: AtomicUsize,
}

impl TestHandler {
    fn new() -> Self {
        Self {
            frames_seen: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SessionHandler for TestHandler {
    async fn on_frame(
        &self,
        frame: &str,
        outbound: &OutboundSink,
    ) -> steadysockets::Result<FrameOutcome> {
        self.frames_seen.fetch_add(1, Ordering::SeqCst);
        if frame == "hello" {
            outbound.send(format!("ack:{frame}"))?;
            Ok(FrameOutcome::Authenticated)
        } else {
            Ok(FrameOutcome::Handled)
        }
    }

    fn heartbeat_frame(&self) -> String {
        "hb".to_string()
    }
}

fn test_session(url: &str, handler: Arc<TestHandler>, heartbeat: Duration) -> Session {
    let config =
        SessionConfig::new(url, Route::direct()).with_connect_timeout(Duration::from_secs(5));
    Session::new(config, handler)
        .with_reconnect_strategy(Box::new(FixedDelay::new(Duration::from_millis(100), None)))
        .with_heartbeat_schedule(Arc::new(FixedInterval::new(heartbeat)))
}

#[tokio::test]
async fn heartbeat_starts_after_authentication() {
    let server = MockWsServer::start(MockBehavior {
        greeting: vec!["hello".to_string()],
        ..Default::default()
    })
    .await;

    let handler = Arc::new(TestHandler::new());
    let session = test_session(&server.ws_url(), handler, Duration::from_millis(100));
    let task = tokio::spawn(session.run());

    tokio::time::sleep(Duration::from_millis(600)).await;
    task.abort();

    let received = server.received();
    assert!(
        received.contains(&"ack:hello".to_string()),
        "authentication reply missing: {received:?}"
    );
    let beats = received.iter().filter(|f| *f == "hb").count();
    assert!(beats >= 2, "expected repeated heartbeats, got {beats}");
}

#[tokio::test]
async fn no_heartbeat_without_authentication() {
    let server = MockWsServer::start(MockBehavior {
        greeting: vec!["unrelated".to_string()],
        ..Default::default()
    })
    .await;

    let handler = Arc::new(TestHandler::new());
    let session = test_session(&server.ws_url(), Arc::clone(&handler), Duration::from_millis(50));
    let task = tokio::spawn(session.run());

    tokio::time::sleep(Duration::from_millis(400)).await;
    task.abort();

    assert!(handler.frames_seen.load(Ordering::SeqCst) >= 1);
    let beats = server.received().iter().filter(|f| *f == "hb").count();
    assert_eq!(beats, 0, "heartbeat must not start before authentication");
}

#[tokio::test]
async fn repeated_auth_starts_single_heartbeat() {
    let server = MockWsServer::start(MockBehavior {
        greeting: vec!["hello".to_string(), "hello".to_string()],
        ..Default::default()
    })
    .await;

    let handler = Arc::new(TestHandler::new());
    let session = test_session(&server.ws_url(), handler, Duration::from_millis(200));
    let task = tokio::spawn(session.run());

    tokio::time::sleep(Duration::from_millis(1000)).await;
    task.abort();

    let received = server.received();
    let acks = received.iter().filter(|f| *f == "ack:hello").count();
    assert_eq!(acks, 2, "every auth frame gets a reply");

    // A single 200ms loop fits ~5 beats into a second; a doubled loop
    // would fit ~10.
    let beats = received.iter().filter(|f| *f == "hb").count();
    assert!(
        (2..=7).contains(&beats),
        "expected one heartbeat loop, got {beats} beats"
    );
}

#[tokio::test]
async fn reconnects_after_server_drop() {
    let server = MockWsServer::start(MockBehavior {
        greeting: vec!["hello".to_string()],
        close_after_greeting: true,
    })
    .await;

    let handler = Arc::new(TestHandler::new());
    let session = test_session(&server.ws_url(), handler, Duration::from_secs(30));
    let task = tokio::spawn(session.run());

    tokio::time::sleep(Duration::from_millis(900)).await;
    task.abort();

    assert!(
        server.connection_count() >= 2,
        "session should reconnect after every drop, saw {} connections",
        server.connection_count()
    );
}
