//! The protocol handler plugged into the session engine.

use crate::identity::derive_session_identity;
use crate::protocol::{
    self, AuthReply, Ping, PongAck, ServerMessage, ACTION_AUTH, ACTION_PONG,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use steadysockets::{
    FrameOutcome, HeaderProvider, Headers, OutboundSink, Route, Session, SessionConfig,
    SessionHandler, SteadyError,
};
use tracing::{debug, info};

/// Handshake responder and heartbeat source for one route's session
///
/// Reacts to server AUTH challenges and PONG liveness replies; builds
/// the periodic PING frames. One instance lives as long as its session
/// and is shared across all of its reconnects.
pub struct NodeHandler {
    identity: String,
    user_id: String,
    user_agent: String,
}

impl NodeHandler {
    pub fn new(route: &Route, user_id: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            identity: derive_session_identity(route),
            user_id: user_id.into(),
            user_agent: user_agent.into(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }
}

#[async_trait]
impl SessionHandler for NodeHandler {
    async fn on_frame(
        &self,
        frame: &str,
        outbound: &OutboundSink,
    ) -> steadysockets::Result<FrameOutcome> {
        // No per-frame error isolation: a malformed frame kills the
        // connection and the supervisor reconnects.
        let message: ServerMessage = serde_json::from_str(frame)
            .map_err(|e| SteadyError::Protocol(format!("malformed frame: {e}")))?;
        info!(frame = %frame, "received message");

        match message.action.as_deref() {
            Some(ACTION_AUTH) => {
                let reply = AuthReply::new(
                    self.identity.clone(),
                    self.user_id.clone(),
                    self.user_agent.clone(),
                );
                outbound.send(encode(&reply)?)?;
                info!(id = %reply.id, "sent AUTH reply");
                Ok(FrameOutcome::Authenticated)
            }
            Some(ACTION_PONG) => {
                let id = message
                    .id
                    .ok_or_else(|| SteadyError::Protocol("PONG without correlation id".into()))?;
                let ack = PongAck::new(id);
                outbound.send(encode(&ack)?)?;
                debug!(id = %ack.id, "sent PONG acknowledgment");
                Ok(FrameOutcome::Handled)
            }
            other => {
                debug!(action = ?other, "ignoring unrecognized action");
                Ok(FrameOutcome::Handled)
            }
        }
    }

    fn heartbeat_frame(&self) -> String {
        // Static shape, serialization cannot fail.
        serde_json::to_string(&Ping::new()).unwrap_or_else(|_| "{}".to_string())
    }
}

fn encode<T: serde::Serialize>(value: &T) -> steadysockets::Result<String> {
    serde_json::to_string(value).map_err(|e| SteadyError::Protocol(e.to_string()))
}

/// Fixed browser-like headers for the WebSocket upgrade
pub struct ConnectionHeaders {
    user_agent: String,
}

impl ConnectionHeaders {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl HeaderProvider for ConnectionHeaders {
    async fn get_headers(&self) -> Headers {
        let mut headers = HashMap::new();
        headers.insert("Pragma".to_string(), "no-cache".to_string());
        headers.insert("Cache-Control".to_string(), "no-cache".to_string());
        headers.insert("User-Agent".to_string(), self.user_agent.clone());
        headers.insert("Origin".to_string(), protocol::EXTENSION_ORIGIN.to_string());
        headers
    }
}

/// Wire a route into a ready-to-run session
pub fn build_session(url: &str, route: Route, user_id: &str, user_agent: &str) -> Session {
    let handler = NodeHandler::new(&route, user_id, user_agent);
    let config = SessionConfig::new(url, route)
        .with_headers(Arc::new(ConnectionHeaders::new(user_agent)));
    Session::new(config, Arc::new(handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn handler() -> NodeHandler {
        NodeHandler::new(&Route::direct(), "user-42", "Mozilla/5.0 test")
    }

    async fn run_frame(frame: &str) -> (steadysockets::Result<FrameOutcome>, Vec<String>) {
        let (sink, mut rx) = OutboundSink::channel();
        let outcome = handler().on_frame(frame, &sink).await;
        drop(sink);
        let mut sent = Vec::new();
        while let Some(frame) = rx.recv().await {
            sent.push(frame);
        }
        (outcome, sent)
    }

    #[tokio::test]
    async fn auth_challenge_gets_full_reply() {
        let (outcome, sent) = run_frame(r#"{"action":"AUTH"}"#).await;
        assert_eq!(outcome.unwrap(), FrameOutcome::Authenticated);
        assert_eq!(sent.len(), 1);

        let reply: Value = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(reply["origin_action"], "AUTH");
        assert_eq!(reply["result"]["user_id"], "user-42");
        assert_eq!(reply["result"]["user_agent"], "Mozilla/5.0 test");
        assert_eq!(
            reply["result"]["browser_id"],
            derive_session_identity(&Route::direct())
        );
    }

    #[tokio::test]
    async fn pong_is_acknowledged_with_echoed_id() {
        let (outcome, sent) = run_frame(r#"{"id":"abc","action":"PONG"}"#).await;
        assert_eq!(outcome.unwrap(), FrameOutcome::Handled);
        assert_eq!(sent.len(), 1);

        let ack: Value = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(ack, serde_json::json!({"id": "abc", "origin_action": "PONG"}));
    }

    #[tokio::test]
    async fn pong_without_id_is_a_protocol_error() {
        let (outcome, sent) = run_frame(r#"{"action":"PONG"}"#).await;
        assert!(outcome.is_err());
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn unknown_actions_are_ignored() {
        let (outcome, sent) = run_frame(r#"{"action":"NEW_THING","payload":1}"#).await;
        assert_eq!(outcome.unwrap(), FrameOutcome::Handled);
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn malformed_frame_is_an_error() {
        let (outcome, sent) = run_frame("not json").await;
        assert!(outcome.is_err());
        assert!(sent.is_empty());
    }

    #[test]
    fn heartbeat_frame_is_a_ping() {
        let frame = handler().heartbeat_frame();
        let ping: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(ping["action"], "PING");
        assert_eq!(ping["version"], "1.0.0");
        assert_eq!(ping["data"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn connection_headers_carry_the_extension_origin() {
        let headers = ConnectionHeaders::new("Mozilla/5.0 test").get_headers().await;
        assert_eq!(headers.get("Pragma").unwrap(), "no-cache");
        assert_eq!(headers.get("Cache-Control").unwrap(), "no-cache");
        assert_eq!(headers.get("User-Agent").unwrap(), "Mozilla/5.0 test");
        assert_eq!(
            headers.get("Origin").unwrap(),
            "chrome-extension://ilehaonighjijnmpnagapkhpcdbhclfg"
        );
    }
}
