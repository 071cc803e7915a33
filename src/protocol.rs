//! Wire envelopes for the handshake/heartbeat protocol.
//!
//! All frames are JSON text. Outbound requests carry a fresh UUID v4
//! correlation id; acknowledgments echo the id of the message they
//! answer.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ACTION_AUTH: &str = "AUTH";
pub const ACTION_PING: &str = "PING";
pub const ACTION_PONG: &str = "PONG";

/// Protocol version stamped on PING frames
pub const PING_VERSION: &str = "1.0.0";
/// Client version reported in the AUTH reply
pub const CLIENT_VERSION: &str = "4.26.2";
pub const DEVICE_TYPE: &str = "extension";
pub const EXTENSION_ID: &str = "ilehaonighjijnmpnagapkhpcdbhclfg";
/// Origin header value identifying the extension client
pub const EXTENSION_ORIGIN: &str = "chrome-extension://ilehaonighjijnmpnagapkhpcdbhclfg";

/// Fresh correlation id for an outbound request
pub fn correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Inbound server frame; anything beyond `id` and `action` is ignored
#[derive(Debug, Clone, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

/// Reply to a server AUTH challenge
#[derive(Debug, Clone, Serialize)]
pub struct AuthReply {
    pub id: String,
    pub origin_action: &'static str,
    pub result: AuthResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResult {
    pub browser_id: String,
    pub user_id: String,
    pub user_agent: String,
    pub timestamp: i64,
    pub device_type: &'static str,
    pub version: &'static str,
    pub extension_id: &'static str,
}

impl AuthReply {
    pub fn new(browser_id: String, user_id: String, user_agent: String) -> Self {
        Self {
            id: correlation_id(),
            origin_action: ACTION_AUTH,
            result: AuthResult {
                browser_id,
                user_id,
                user_agent,
                timestamp: Utc::now().timestamp(),
                device_type: DEVICE_TYPE,
                version: CLIENT_VERSION,
                extension_id: EXTENSION_ID,
            },
        }
    }
}

/// Periodic liveness request
#[derive(Debug, Clone, Serialize)]
pub struct Ping {
    pub id: String,
    pub version: &'static str,
    pub action: &'static str,
    pub data: EmptyPayload,
}

/// Serializes as `{}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct EmptyPayload {}

impl Ping {
    pub fn new() -> Self {
        Self {
            id: correlation_id(),
            version: PING_VERSION,
            action: ACTION_PING,
            data: EmptyPayload {},
        }
    }
}

impl Default for Ping {
    fn default() -> Self {
        Self::new()
    }
}

/// Required acknowledgment of a server PONG
#[derive(Debug, Clone, Serialize)]
pub struct PongAck {
    pub id: String,
    pub origin_action: &'static str,
}

impl PongAck {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            origin_action: ACTION_PONG,
        }
    }
}
