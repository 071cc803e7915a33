//! Per-connection message dispatch.
//!
//! # Architecture
//!
//! The dispatcher is the single consumer of the inbound frame stream and
//! the single owner of the write half:
//!
//! ```text
//! Server ──frames──> Dispatcher ──text──> SessionHandler ──┐
//!                        │                                  │
//!                        │<── outbound mpsc channel <───────┤
//!                        │                                  │
//!                        │<───────────────────── Heartbeat ─┘
//!                        └──writes──> WebSocket sink
//! ```
//!
//! All outbound frames funnel through one mpsc channel drained by the
//! dispatcher's `select!` loop, so a heartbeat send and a handler reply
//! can never interleave on the wire. Inbound frames are handled strictly
//! in receive order.

use crate::core::heartbeat;
use crate::core::transport::WsStream;
use crate::error::{Result, SteadyError};
use crate::traits::{FrameOutcome, HeartbeatSchedule, SessionHandler};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

/// Write capability for one connection's outbound channel
///
/// Cloneable; the handler and the heartbeat task each hold one. Sending
/// fails once the connection's dispatcher has gone away, which is how
/// the heartbeat task detects a closed transport.
#[derive(Clone)]
pub struct OutboundSink {
    tx: mpsc::UnboundedSender<String>,
}

impl OutboundSink {
    /// Create a sink together with the receiving half
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue a text frame for transmission
    pub fn send(&self, frame: String) -> Result<()> {
        self.tx
            .send(frame)
            .map_err(|_| SteadyError::ChannelSend("connection closed".into()))
    }
}

/// Run one connection until it ends, cleanly or with an error
///
/// Starts the heartbeat task after the first `Authenticated` outcome,
/// at most once for this connection. Returns `Ok(())` on a server-side
/// close frame; any transport, write, or handler error is returned as-is
/// and drives the supervisor into backoff. The heartbeat task is not
/// aborted here; dropping the outbound receiver makes its next send fail,
/// which is its cue to stop.
pub(crate) async fn dispatch_connection(
    stream: WsStream,
    label: &str,
    handler: Arc<dyn SessionHandler>,
    schedule: Arc<dyn HeartbeatSchedule>,
) -> Result<()> {
    let (mut write, mut read) = stream.split();
    let (sink, mut outbound_rx) = OutboundSink::channel();
    // Heartbeat state for this connection instance only; a reconnect
    // starts over with None.
    let mut heartbeat_task = None;

    loop {
        tokio::select! {
            inbound = read.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    match handler.on_frame(&text, &sink).await? {
                        FrameOutcome::Authenticated => {
                            if heartbeat_task.is_none() {
                                debug!(route = %label, "authenticated, starting heartbeat");
                                heartbeat_task = Some(heartbeat::spawn_heartbeat(
                                    label.to_string(),
                                    Arc::clone(&handler),
                                    Arc::clone(&schedule),
                                    sink.clone(),
                                ));
                            } else {
                                warn!(route = %label, "server repeated AUTH; heartbeat already running");
                            }
                        }
                        FrameOutcome::Handled => {}
                    }
                }
                Some(Ok(Message::Close(_))) => {
                    debug!(route = %label, "received close frame");
                    return Ok(());
                }
                // Control frames (tungstenite answers pings itself) and
                // binary payloads, which this protocol never sends.
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(SteadyError::WebSocket(e.to_string())),
                None => return Err(SteadyError::ConnectionClosed("stream ended".into())),
            },
            outbound = outbound_rx.recv() => match outbound {
                Some(frame) => {
                    write
                        .send(Message::Text(frame))
                        .await
                        .map_err(|e| SteadyError::WebSocket(e.to_string()))?;
                }
                // Unreachable while `sink` is alive above; kept for safety.
                None => return Err(SteadyError::ChannelSend("outbound channel closed".into())),
            },
        }
    }
}
