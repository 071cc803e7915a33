use crate::core::dispatcher::OutboundSink;
use crate::error::Result;
use async_trait::async_trait;

/// What a handled frame meant for the session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame completed an authentication round-trip. The dispatcher
    /// starts the heartbeat task on the first such outcome per connection.
    Authenticated,
    /// The frame was handled (or ignored) with no lifecycle consequence.
    Handled,
}

/// Trait for the application protocol spoken over a session
///
/// Implement this trait to define how your client reacts to server
/// frames and what its periodic heartbeat looks like. One handler
/// instance is shared by a session across all of its reconnects.
///
/// # Example
/// ```ignore
/// struct EchoHandler;
///
/// #[async_trait::async_trait]
/// impl SessionHandler for EchoHandler {
///     async fn on_frame(&self, frame: &str, outbound: &OutboundSink) -> Result<FrameOutcome> {
///         outbound.send(frame.to_string())?;
///         Ok(FrameOutcome::Handled)
///     }
///
///     fn heartbeat_frame(&self) -> String {
///         "ping".to_string()
///     }
/// }
/// ```
#[async_trait]
pub trait SessionHandler: Send + Sync + 'static {
    /// Handle one inbound text frame
    ///
    /// Called by the dispatcher for every text frame, in receive order.
    /// Responses go through `outbound`, which shares the connection's
    /// single serialized write channel with the heartbeat task.
    ///
    /// # Errors
    /// An error terminates the connection and sends the session into its
    /// backoff/reconnect cycle. There is no per-frame error isolation.
    async fn on_frame(&self, frame: &str, outbound: &OutboundSink) -> Result<FrameOutcome>;

    /// Build the next heartbeat frame
    ///
    /// Called by the heartbeat task once per cycle, so the frame can carry
    /// fresh correlation ids or timestamps.
    fn heartbeat_frame(&self) -> String;
}
