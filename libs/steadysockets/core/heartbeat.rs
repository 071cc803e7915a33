//! Heartbeat task for one connection.
//!
//! One instance runs per active connection, started by the dispatcher
//! after the first completed authentication round-trip. Each cycle sends
//! a handler-built frame, then sleeps for a schedule-drawn interval. The
//! task is never aborted from outside: when the connection's dispatcher
//! goes away the outbound send fails, and the task stops on its own.
//! This avoids tearing a task down mid-send; a fresh instance is started
//! only after the next connection authenticates.

use crate::core::dispatcher::OutboundSink;
use crate::traits::{HeartbeatSchedule, SessionHandler};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawn the heartbeat task for one connection
///
/// Sends immediately on start (the connection has just authenticated),
/// then paces itself with the schedule.
pub fn spawn_heartbeat(
    label: String,
    handler: Arc<dyn SessionHandler>,
    schedule: Arc<dyn HeartbeatSchedule>,
    sink: OutboundSink,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!(route = %label, "heartbeat task started");

        loop {
            let frame = handler.heartbeat_frame();
            debug!(route = %label, frame = %frame, "sending heartbeat");
            if sink.send(frame).is_err() {
                warn!(route = %label, "connection closed during heartbeat, stopping");
                break;
            }
            tokio::time::sleep(schedule.next_interval()).await;
        }

        debug!(route = %label, "heartbeat task exiting");
    })
}
