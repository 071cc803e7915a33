//! Core traits and types for the SteadySockets session engine.
//!
//! - **SessionHandler**: react to inbound frames, build heartbeat frames
//! - **HeaderProvider**: supply HTTP headers for the WebSocket upgrade
//! - **ReconnectionStrategy**: control backoff between connection attempts
//! - **HeartbeatSchedule**: control the interval between heartbeat sends

pub mod error;
pub mod handler;
pub mod headers;
pub mod reconnect;
pub mod schedule;

// Re-export commonly used types
pub use error::{Result, SteadyError};
pub use handler::{FrameOutcome, SessionHandler};
pub use headers::{HeaderProvider, Headers, NoHeaders};
pub use reconnect::{ExponentialBackoff, FixedDelay, ReconnectionStrategy};
pub use schedule::{FixedInterval, HeartbeatSchedule, UniformJitter};
