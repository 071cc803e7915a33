//! # SteadySockets
//!
//! A session-keeping WebSocket client built for fleets of long-lived,
//! self-healing connections.
//!
//! ## Features
//!
//! - **Retry-forever sessions**: each session is a supervisor loop that
//!   reconnects after every failure, with a pluggable backoff strategy
//! - **Proxy-aware transport**: direct, SOCKS4/SOCKS5, or HTTP CONNECT
//!   tunneled connections, selected per route
//! - **Serialized outbound channel**: handler and heartbeat share one sink,
//!   frames are never interleaved on the wire
//! - **Modular design**: pluggable frame handler, headers, heartbeat
//!   schedule, and reconnection strategy
//!
//! ## Example
//!
//! ```rust,ignore
//! use steadysockets::{Route, Session, SessionConfig, SessionManager};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = SessionConfig::new("wss://api.example.com", Route::direct());
//!     let session = Session::new(config, Arc::new(MyHandler::new()));
//!
//!     let mut manager = SessionManager::new();
//!     manager.add_session(session);
//!     manager.run_all().await; // runs until process shutdown
//! }
//! ```

pub mod core;
pub mod manager;
pub mod traits;

// Re-export all traits
pub use traits::*;

// Re-export core session functionality
pub use crate::core::{
    dispatcher::OutboundSink,
    route::{ProxyEndpoint, ProxyScheme, Route},
    session::{Session, SessionConfig},
    transport::WsStream,
};

// Re-export manager
pub use manager::SessionManager;

/// Type alias for Result with SteadyError
pub type Result<T> = std::result::Result<T, traits::SteadyError>;
