use thiserror::Error;

/// Main error type for steadysockets
#[derive(Error, Debug)]
pub enum SteadyError {
    /// TCP connection or WebSocket upgrade error
    #[error("Connect error: {0}")]
    Connect(String),

    /// Proxy tunnel establishment error
    #[error("Proxy error: {0}")]
    Proxy(String),

    /// WebSocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Connection closed unexpectedly
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// Inbound frame could not be interpreted
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Outbound channel send error
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for steadysockets operations
pub type Result<T> = std::result::Result<T, SteadyError>;
