//! The session supervisor: one indefinitely-retried connection per route.

use crate::core::dispatcher::dispatch_connection;
use crate::core::route::Route;
use crate::core::transport;
use crate::traits::{
    FixedDelay, HeaderProvider, HeartbeatSchedule, NoHeaders, ReconnectionStrategy, SessionHandler,
    UniformJitter,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Default backoff between connection attempts
const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);

/// Default bound on stream establishment + upgrade
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default heartbeat jitter bounds, in seconds
const DEFAULT_HEARTBEAT_BOUNDS: (u64, u64) = (20, 60);

/// Connection parameters for one session
pub struct SessionConfig {
    /// WebSocket URL (ws:// or wss://)
    pub url: String,
    /// Network path to the endpoint
    pub route: Route,
    /// Headers for the upgrade request
    pub headers: Arc<dyn HeaderProvider>,
    /// Bound on stream establishment + upgrade; elapsing counts as an
    /// ordinary connect failure
    pub connect_timeout: Duration,
}

impl SessionConfig {
    pub fn new(url: impl Into<String>, route: Route) -> Self {
        Self {
            url: url.into(),
            route,
            headers: Arc::new(NoHeaders),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_headers(mut self, headers: Arc<dyn HeaderProvider>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// One logical, indefinitely-retried WebSocket session bound to a route
///
/// `run()` is the supervisor state machine: connect (through the route's
/// proxy if configured), hand the connection to the dispatcher, and on
/// any termination wait out the reconnection strategy's delay and try
/// again. With the default `FixedDelay(5s, unlimited)` strategy the
/// session never ends; failures of any kind only ever cost one backoff.
pub struct Session {
    config: SessionConfig,
    handler: Arc<dyn SessionHandler>,
    reconnect: Box<dyn ReconnectionStrategy>,
    schedule: Arc<dyn HeartbeatSchedule>,
    label: String,
}

impl Session {
    pub fn new(config: SessionConfig, handler: Arc<dyn SessionHandler>) -> Self {
        let label = config.route.label().to_string();
        let (min_secs, max_secs) = DEFAULT_HEARTBEAT_BOUNDS;
        Self {
            config,
            handler,
            reconnect: Box::new(FixedDelay::new(DEFAULT_BACKOFF, None)),
            schedule: Arc::new(UniformJitter::new(min_secs, max_secs)),
            label,
        }
    }

    /// Replace the reconnection strategy (default: fixed 5s, unlimited)
    pub fn with_reconnect_strategy(mut self, strategy: Box<dyn ReconnectionStrategy>) -> Self {
        self.reconnect = strategy;
        self
    }

    /// Replace the heartbeat schedule (default: uniform 20-60s jitter)
    pub fn with_heartbeat_schedule(mut self, schedule: Arc<dyn HeartbeatSchedule>) -> Self {
        self.schedule = schedule;
        self
    }

    /// The route's log label (`"local"` or the proxy URL)
    pub fn route_label(&self) -> &str {
        &self.label
    }

    /// Run the session until its reconnection strategy gives up
    ///
    /// With an unlimited strategy this only returns at process shutdown.
    pub async fn run(self) {
        let label = &self.label;
        let mut attempt = 0usize;

        loop {
            debug!(route = %label, url = %self.config.url, "connecting");

            let connected =
                tokio::time::timeout(self.config.connect_timeout, transport::connect(&self.config))
                    .await;

            match connected {
                Ok(Ok(stream)) => {
                    info!(route = %label, "connected");
                    attempt = 0;
                    let ended = dispatch_connection(
                        stream,
                        label,
                        Arc::clone(&self.handler),
                        Arc::clone(&self.schedule),
                    )
                    .await;
                    match ended {
                        Ok(()) => info!(route = %label, "connection closed by server"),
                        Err(e) => warn!(route = %label, error = %e, "connection ended with error"),
                    }
                }
                Ok(Err(e)) => {
                    error!(route = %label, error = %e, "failed to connect");
                }
                Err(_) => {
                    error!(
                        route = %label,
                        timeout = ?self.config.connect_timeout,
                        "connect attempt timed out"
                    );
                }
            }

            match self.reconnect.next_delay(attempt) {
                Some(delay) => {
                    info!(route = %label, delay = ?delay, "reconnecting after backoff");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    warn!(route = %label, "reconnection strategy exhausted, ending session");
                    return;
                }
            }
        }
    }
}
