//! Fan-out over many sessions.

use crate::core::session::Session;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Default stagger between session starts
const DEFAULT_STAGGER: Duration = Duration::from_secs(1);

/// Supervisor for a fleet of independent sessions
///
/// Starts each session as its own task with a fixed stagger between
/// starts, so a large fleet does not hammer the endpoint with one
/// simultaneous connect burst, then waits on all of them. Sessions are
/// isolated: a panic or exit in one is logged and never affects the
/// others.
pub struct SessionManager {
    sessions: Vec<Session>,
    stagger: Duration,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: Vec::new(),
            stagger: DEFAULT_STAGGER,
        }
    }

    /// Replace the start stagger (default 1s)
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn add_session(&mut self, session: Session) {
        self.sessions.push(session);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Start every session and wait for all of them
    ///
    /// Sessions with unlimited reconnection never finish, so this
    /// normally runs until process shutdown.
    pub async fn run_all(self) {
        info!(sessions = self.sessions.len(), "starting session fan-out");

        let count = self.sessions.len();
        let mut handles: Vec<(String, JoinHandle<()>)> = Vec::with_capacity(count);

        for (index, session) in self.sessions.into_iter().enumerate() {
            let label = session.route_label().to_string();
            handles.push((label, tokio::spawn(session.run())));
            if index + 1 < count {
                tokio::time::sleep(self.stagger).await;
            }
        }

        for (label, handle) in handles {
            if let Err(e) = handle.await {
                error!(route = %label, error = %e, "session task terminated abnormally");
            }
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
