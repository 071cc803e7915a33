use rand::Rng;
use std::time::Duration;

/// Trait for pacing heartbeat sends
///
/// The heartbeat task draws a fresh interval after every send, so
/// implementations may randomize each cycle independently.
pub trait HeartbeatSchedule: Send + Sync {
    /// Duration to wait before the next heartbeat send
    fn next_interval(&self) -> Duration;
}

/// Uniformly random interval in whole seconds, drawn per cycle
///
/// Randomized heartbeats avoid the trivially regular traffic pattern a
/// fixed interval produces.
#[derive(Debug, Clone)]
pub struct UniformJitter {
    min_secs: u64,
    max_secs: u64,
}

impl UniformJitter {
    /// Create a new jittered schedule over `[min_secs, max_secs]`
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self {
            min_secs: min_secs.min(max_secs),
            max_secs: min_secs.max(max_secs),
        }
    }
}

impl HeartbeatSchedule for UniformJitter {
    fn next_interval(&self) -> Duration {
        let secs = rand::thread_rng().gen_range(self.min_secs..=self.max_secs);
        Duration::from_secs(secs)
    }
}

/// Fixed heartbeat interval
///
/// Deterministic pacing, mainly useful in tests.
#[derive(Debug, Clone)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl HeartbeatSchedule for FixedInterval {
    fn next_interval(&self) -> Duration {
        self.interval
    }
}
