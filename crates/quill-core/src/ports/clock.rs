//! Clock port - wall time plus the simulated network latency.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Time source for the services.
///
/// `sleep` is how simulated latency is awaited, so tests can swap in a
/// clock that never waits.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    async fn sleep(&self, duration: Duration);
}

/// Clock that reports wall time and resolves every sleep immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantClock;

#[async_trait]
impl Clock for InstantClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, _duration: Duration) {}
}
