//! Wall-clock implementation backed by the Tokio timer.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use quill_core::ports::Clock;

/// Real clock: sleeps on the runtime timer without blocking other tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
