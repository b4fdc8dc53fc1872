//! Heartbeat scheduler
//!
//! Runs at a provisional period until the server's Hello, then at the server period.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Shortest period accepted; a zero period would spin
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug)]
pub struct HeartbeatScheduler {
    period: Duration,
    interval: Interval,
}

impl HeartbeatScheduler {
    /// First tick fires one full `period` from now
    pub fn new(period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        Self {
            period,
            interval: Self::schedule(period),
        }
    }

    fn schedule(period: Duration) -> Interval {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }

    /// Switch to `period`, restarting the timer so the next tick is a full period away
    pub fn reset(&mut self, period: Duration) {
        self.period = period.max(MIN_PERIOD);
        self.interval = Self::schedule(self.period);
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next beat
    pub async fn tick(&mut self) -> Instant {
        self.interval.tick().await
    }
}
