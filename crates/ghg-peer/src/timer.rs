//! Debate Timer: a host-only one-second clock.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

/// Period between `Tick` actions.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Fires once per second while armed; pends forever while disarmed.
#[derive(Debug)]
pub struct DebateTimer {
    interval: Option<Interval>,
}

impl DebateTimer {
    pub fn new() -> Self {
        Self { interval: None }
    }

    /// Arm or disarm to match the state's `timer_running && time_left > 0`.
    /// Arming starts a fresh second; an already armed timer keeps its phase.
    pub fn sync(&mut self, active: bool) {
        match (active, self.interval.is_some()) {
            (true, false) => {
                let mut interval = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.interval = Some(interval);
            }
            (false, true) => self.interval = None,
            _ => {}
        }
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Wait for the next second. Never completes while disarmed, which makes
    /// it safe to poll in a `select!` unconditionally.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending().await,
        }
    }
}

impl Default for DebateTimer {
    fn default() -> Self {
        Self::new()
    }
}
