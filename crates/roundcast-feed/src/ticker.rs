use std::time::Duration;

use roundcast_core::scheduler::Transition;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Restartable fixed-period timer owned by the driver loop.
///
/// Disarmed by default. While disarmed, [`Ticker::tick`] never completes,
/// so it can sit in a `select!` branch guarded by [`Ticker::is_armed`].
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Arm the timer; the first tick fires one full period from now. Any
    /// running timer is replaced, never duplicated.
    pub fn start(&mut self) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    pub fn cancel(&mut self) {
        self.interval = None;
    }

    /// Follow a scheduler transition.
    pub fn apply(&mut self, transition: Option<Transition>) {
        match transition {
            Some(Transition::Draining { .. }) => self.start(),
            Some(Transition::Idle) => self.cancel(),
            None => {}
        }
    }

    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
