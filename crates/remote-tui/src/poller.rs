//! Repeating timers that keep store slices fresh.
//!
//! A view owns its `PollingController`; dropping the view drops the timer.

use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct PollingController {
    name: &'static str,
    interval: Duration,
    token: Option<CancellationToken>,
}

impl PollingController {
    pub fn new(name: &'static str, interval: Duration) -> Self {
        Self {
            name,
            interval,
            token: None,
        }
    }

    /// Cancel any running timer, run `tick` now, then every interval.
    pub fn refresh<F>(&mut self, tick: F)
    where
        F: Fn() + Send + 'static,
    {
        if self.is_active() {
            debug!("{} poller restarted", self.name);
        }
        self.cancel();
        tick();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let period = self.interval;
        let name = self.name;
        tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = timer.tick() => tick(),
                }
            }
            debug!("{} poller stopped", name);
        });
        self.token = Some(token);
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.token.is_some()
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.cancel();
    }
}
