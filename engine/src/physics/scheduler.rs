//! Collision Scheduler
//!
//! Gates how often the resolver runs relative to the host loop. The host may
//! tick far faster than the collision interval; between allowed runs the
//! caller reuses its last `CollisionResult`. The scheduler only signals, it
//! never blocks.

use std::time::Duration;

use serde::Serialize;

/// Run/skip counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    pub runs: u64,
    pub skips: u64,
}

impl SchedulerStats {
    /// Fraction of ticks that reused the previous result.
    pub fn throttled_ratio(&self) -> f32 {
        let total = self.runs + self.skips;
        if total == 0 {
            0.0
        } else {
            self.skips as f32 / total as f32
        }
    }
}

/// Interval-based throttle over a simulation clock.
#[derive(Debug, Clone)]
pub struct CollisionScheduler {
    interval: Duration,
    last_run: Option<Duration>,
    force_next: bool,
    stats: SchedulerStats,
}

impl CollisionScheduler {
    /// A zero interval runs collision every tick.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            force_next: false,
            stats: SchedulerStats::default(),
        }
    }

    /// Whether collision should run at `now`. Stamps `now` as the last run when it does.
    ///
    /// The first call always runs. A clock that moves backwards never runs
    /// until it passes the previous stamp by the interval again, unless a
    /// forced run is pending.
    pub fn should_run(&mut self, now: Duration) -> bool {
        let due = match self.last_run {
            None => true,
            Some(last) => now >= last && now - last >= self.interval,
        };

        if due || self.force_next {
            self.force_next = false;
            self.last_run = Some(now);
            self.stats.runs += 1;
            true
        } else {
            self.stats.skips += 1;
            false
        }
    }

    /// Make the next `should_run` return true regardless of elapsed time.
    pub fn force_next(&mut self) {
        self.force_next = true;
    }

    /// Forget the last run stamp and counters.
    pub fn reset(&mut self) {
        self.last_run = None;
        self.force_next = false;
        self.stats = SchedulerStats::default();
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_run(&self) -> Option<Duration> {
        self.last_run
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}
