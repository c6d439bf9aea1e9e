//! Diagnostics
//!
//! Timing samples emitted once per tick, the monitor trait that receives
//! them, a rolling-window monitor, and the status snapshot returned by the
//! controller's debug hooks.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use glam::Vec3;
use serde::Serialize;

use crate::config::DiagnosticsConfig;
use crate::physics::{CacheStats, SchedulerStats};
use crate::player::LocomotionMode;

/// What one tick cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimingSample {
    /// Tick number since the controller was created
    pub tick: u64,
    /// Wall time spent in the resolver; zero on throttled ticks
    pub collision_duration: Duration,
    /// The scheduler skipped collision and the last result was reused
    pub throttled: bool,
    /// Height samples served from the cache this tick
    pub cache_hits: u64,
    /// Geometric probes run this tick
    pub cache_queries: u64,
}

/// Receives timing samples from the controller.
pub trait PerformanceMonitor {
    fn record(&mut self, sample: TimingSample);

    /// Called once per terrain rebuild that leaves nothing collidable.
    fn report_empty_terrain(&mut self) {}

    fn set_display(&mut self, _enabled: bool) {}

    fn summary(&self) -> Option<PerformanceSummary> {
        None
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMonitor;

impl PerformanceMonitor for NullMonitor {
    fn record(&mut self, _sample: TimingSample) {}
}

/// Aggregate over the monitor's current window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub samples: usize,
    pub avg_collision_us: f64,
    pub peak_collision_us: f64,
    /// Fraction of ticks that reused the previous collision result
    pub throttled_ratio: f32,
    /// Fraction of height samples served without a probe
    pub cache_hit_rate: f32,
    /// Average geometric probes per tick
    pub queries_per_tick: f32,
}

impl fmt::Display for PerformanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "collision: {:.1}us avg | {:.1}us peak | throttled {:.0}% | cache hits {:.0}% | {:.2} probes/tick",
            self.avg_collision_us,
            self.peak_collision_us,
            self.throttled_ratio * 100.0,
            self.cache_hit_rate * 100.0,
            self.queries_per_tick,
        )
    }
}

/// Keeps the last `window` samples and logs a summary every
/// `display_every` samples while the display is on.
#[derive(Debug, Clone)]
pub struct RollingPerformanceMonitor {
    samples: VecDeque<TimingSample>,
    window: usize,
    display_every: u64,
    display: bool,
    recorded: u64,
    empty_terrain_reports: u64,
}

impl RollingPerformanceMonitor {
    pub fn new(window: usize, display_every: u64) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
            display_every: display_every.max(1),
            display: false,
            recorded: 0,
            empty_terrain_reports: 0,
        }
    }

    pub fn from_config(config: &DiagnosticsConfig) -> Self {
        let mut monitor = Self::new(config.window, config.display_every);
        monitor.display = config.performance_display;
        monitor
    }

    /// Samples currently in the window, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &TimingSample> {
        self.samples.iter()
    }

    /// Total samples ever recorded.
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    pub fn empty_terrain_reports(&self) -> u64 {
        self.empty_terrain_reports
    }

    pub fn display_enabled(&self) -> bool {
        self.display
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    fn compute_summary(&self) -> PerformanceSummary {
        if self.samples.is_empty() {
            return PerformanceSummary::default();
        }

        let n = self.samples.len();
        let micros = |s: &TimingSample| s.collision_duration.as_secs_f64() * 1_000_000.0;
        let total_us: f64 = self.samples.iter().map(micros).sum();
        let peak_us = self.samples.iter().map(micros).fold(0.0, f64::max);
        let throttled = self.samples.iter().filter(|s| s.throttled).count();
        let hits: u64 = self.samples.iter().map(|s| s.cache_hits).sum();
        let queries: u64 = self.samples.iter().map(|s| s.cache_queries).sum();

        PerformanceSummary {
            samples: n,
            avg_collision_us: total_us / n as f64,
            peak_collision_us: peak_us,
            throttled_ratio: throttled as f32 / n as f32,
            cache_hit_rate: CacheStats {
                hits,
                queries,
                ..Default::default()
            }
            .hit_rate(),
            queries_per_tick: queries as f32 / n as f32,
        }
    }
}

impl Default for RollingPerformanceMonitor {
    fn default() -> Self {
        Self::from_config(&DiagnosticsConfig::default())
    }
}

impl PerformanceMonitor for RollingPerformanceMonitor {
    fn record(&mut self, sample: TimingSample) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.recorded += 1;

        if self.display && self.recorded % self.display_every == 0 {
            let summary = self.compute_summary();
            tracing::info!(tick = sample.tick, "{}", summary);
        }
    }

    fn report_empty_terrain(&mut self) {
        self.empty_terrain_reports += 1;
    }

    fn set_display(&mut self, enabled: bool) {
        self.display = enabled;
    }

    fn summary(&self) -> Option<PerformanceSummary> {
        Some(self.compute_summary())
    }
}

/// Snapshot returned by `PlayerController::get_status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStatus {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mode: LocomotionMode,
    pub ground_height: Option<f32>,
    /// Seconds of simulation time elapsed
    pub sim_time: f64,
    pub ticks: u64,
    pub terrain_meshes: usize,
    pub terrain_generation: u64,
    pub empty_terrain: bool,
    pub cache_entries: usize,
    pub cache: CacheStats,
    pub scheduler: SchedulerStats,
    pub collision_logging: bool,
    pub performance_display: bool,
    pub performance: Option<PerformanceSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(tick: u64, micros: u64, throttled: bool) -> TimingSample {
        TimingSample {
            tick,
            collision_duration: Duration::from_micros(micros),
            throttled,
            cache_hits: if throttled { 0 } else { 5 },
            cache_queries: if throttled { 0 } else { 2 },
        }
    }

    #[test]
    fn test_window_is_bounded() {
        let mut monitor = RollingPerformanceMonitor::new(4, 60);
        for tick in 0..10 {
            monitor.record(sample(tick, 10, false));
        }
        assert_eq!(monitor.samples().count(), 4);
        assert_eq!(monitor.samples().next().map(|s| s.tick), Some(6));
        assert_eq!(monitor.recorded(), 10);
    }

    #[test]
    fn test_summary_averages() {
        let mut monitor = RollingPerformanceMonitor::new(8, 60);
        monitor.record(sample(0, 100, false));
        monitor.record(sample(1, 0, true));
        monitor.record(sample(2, 0, true));
        monitor.record(sample(3, 300, false));

        let summary = monitor.summary().unwrap();
        assert_eq!(summary.samples, 4);
        assert!((summary.avg_collision_us - 100.0).abs() < 1e-6);
        assert!((summary.peak_collision_us - 300.0).abs() < 1e-6);
        assert!((summary.throttled_ratio - 0.5).abs() < 1e-6);
        // 10 hits, 4 probes
        assert!((summary.cache_hit_rate - 10.0 / 14.0).abs() < 1e-6);
        assert!((summary.queries_per_tick - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_summary_is_zeroed() {
        let monitor = RollingPerformanceMonitor::new(8, 60);
        assert_eq!(monitor.summary(), Some(PerformanceSummary::default()));
    }

    #[test]
    fn test_display_toggle_and_empty_terrain_count() {
        let mut monitor = RollingPerformanceMonitor::default();
        assert!(!monitor.display_enabled());
        monitor.set_display(true);
        assert!(monitor.display_enabled());

        monitor.report_empty_terrain();
        assert_eq!(monitor.empty_terrain_reports(), 1);
    }

    #[test]
    fn test_summary_display_format() {
        let summary = PerformanceSummary {
            samples: 1,
            avg_collision_us: 12.34,
            peak_collision_us: 20.0,
            throttled_ratio: 0.75,
            cache_hit_rate: 0.8,
            queries_per_tick: 1.5,
        };
        let text = summary.to_string();
        assert!(text.contains("12.3us avg"), "{}", text);
        assert!(text.contains("throttled 75%"), "{}", text);
    }

    #[test]
    fn test_null_monitor_has_no_summary() {
        let mut monitor = NullMonitor;
        monitor.record(sample(0, 1, false));
        assert!(monitor.summary().is_none());
    }
}
