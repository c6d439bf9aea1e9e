//! Player Controller
//!
//! Per-frame entry point for the host. Wires the terrain registry, the
//! collision resolver, the scheduler and the locomotion state machine
//! together on a simulation clock advanced by `update(dt)`, and exposes the
//! debug hooks used by a console or overlay.
//!
//! # Usage
//!
//! ```rust,ignore
//! use terra_stride_engine::{LocomotionConfig, PlayerController};
//!
//! let mut controller = PlayerController::new(LocomotionConfig::default())?;
//! controller.rebuild_terrain(&scene_meshes);
//!
//! // Each frame:
//! let state = controller.update(delta_time, &keys.to_input(camera.yaw));
//! camera.follow(state.position);
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec3;

use super::locomotion::{LocomotionState, PlayerLocomotion};
use crate::config::{DiagnosticsConfig, LocomotionConfig};
use crate::diagnostics::{PerformanceMonitor, PlayerStatus, RollingPerformanceMonitor, TimingSample};
use crate::error::ConfigError;
use crate::input::LocomotionInput;
use crate::physics::{
    CacheStats, Capsule, CapsuleCollisionResolver, CollisionResult, CollisionScheduler,
};
use crate::world::{RegistrySummary, SceneMesh, TerrainRegistry, TerrainSet};

/// First-person capsule controller over static terrain.
pub struct PlayerController<M: PerformanceMonitor = RollingPerformanceMonitor> {
    registry: TerrainRegistry,
    resolver: CapsuleCollisionResolver,
    scheduler: CollisionScheduler,
    locomotion: PlayerLocomotion,
    capsule: Capsule,
    last_result: CollisionResult,
    diagnostics: DiagnosticsConfig,
    monitor: M,
    clock: Duration,
    ticks: u64,
}

impl PlayerController {
    /// Validate `config` and build a controller with the rolling monitor.
    pub fn new(config: LocomotionConfig) -> Result<Self, ConfigError> {
        let monitor = RollingPerformanceMonitor::from_config(&config.diagnostics);
        Self::with_monitor(config, monitor)
    }
}

impl<M: PerformanceMonitor> PlayerController<M> {
    /// Validate `config` and build a controller reporting to `monitor`.
    ///
    /// The controller starts with an empty terrain set; until
    /// [`rebuild_terrain`](Self::rebuild_terrain) is called it stays airborne,
    /// and the first `update` reports the empty terrain to the monitor.
    pub fn with_monitor(config: LocomotionConfig, mut monitor: M) -> Result<Self, ConfigError> {
        config.validate()?;

        let capsule = Capsule::from_config(&config.capsule)?;
        let mut resolver = CapsuleCollisionResolver::new(&config.collision, &config.cache);
        resolver.set_logging(config.diagnostics.collision_logging);
        monitor.set_display(config.diagnostics.performance_display);

        Ok(Self {
            registry: TerrainRegistry::new(),
            resolver,
            scheduler: CollisionScheduler::new(config.collision.check_interval()),
            locomotion: PlayerLocomotion::new(config.movement, capsule.center),
            capsule,
            last_result: CollisionResult::airborne(capsule.center),
            diagnostics: config.diagnostics,
            monitor,
            clock: Duration::ZERO,
            ticks: 0,
        })
    }

    /// Reclassify the scene roster. Call whenever meshes are added or removed.
    pub fn rebuild_terrain(&mut self, meshes: &[Arc<SceneMesh>]) -> RegistrySummary {
        self.registry.classify(meshes);
        if self.registry.is_empty_terrain() {
            self.monitor.report_empty_terrain();
        }

        // The previous ground height belongs to the old roster
        self.last_result = CollisionResult::airborne(self.capsule.center);
        self.scheduler.force_next();
        self.registry.summary()
    }

    /// Advance one frame and return the committed state.
    pub fn update(&mut self, dt: f32, input: &LocomotionInput) -> LocomotionState {
        if self.ticks == 0 && self.registry.summary().generation == 0 {
            tracing::warn!("update before any terrain classification; player will stay airborne");
            self.monitor.report_empty_terrain();
        }

        let dt = self.locomotion.sanitize_dt(dt);
        self.clock += Duration::from_secs_f32(dt);
        self.ticks += 1;
        let now = self.clock;

        let proposed = self.locomotion.propose(dt, input, now);

        let before = self.resolver.cache_stats();
        let mut collision_duration = Duration::ZERO;
        let throttled = !self.scheduler.should_run(now);
        let result = if throttled {
            self.last_result
                .reapplied(&self.capsule, proposed, self.resolver.tolerance())
        } else {
            let started = Instant::now();
            let fresh =
                self.resolver
                    .resolve(&self.capsule, proposed, self.registry.terrain(), now);
            collision_duration = started.elapsed();
            self.last_result = fresh;
            fresh
        };

        self.locomotion.apply(proposed, &result, now);
        let state = self.locomotion.state();
        self.capsule.center = state.position;

        let after = self.resolver.cache_stats();
        self.monitor.record(TimingSample {
            tick: self.ticks,
            collision_duration,
            throttled,
            cache_hits: after.hits.saturating_sub(before.hits),
            cache_queries: after.queries.saturating_sub(before.queries),
        });

        state
    }

    pub fn state(&self) -> LocomotionState {
        self.locomotion.state()
    }

    // ------------------------------------------------------------------------
    // Debug hooks
    // ------------------------------------------------------------------------

    /// Resolve the capsule at `position` without changing player state.
    pub fn test_collision_at(&mut self, position: Vec3) -> CollisionResult {
        let probe = self.capsule.translated_to(position);
        let result = self
            .resolver
            .resolve(&probe, position, self.registry.terrain(), self.clock);
        tracing::info!(
            ?position,
            grounded = result.is_grounded,
            ground = ?result.ground_height,
            corrected = ?result.position,
            "collision probe"
        );
        result
    }

    /// Teleport with zero velocity. The next tick always runs a fresh resolve.
    pub fn set_position(&mut self, position: Vec3) {
        self.locomotion.teleport(position);
        self.capsule.center = position;
        self.last_result = CollisionResult::airborne(position);
        self.scheduler.force_next();
        tracing::info!(?position, "player teleported");
    }

    pub fn get_status(&self) -> PlayerStatus {
        let state = self.locomotion.state();
        let terrain = self.registry.terrain();
        PlayerStatus {
            position: state.position,
            velocity: state.velocity,
            mode: state.mode,
            ground_height: self.last_result.ground_height,
            sim_time: self.clock.as_secs_f64(),
            ticks: self.ticks,
            terrain_meshes: terrain.len(),
            terrain_generation: terrain.generation(),
            empty_terrain: terrain.is_empty(),
            cache_entries: self.resolver.cache().len(),
            cache: self.resolver.cache_stats(),
            scheduler: self.scheduler.stats(),
            collision_logging: self.diagnostics.collision_logging,
            performance_display: self.diagnostics.performance_display,
            performance: self.monitor.summary(),
        }
    }

    /// Flip the periodic performance summary; returns the new setting.
    pub fn toggle_performance_display(&mut self) -> bool {
        let enabled = !self.diagnostics.performance_display;
        self.diagnostics.performance_display = enabled;
        self.monitor.set_display(enabled);
        tracing::info!(enabled, "performance display toggled");
        enabled
    }

    pub fn enable_collision_logging(&mut self) {
        self.set_collision_logging(true);
    }

    pub fn disable_collision_logging(&mut self) {
        self.set_collision_logging(false);
    }

    fn set_collision_logging(&mut self, enabled: bool) {
        self.diagnostics.collision_logging = enabled;
        self.resolver.set_logging(enabled);
        tracing::info!(enabled, "collision logging");
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn capsule(&self) -> &Capsule {
        &self.capsule
    }

    pub fn terrain(&self) -> &TerrainSet {
        self.registry.terrain()
    }

    pub fn registry(&self) -> &TerrainRegistry {
        &self.registry
    }

    pub fn last_result(&self) -> CollisionResult {
        self.last_result
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.resolver.cache_stats()
    }

    pub fn scheduler(&self) -> &CollisionScheduler {
        &self.scheduler
    }

    /// Simulation time accumulated from `update` deltas.
    pub fn sim_time(&self) -> Duration {
        self.clock
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn diagnostics(&self) -> &DiagnosticsConfig {
        &self.diagnostics
    }

    pub fn monitor(&self) -> &M {
        &self.monitor
    }

    pub fn monitor_mut(&mut self) -> &mut M {
        &mut self.monitor
    }
}
