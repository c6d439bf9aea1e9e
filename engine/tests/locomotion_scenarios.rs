//! Locomotion Scenario Tests
//!
//! End-to-end behaviour of the player controller over generated terrain:
//! falling and landing, water being ignored, jumping, and collision
//! throttling under a fast host loop.

use std::sync::Arc;
use std::time::Duration;

use glam::{Vec2, Vec3};
use terra_stride_engine::diagnostics::{PerformanceMonitor, TimingSample};
use terra_stride_engine::physics::{Capsule, CapsuleCollisionResolver};
use terra_stride_engine::world::{
    MeshId, MeshTags, SceneMesh, TerrainRegistry, generate_flat_ground, generate_water_plane,
};
use terra_stride_engine::{LocomotionConfig, LocomotionInput, LocomotionMode, PlayerController};

const DT: f32 = 1.0 / 60.0;

/// Keeps every sample so tests can inspect per-tick behaviour.
#[derive(Debug, Default)]
struct RecordingMonitor {
    samples: Vec<TimingSample>,
    empty_terrain_reports: u32,
}

impl PerformanceMonitor for RecordingMonitor {
    fn record(&mut self, sample: TimingSample) {
        self.samples.push(sample);
    }

    fn report_empty_terrain(&mut self) {
        self.empty_terrain_reports += 1;
    }
}

fn flat_ground(y: f32) -> Arc<SceneMesh> {
    Arc::new(generate_flat_ground(
        MeshId(1),
        MeshTags::kind("terrain"),
        Vec3::new(0.0, y, 0.0),
        100.0,
        16,
    ))
}

fn recording_controller(config: LocomotionConfig) -> PlayerController<RecordingMonitor> {
    PlayerController::with_monitor(config, RecordingMonitor::default()).unwrap()
}

fn land<M: PerformanceMonitor>(controller: &mut PlayerController<M>, dt: f32) {
    for _ in 0..(5.0 / dt) as usize {
        if controller.update(dt, &LocomotionInput::default()).is_grounded() {
            return;
        }
    }
    panic!("capsule never landed: {:?}", controller.state());
}

// ============================================================================
// Scenario A: fall onto flat ground
// ============================================================================

#[test]
fn test_scenario_a_single_resolve_high_above_ground() {
    let mut registry = TerrainRegistry::new();
    let terrain = registry.classify(&[flat_ground(0.0)]).clone();
    let config = LocomotionConfig::default();
    let mut resolver = CapsuleCollisionResolver::new(&config.collision, &config.cache);
    let capsule = Capsule::new(0.5, 2.0, Vec3::new(0.0, 10.0, 0.0)).unwrap();

    let result = resolver.resolve(&capsule, capsule.center, &terrain, Duration::ZERO);
    assert!(!result.is_grounded);
    assert_eq!(result.position, capsule.center);
}

#[test]
fn test_scenario_a_falls_and_lands() {
    let mut controller = recording_controller(LocomotionConfig::default());
    controller.rebuild_terrain(&[flat_ground(0.0)]);
    assert_eq!(controller.state().position, Vec3::new(0.0, 10.0, 0.0));

    let mut ticks = 0;
    let mut previous_vy = 0.0;
    loop {
        let state = controller.update(DT, &LocomotionInput::default());
        ticks += 1;
        if state.is_grounded() {
            break;
        }
        assert!(state.velocity.y < previous_vy, "gravity must keep accelerating the fall");
        previous_vy = state.velocity.y;
        assert!(ticks < 600, "capsule never landed");
    }

    let state = controller.state();
    assert_eq!(state.velocity.y, 0.0);
    let base = state.position.y - 1.0;
    assert!(base.abs() < 1e-4, "base should rest at y=0, got {}", base);
    // Free fall of 9 units at 20 u/s² takes about 0.95 s
    assert!((50..=65).contains(&ticks), "landed after {} ticks", ticks);
}

#[test]
fn test_scenario_a_stays_put_after_landing() {
    let mut controller = recording_controller(LocomotionConfig::default());
    controller.rebuild_terrain(&[flat_ground(0.0)]);
    land(&mut controller, DT);
    let rest = controller.state().position;

    for _ in 0..120 {
        let state = controller.update(DT, &LocomotionInput::default());
        assert!(state.is_grounded());
        assert_eq!(state.position, rest, "no jitter while standing");
    }
}

// ============================================================================
// Scenario B: water is never ground
// ============================================================================

#[test]
fn test_scenario_b_ocean_surface_is_not_ground() {
    let ocean = Arc::new(generate_water_plane(MeshId(7), Vec3::ZERO, 200.0));
    assert_eq!(ocean.tags().kind.as_deref(), Some("ocean-surface"));

    let mut config = LocomotionConfig::default();
    // Base exactly on the water surface
    config.capsule.spawn_position = Vec3::new(0.0, 1.0, 0.0);
    let mut controller = recording_controller(config);
    controller.rebuild_terrain(&[ocean]);

    let probe = controller.test_collision_at(Vec3::new(0.0, 1.0, 0.0));
    assert!(!probe.is_grounded);
    assert!(probe.ground_height.is_none());

    for _ in 0..60 {
        let state = controller.update(DT, &LocomotionInput::default());
        assert_eq!(state.mode, LocomotionMode::Airborne);
    }
    assert!(controller.state().position.y < 0.0, "capsule should sink through the water");
    assert_eq!(controller.monitor().empty_terrain_reports, 1);
}

#[test]
fn test_land_under_water_wins() {
    let water_above = Arc::new(generate_water_plane(MeshId(2), Vec3::new(0.0, 3.0, 0.0), 50.0));
    let mut controller = recording_controller(LocomotionConfig::default());
    controller.rebuild_terrain(&[water_above, flat_ground(0.0)]);

    let result = controller.test_collision_at(Vec3::new(0.0, 3.5, 0.0));
    let ground = result.ground_height.unwrap();
    assert!(ground.abs() < 1e-4, "water at y=3 must not be ground, got {}", ground);
    assert!(!result.is_grounded);
}

// ============================================================================
// Scenario C: jump from the ground
// ============================================================================

#[test]
fn test_scenario_c_jump_sets_impulse_same_tick() {
    let mut controller = recording_controller(LocomotionConfig::default());
    controller.rebuild_terrain(&[flat_ground(0.0)]);
    land(&mut controller, DT);

    let state = controller.update(DT, &LocomotionInput::jump());
    assert_eq!(state.velocity.y, 8.0);
    assert_eq!(state.mode, LocomotionMode::Airborne);
}

#[test]
fn test_jump_arc_returns_to_ground() {
    let mut controller = recording_controller(LocomotionConfig::default());
    controller.rebuild_terrain(&[flat_ground(0.0)]);
    land(&mut controller, DT);

    controller.update(DT, &LocomotionInput::jump());
    let mut peak = 0.0f32;
    let mut airborne_ticks = 0;
    while !controller.update(DT, &LocomotionInput::default()).is_grounded() {
        peak = peak.max(controller.state().position.y);
        airborne_ticks += 1;
        assert!(airborne_ticks < 300, "never came back down");
    }

    // v²/2g = 64/40 = 1.6 above the resting centre of 1.0
    assert!((peak - 2.6).abs() < 0.15, "peak = {}", peak);
    assert!((controller.state().position.y - 1.0).abs() < 1e-4);
}

#[test]
fn test_jump_survives_throttled_tick() {
    let mut config = LocomotionConfig::default();
    config.collision.check_interval_ms = 50;
    let mut controller = recording_controller(config);
    controller.rebuild_terrain(&[flat_ground(0.0)]);
    land(&mut controller, 0.004);

    // Force one fresh grounded resolve, then jump on the throttled tick after it
    let rest = controller.state().position;
    controller.set_position(rest);
    assert!(controller.update(0.004, &LocomotionInput::default()).is_grounded());
    assert!(!controller.monitor().samples.last().unwrap().throttled);

    let state = controller.update(0.004, &LocomotionInput::jump());
    assert!(controller.monitor().samples.last().unwrap().throttled);
    assert_eq!(state.mode, LocomotionMode::Airborne);
    assert_eq!(state.velocity.y, 8.0);

    let next = controller.update(0.004, &LocomotionInput::default());
    assert_eq!(next.mode, LocomotionMode::Airborne);
    assert!(next.position.y > state.position.y);
}

// ============================================================================
// Collision throttling
// ============================================================================

#[test]
fn test_fast_loop_resolves_at_most_once_per_interval() {
    let mut controller = recording_controller(LocomotionConfig::default());
    controller.rebuild_terrain(&[flat_ground(0.0)]);

    let mut last_x = controller.state().position.x;
    for _ in 0..250 {
        let state = controller.update(0.004, &LocomotionInput::walk(Vec2::X));
        assert!(state.position.x > last_x, "horizontal movement is never throttled");
        last_x = state.position.x;
    }

    let samples = &controller.monitor().samples;
    let fresh_ticks: Vec<u64> = samples.iter().filter(|s| !s.throttled).map(|s| s.tick).collect();
    assert!(!fresh_ticks.is_empty());
    for pair in fresh_ticks.windows(2) {
        let gap_ms = (pair[1] - pair[0]) * 4;
        assert!(gap_ms >= 16, "resolves {} ms apart", gap_ms);
    }
    // 1 s at 4 ms per tick with a 16 ms interval
    assert!((62..=63).contains(&fresh_ticks.len()), "{} resolves", fresh_ticks.len());

    for sample in samples.iter().filter(|s| s.throttled) {
        assert_eq!(sample.cache_queries, 0);
        assert_eq!(sample.cache_hits, 0);
        assert_eq!(sample.collision_duration, Duration::ZERO);
    }
}

#[test]
fn test_throttled_ticks_still_catch_penetration() {
    let mut config = LocomotionConfig::default();
    config.collision.check_interval_ms = 1000;
    let mut controller = recording_controller(config);
    controller.rebuild_terrain(&[flat_ground(0.0)]);

    // The first resolve sees the ground; every later tick is throttled
    for _ in 0..300 {
        controller.update(DT, &LocomotionInput::default());
    }
    let state = controller.state();
    assert!(state.is_grounded());
    assert!((state.position.y - 1.0).abs() < 1e-4);
    assert!(controller.scheduler().stats().skips > 0);
}

// ============================================================================
// Height cache under normal play
// ============================================================================

#[test]
fn test_standing_still_is_served_from_cache() {
    let mut controller = recording_controller(LocomotionConfig::default());
    controller.rebuild_terrain(&[flat_ground(0.0)]);
    land(&mut controller, DT);

    let before = controller.cache_stats();
    for _ in 0..120 {
        controller.update(DT, &LocomotionInput::default());
    }
    let after = controller.cache_stats();
    let hits = after.hits - before.hits;
    let queries = after.queries - before.queries;
    let rate = hits as f32 / (hits + queries) as f32;
    assert!(rate > 0.75, "hit rate {} ({} hits, {} probes)", rate, hits, queries);
}

// ============================================================================
// Roster changes
// ============================================================================

#[test]
fn test_rebuild_with_higher_ground_lifts_player() {
    let mut controller = recording_controller(LocomotionConfig::default());
    controller.rebuild_terrain(&[flat_ground(0.0)]);
    land(&mut controller, DT);

    controller.rebuild_terrain(&[flat_ground(3.0)]);
    let state = controller.update(DT, &LocomotionInput::default());
    assert!(state.is_grounded());
    assert!((state.position.y - 4.0).abs() < 1e-4, "y = {}", state.position.y);
}

#[test]
fn test_empty_roster_is_permanently_airborne() {
    let mut controller = recording_controller(LocomotionConfig::default());
    controller.rebuild_terrain(&[]);

    for _ in 0..600 {
        let state = controller.update(DT, &LocomotionInput::walk(Vec2::Y).with_jump(true));
        assert_eq!(state.mode, LocomotionMode::Airborne);
    }
    assert_eq!(controller.monitor().empty_terrain_reports, 1);
    assert!(controller.get_status().empty_terrain);
}

#[test]
fn test_teleport_then_land() {
    let mut controller = recording_controller(LocomotionConfig::default());
    controller.rebuild_terrain(&[flat_ground(0.0)]);
    land(&mut controller, DT);

    controller.set_position(Vec3::new(20.0, 6.0, -20.0));
    let state = controller.state();
    assert_eq!(state.velocity, Vec3::ZERO);
    assert_eq!(state.mode, LocomotionMode::Airborne);

    land(&mut controller, DT);
    let state = controller.state();
    assert_eq!(state.position.x, 20.0);
    assert_eq!(state.position.z, -20.0);
    assert!((state.position.y - 1.0).abs() < 1e-4);
}
