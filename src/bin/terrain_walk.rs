//! Terrain Walk
//!
//! Run with: `cargo run --bin terrain_walk -- --ticks 600 --fps 240`
//!
//! Headless drive of the locomotion controller over a generated scene:
//! flat ground, a ramp up to a hexagonal platform, an ocean plane underneath
//! everything and a dynamic crate. The scripted player drops in, settles,
//! walks up the ramp and jumps on the platform. The final status is printed
//! as JSON.
//!
//! Logging follows `RUST_LOG`; `terra_stride_engine=info` is always enabled.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use glam::Vec3;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use terra_stride_engine::input::{KeyCode, MovementKeys};
use terra_stride_engine::world::{
    MeshId, MeshTags, SceneMesh, generate_flat_ground, generate_hex_platform, generate_ramp,
    generate_water_plane,
};
use terra_stride_engine::{LocomotionConfig, PlayerController};

#[derive(Parser)]
#[command(name = "terrain_walk")]
#[command(about = "Drive the locomotion controller over a generated scene", long_about = None)]
struct Cli {
    /// JSON config file; fields it omits keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of frames to simulate
    #[arg(short, long, default_value = "600")]
    ticks: u32,
    /// Host frame rate; above ~60 the collision scheduler starts throttling
    #[arg(long, default_value = "240")]
    fps: f32,
    /// Log every fresh collision resolve (needs RUST_LOG=debug)
    #[arg(long)]
    collision_logging: bool,
    /// Log rolling performance summaries
    #[arg(long)]
    perf: bool,
    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn build_scene() -> Vec<Arc<SceneMesh>> {
    vec![
        Arc::new(generate_flat_ground(
            MeshId(1),
            MeshTags::kind("terrain").named("meadow"),
            Vec3::ZERO,
            60.0,
            24,
        )),
        Arc::new(generate_ramp(
            MeshId(2),
            MeshTags::kind("terrain").named("ramp"),
            Vec3::new(10.0, 0.0, 0.0),
            20.0,
            6.0,
            5.0,
        )),
        Arc::new(generate_hex_platform(
            MeshId(3),
            MeshTags::kind("land").named("plateau"),
            Vec3::new(36.0, 5.0, 0.0),
            8.0,
        )),
        Arc::new(generate_water_plane(MeshId(4), Vec3::new(0.0, -0.5, 0.0), 300.0)),
        Arc::new(generate_hex_platform(
            MeshId(5),
            MeshTags::kind("prop").named("crate").dynamic(),
            Vec3::new(20.0, 2.0, 0.0),
            1.0,
        )),
    ]
}

/// Keys held at a given fraction of the run.
fn scripted_keys(progress: f32) -> MovementKeys {
    let mut keys = MovementKeys::new();
    if progress >= 0.4 {
        keys.handle_key(KeyCode::W, true);
    }
    if (0.7..0.72).contains(&progress) {
        keys.handle_key(KeyCode::Space, true);
    }
    keys
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("terra_stride_engine=info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LocomotionConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => LocomotionConfig::default(),
    };
    config.diagnostics.collision_logging |= cli.collision_logging;
    config.diagnostics.performance_display |= cli.perf;

    if cli.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    anyhow::ensure!(
        cli.fps.is_finite() && cli.fps > 0.0,
        "fps must be positive, got {}",
        cli.fps
    );

    let mut controller = PlayerController::new(config)?;
    let summary = controller.rebuild_terrain(&build_scene());
    tracing::info!(
        included = summary.included,
        excluded = summary.excluded,
        ticks = cli.ticks,
        fps = cli.fps,
        "starting terrain walk"
    );

    // Yaw of +90° faces +X, up the ramp
    let yaw = std::f32::consts::FRAC_PI_2;
    let dt = 1.0 / cli.fps;
    let mut was_grounded = controller.state().is_grounded();
    for tick in 0..cli.ticks {
        let progress = tick as f32 / cli.ticks.max(1) as f32;
        let input = scripted_keys(progress).to_input(yaw);
        let state = controller.update(dt, &input);

        if state.is_grounded() != was_grounded {
            tracing::info!(tick, mode = ?state.mode, position = ?state.position, "mode change");
            was_grounded = state.is_grounded();
        }
    }

    let status = controller.get_status();
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
